pub mod controller_handler;
pub mod session_hooks;

pub use controller_handler::Controller;
pub use session_hooks::VisitCounter;
