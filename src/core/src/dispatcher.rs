//! Storage commands issued by server-side application logic.
//!
//! Every operation takes the session it acts on explicitly:
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use xlocalstore::configuration::PrefixPolicy;
//! use xlocalstore::dispatcher;
//! use xlocalstore::session_management::StorageSession;
//! use xlocalstore::transport::ChannelTransport;
//!
//! # async fn run() {
//! let (transport, _outbound) = ChannelTransport::new();
//! let mut session = StorageSession::new(Arc::new(transport), PrefixPolicy::default());
//!
//! dispatcher::configure(&mut session, "notes");
//! dispatcher::store(&session, "draft", json!("hello"));
//! let value = dispatcher::request(&mut session, "draft").await;
//! # }
//! ```

pub mod commands;
pub mod pending;

pub use commands::{clear, configure, remove, request, retrieve, store};
pub use pending::{PendingRetrieve, RetrieveOutcome, RetrieveState};
