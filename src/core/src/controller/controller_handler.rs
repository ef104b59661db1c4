use crate::assets::use_x_storage;
use crate::configuration::config::Config;
use crate::controller::session_hooks::VisitCounter;
use crate::error_handling::types::*;
use crate::session_management::SessionManager;
use crate::web_interface::web_server::WebServer;
use log::{error, info};
use std::sync::Arc;

pub struct Controller {
    pub config: Config,
    session_manager: Arc<SessionManager>,
    web_server: WebServer,
}

impl Controller {
    /// Checks the client bundle and wires the session manager, the demo hooks and the web
    /// server together.
    ///
    /// A missing bundled script is fatal here rather than at the first page load.
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Initializing controller");
        config.validate()?;

        use_x_storage(&config.asset_mount).verify().map_err(|e| {
            error!("Client bundle incomplete: {}", e);
            ControllerError::AssetError(e)
        })?;

        let session_manager = Arc::new(SessionManager::from_config(&config));
        let hooks = Arc::new(VisitCounter::new(
            config.app_name.clone(),
            config.retrieve_timeout(),
        ));
        let web_server = WebServer::new(&config, session_manager.clone(), hooks);

        Ok(Self {
            config,
            session_manager,
            web_server,
        })
    }

    pub async fn run(&self) -> Result<(), ControllerError> {
        info!("Controller running");
        let result = self.web_server.start().await;
        self.shutdown();
        result.map_err(ControllerError::WebError)
    }

    pub fn shutdown(&self) {
        info!(
            "Shutting down {} active session(s)",
            self.session_manager.get_active_session_count()
        );
        self.session_manager.shutdown_all_sessions();
    }
}
