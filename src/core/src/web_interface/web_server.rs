use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use log::info;
use warp::{Filter, Rejection, Reply};

use super::routes::*;
use crate::assets::{use_x_storage, HeadTags};
use crate::configuration::config::Config;
use crate::error_handling::types::WebError;
use crate::session_management::{SessionHooks, SessionManager};

/// Web server for the demo page, the client scripts and the session websocket
pub struct WebServer {
    session_manager: Arc<SessionManager>,
    hooks: Arc<dyn SessionHooks>,
    bind_address: String,
    port: u16,
    asset_mount: String,
    app_name: String,
}

impl WebServer {
    /// Create a new WebServer instance
    pub fn new(
        config: &Config,
        session_manager: Arc<SessionManager>,
        hooks: Arc<dyn SessionHooks>,
    ) -> Self {
        Self {
            session_manager,
            hooks,
            bind_address: config.bind_address.clone(),
            port: config.port,
            asset_mount: config.asset_mount.clone(),
            app_name: config.app_name.clone(),
        }
    }

    /// All routes, composed.
    pub fn routes(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        let head = HeadTags::new().with(use_x_storage(&self.asset_mount));
        let page = Arc::new(render_page(&head, &self.app_name));

        dashboard_route(page)
            .or(assets_route(self.asset_mount.clone()))
            .or(list_sessions_route(self.session_manager.clone()))
            .or(websocket_route(
                self.session_manager.clone(),
                self.hooks.clone(),
            ))
    }

    /// Start the web server on the configured address
    pub async fn start(&self) -> Result<(), WebError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| WebError::BindFailed(format!("{}: {}", self.bind_address, e)))?;
        let addr = SocketAddr::new(ip, self.port);

        let routes = self.routes().recover(handle_rejection);

        info!("Web server listening on http://{}", addr);
        warp::serve(routes).run(addr).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher;
    use crate::session_management::SessionHandle;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        sessions: Mutex<Vec<SessionHandle>>,
    }

    impl SessionHooks for Recorder {
        fn on_session_start(&self, session: SessionHandle) {
            dispatcher::configure(&mut session.lock(), "test-app");
            dispatcher::retrieve(&session.lock(), "k");
            self.sessions.lock().unwrap().push(session);
        }
    }

    fn server(hooks: Arc<dyn SessionHooks>, max_sessions: usize) -> (WebServer, Arc<SessionManager>) {
        let config = Config {
            max_sessions,
            ..Default::default()
        };
        let manager = Arc::new(SessionManager::from_config(&config));
        (WebServer::new(&config, manager.clone(), hooks), manager)
    }

    #[tokio::test]
    async fn test_page_injects_scripts() {
        let (server, _) = server(Arc::new(crate::session_management::hooks::NoHooks), 4);
        let res = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 200);
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("<script src=\"/xstorage/xstorage-lib.js\"></script>"));
        assert!(body.contains("<script src=\"/xstorage/xlocalstorage.js\"></script>"));
    }

    #[tokio::test]
    async fn test_assets_are_served() {
        let (server, _) = server(Arc::new(crate::session_management::hooks::NoHooks), 4);
        let routes = server.routes().recover(handle_rejection);

        let res = warp::test::request()
            .path("/xstorage/xlocalstorage.js")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 200);
        let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.contains("javascript"));

        let res = warp::test::request()
            .path("/xstorage/missing.js")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), 404);
    }

    #[tokio::test]
    async fn test_sessions_are_listed() {
        let (server, manager) = server(Arc::new(crate::session_management::hooks::NoHooks), 4);
        let (transport, _outbound) = crate::transport::ChannelTransport::new();
        let handle = manager.create_session(Arc::new(transport)).unwrap();
        dispatcher::configure(&mut handle.lock(), "listed");

        let res = warp::test::request()
            .path("/sessions")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 200);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        let sessions = body.as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0]["id"], handle.id().to_string());
        assert_eq!(sessions[0]["app_name"], "listed");
        assert_eq!(sessions[0]["status"], "Configured");
    }

    #[tokio::test]
    async fn test_websocket_session_round_trip() {
        let recorder = Arc::new(Recorder::default());
        let (server, manager) = server(recorder.clone(), 4);

        let mut client = warp::test::ws()
            .path("/ws")
            .handshake(server.routes())
            .await
            .expect("handshake");

        let configure: Value =
            serde_json::from_str(client.recv().await.unwrap().to_str().unwrap()).unwrap();
        assert_eq!(configure["type"], "configureXLocalStore");
        assert_eq!(configure["message"]["appName"], "test-app");

        let retrieve: Value =
            serde_json::from_str(client.recv().await.unwrap().to_str().unwrap()).unwrap();
        assert_eq!(retrieve["type"], "retrieve");
        let target = retrieve["message"]["target"].as_str().unwrap().to_string();
        assert!(target.starts_with("xLocalStorage_"));

        client
            .send_text(json!({"type": "retrieved", "target": target, "value": "v"}).to_string())
            .await;

        let session = recorder.sessions.lock().unwrap()[0].clone();
        let mut delivered = None;
        for _ in 0..100 {
            delivered = session.lock().inputs().get(&target);
            if delivered.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(delivered, Some(json!("v")));
        assert_eq!(manager.get_active_session_count(), 1);
    }
}
