use env_logger::Env;
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use xlocalstore::configuration::config::Config;
use xlocalstore::dispatcher;
use xlocalstore::session_management::SessionManager;
use xlocalstore::storage::memory_storage::MemoryClientStore;
use xlocalstore::storage::ClientStore;
use xlocalstore::transport::channel_transport::ChannelTransport;
use xlocalstore::transport::loopback::LoopbackClient;

#[tokio::main]
async fn main() {
    // Initialize logger (RUST_LOG can override; default to info)
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    let config = Config::default();
    let manager = Arc::new(SessionManager::from_config(&config));
    let store = Arc::new(MemoryClientStore::new());

    // Browser side: an in-memory store answering like the bundled shim
    let (transport, outbound) = ChannelTransport::new();
    let session = match manager.create_session(Arc::new(transport)) {
        Ok(session) => session,
        Err(e) => {
            warn!("Cannot open session: {}", e);
            return;
        }
    };
    let client = LoopbackClient::new(store.clone());
    tokio::spawn(client.run(outbound, manager.clone(), session.id()));

    let prefix = dispatcher::configure(&mut session.lock(), "app1");
    info!("Session {} configured with prefix {}", session.id(), prefix);

    dispatcher::store(&session.lock(), "x", json!("hello"));
    dispatcher::store(&session.lock(), "colors", json!(["red", "green"]));

    // Legacy read: the slot is still empty on the first cycle
    let stale = dispatcher::retrieve(&session.lock(), "x");
    info!("Legacy retrieve of x returned {:?}", stale);

    let pending = dispatcher::request(&mut session.lock(), "x");
    match pending.with_timeout(config.retrieve_timeout()).await {
        Ok(value) => info!("Awaited retrieve of x returned {:?}", value),
        Err(e) => warn!("Retrieve of x failed: {}", e),
    }

    dispatcher::remove(&session.lock(), "x");
    let pending = dispatcher::request(&mut session.lock(), "x");
    match pending.with_timeout(Duration::from_secs(1)).await {
        Ok(value) => info!("After remove, x is {:?}", value),
        Err(e) => warn!("Retrieve of x failed: {}", e),
    }

    dispatcher::clear(&session.lock());
    let pending = dispatcher::request(&mut session.lock(), "colors");
    match pending.with_timeout(Duration::from_secs(1)).await {
        Ok(value) => info!("After clear, colors is {:?}", value),
        Err(e) => warn!("Retrieve of colors failed: {}", e),
    }

    match store.keys("app1") {
        Ok(keys) => info!("Client instance app1 holds {} key(s)", keys.len()),
        Err(e) => warn!("Cannot list client keys: {}", e),
    }

    if let Err(e) = manager.close_session(session.id()) {
        warn!("Cannot close session: {}", e);
    }
}
