use log::{error, info};
use xlocalstore::configuration::config::Config;
use xlocalstore::controller::controller_handler::Controller;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    info!("xlocalstore v{}", env!("CARGO_PKG_VERSION"));
    info!("Importing configuration");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to import configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration imported successfully");

    let controller = match Controller::new(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Unable to create a controller instance: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        result = controller.run() => {
            if let Err(e) = result {
                error!("Error occured in the controller process: {}, exiting...", e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            controller.shutdown();
        }
    }
}
