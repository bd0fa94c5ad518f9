use log::error;
use timetable_solver::config::AppConfig;
use timetable_solver::server;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    if let Err(e) = server::run_server(config).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
