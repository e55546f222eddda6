use dotenv::dotenv;
use faktura::config::print_faktura_logo;
use faktura::http::server::Server;
use faktura::telemetry;

#[tokio::main]
async fn main() {
    let _ = dotenv(); // load .env if present
    telemetry::init_tracing_subscriber();

    print_faktura_logo();
    log::info!("Starting up");

    match Server::new_from_env().await {
        Ok(server) => server.run().await,
        Err(err) => {
            log::error!("Failed to start: {err}");
            std::process::exit(1);
        }
    }
}
