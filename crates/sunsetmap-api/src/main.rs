use sunsetmap_api::{setup, telemetry};
use sunsetmap_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = Config::from_env()?;
    let port = config.server_port;

    let state = setup::initialize_app(config).await?;
    let router = setup::routes::build_router(state);

    setup::server::start_server(router, port).await
}
