use rampart::config::Config;
use rampart::server::Server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();

    let server = Server::new(cfg);
    server.run().await?;

    Ok(())
}
