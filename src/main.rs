use anyhow::Context;
use author_management_service::config::Config;
use author_management_service::queue::QueueAdapter;
use author_management_service::queue::amqp::AmqpBroker;
use author_management_service::router::CommandRouter;
use author_management_service::rpc::RpcAdapter;
use author_management_service::sqlite::Sqlite;
use std::sync::Arc;
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let store = Arc::new(Sqlite::new(config.database_url()).await?);
    let router = CommandRouter::new(store);

    let rpc_address = config.rpc_address();
    let rpc_server = Server::builder()
        .add_service(RpcAdapter::new(router.clone()).into_service())
        .serve(rpc_address);
    info!("gRPC server started at {rpc_address}");

    let broker = AmqpBroker::connect(config.amqp_url(), config.queue_name()).await?;
    let queue = QueueAdapter::new(router, broker);

    tokio::try_join!(
        async {
            rpc_server
                .await
                .with_context(|| format!("gRPC server on {rpc_address} failed"))
        },
        queue.run(),
    )?;

    Ok(())
}
