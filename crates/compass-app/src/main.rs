use salvo::conn::TcpListener;
use salvo::{Listener, Router};

use compass_app::app::api::routes;
use compass_app::codec_handler::CodecHandler;
use compass_app::config::ConfigHandler;
use compass_app::store_handler::StoreHandler;
use compass_core::config::load_config;
use compass_core::util::idcodec::IdCodec;
use compass_db::db::connection::create_pool;
use compass_service::store::PgAuthStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Course Compass server");

    let config = load_config()?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        cookie = %config.auth.cookie_name,
        "Configuration loaded"
    );

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    tracing::info!("Database connection pool created.");

    let codec = IdCodec::new(&config.auth.salt, config.auth.min_token_length);

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .hoop(StoreHandler::new(PgAuthStore::new(pool)))
        .hoop(CodecHandler::new(codec))
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
