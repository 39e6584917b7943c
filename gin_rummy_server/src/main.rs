mod config;
mod error;
mod routes;
mod store;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::SharedStore;
use crate::store::SessionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::load()?;
    let store = SharedStore::new(SessionStore::new(config.rules));

    // 后台定期清理长时间无人访问的牌局
    let sweeper = Arc::clone(&store);
    let (idle, every) = (config.session_idle(), config.sweep_interval());
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            sweeper.expire_idle(idle);
        }
    });

    let app = routes::router(store);

    info!("服务器正在监听 {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
