use std::future::Future;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::metrics_middleware::setup_metrics_recorder;
use crate::router;
use crate::time::SystemTime;

pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics = if config.enable_metrics {
        Some(setup_metrics_recorder()?)
    } else {
        None
    };

    let app = router::router(SystemTime {}, &config.static_dir, metrics);

    let addr = listener.local_addr()?;
    tracing::info!("timestamp api listening on {}", addr);
    tracing::info!("local: http://localhost:{}/", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
