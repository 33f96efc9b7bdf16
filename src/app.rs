//! Application setup and wiring

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use scanyard_core::Config;
use scanyard_core::config::StoreBackend;
use scanyard_core::infrastructure::cache::DragonflyCache;
use scanyard_orchestrator::application::{ScanPipeline, ScanningService};
use scanyard_orchestrator::infrastructure::{DragonflyScanStore, InMemoryScanStore, ScanStore};
use scanyard_orchestrator::presentation::{AppState, create_router};
use scanyard_scanners::{DockerCliRuntime, DockleScanner, TrivyScanner};

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub scanning_service: Arc<ScanningService>,
}

impl AppHandle {
    /// Stop accepting scans and wait for queued ones to finish
    pub async fn shutdown(&self) {
        self.scanning_service.shutdown().await;
    }
}

async fn create_store(
    config: &Config,
) -> Result<Arc<dyn ScanStore>, Box<dyn std::error::Error + Send + Sync>> {
    let report_ttl = config.store.report_ttl();

    let store: Arc<dyn ScanStore> = match config.store.backend {
        StoreBackend::Dragonfly => {
            let cache = DragonflyCache::new(
                &config.store.dragonfly_url,
                config.store.password.as_deref(),
            )
            .await?;
            tracing::info!(url = %config.store.dragonfly_url, "Connected to Dragonfly scan store");
            Arc::new(DragonflyScanStore::new(Arc::new(cache), report_ttl))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory scan store; scan state is lost on restart");
            Arc::new(InMemoryScanStore::new(report_ttl))
        }
    };

    store.ping().await?;
    tracing::info!(
        report_ttl_seconds = report_ttl.as_secs(),
        "Scan store initialized"
    );
    Ok(store)
}

/// Create the application with all dependencies wired up
pub async fn create_app(
    config: Config,
) -> Result<AppHandle, Box<dyn std::error::Error + Send + Sync>> {
    let startup_time = Instant::now();

    let store = create_store(&config).await?;

    // External tools are only needed once a scan runs, so a missing binary
    // is reported but does not stop the server.
    let runtime = DockerCliRuntime::from_config(&config.runtime);
    match runtime.check_installation().await {
        Ok(version) => tracing::info!(version = %version, "Container runtime available"),
        Err(e) => tracing::warn!(error = %e, "Container runtime unavailable; scans will fail"),
    }

    let trivy = TrivyScanner::new(config.scanners.trivy.clone());
    match trivy.check_installation().await {
        Ok(version) => tracing::info!(version = %version, "Vulnerability scanner available"),
        Err(e) => tracing::warn!(
            error = %e,
            "Vulnerability scanner unavailable; reports will have empty vulnerability sections"
        ),
    }

    let dockle = DockleScanner::new(config.scanners.dockle.clone());
    match dockle.check_installation().await {
        Ok(version) => tracing::info!(version = %version, "Audit scanner available"),
        Err(e) => tracing::warn!(
            error = %e,
            "Audit scanner unavailable; reports will have empty audit sections"
        ),
    }

    let pipeline = ScanPipeline::new(Arc::new(runtime), Arc::new(trivy), Arc::new(dockle));
    let scanning_service = Arc::new(ScanningService::start(
        store,
        pipeline,
        config.queue.capacity,
    ));

    let state = AppState {
        scanning_service: scanning_service.clone(),
        versions_file: Arc::new(config.server.versions_file.clone()),
    };
    let router = create_router(state, &config.server);

    tracing::info!(
        startup_ms = startup_time.elapsed().as_millis() as u64,
        "Application initialized"
    );

    Ok(AppHandle {
        router,
        scanning_service,
    })
}
