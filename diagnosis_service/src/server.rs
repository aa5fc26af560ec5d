use crate::{
    classifier::Classifier,
    config::{Config, CorsConfig},
    cors::build_cors_layer,
    model_service::ModelService,
    ort_service::OrtModelService,
    routes::api_routes,
    state::SharedState,
    task::Task,
    telemetry::Metrics,
    upload::ensure_upload_dir,
};
use axum::{extract::DefaultBodyLimit, Router};
use axum_otel_metrics::HttpMetricsLayerBuilder;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};

pub fn build_router<M: ModelService>(
    state: SharedState<M>,
    max_body_bytes: usize,
    cors: &CorsConfig,
) -> Router {
    let router = Router::new()
        .merge(api_routes::<M>())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes));

    match build_cors_layer(cors) {
        Some(cors_layer) => router.layer(cors_layer),
        None => router,
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<M: ModelService>(
        state: SharedState<M>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let addr = config.server.get_address();
        let metrics_layer = HttpMetricsLayerBuilder::new().build();

        let router = build_router(state, config.upload.max_body_bytes, &config.cors)
            .layer(metrics_layer);

        let listener = TcpListener::bind(&addr).await?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("Diagnosis service listening on {}", self.listener.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async {
                shutdown_signal().await;
                tracing::info!("Shutdown signal received, starting graceful shutdown");
            })
            .await?;

        Ok(())
    }
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    ensure_upload_dir(&config.upload.dir)?;

    let tumor_model = OrtModelService::new(&config.models.tumor)?;
    let skin_model = OrtModelService::new(&config.models.skin)?;
    let metrics = Arc::new(Metrics::new()?);

    let state = SharedState::new(
        Classifier::new(Task::Tumor, tumor_model, config.models.tumor.input_size),
        Classifier::new(Task::Skin, skin_model, config.models.skin.input_size),
        config.upload.dir.clone(),
        metrics,
    );

    let server = HttpServer::new(state, &config).await?;
    server.run().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
