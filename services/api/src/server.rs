use crate::cli::ServeArgs;
use crate::infra::{mock_agenda_service, AppState};
use crate::routes::with_agenda_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dieti_agenda::config::AppConfig;
use dieti_agenda::error::AppError;
use dieti_agenda::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let agenda = mock_agenda_service(&config.agenda, None, None);

    let app = with_agenda_routes(agenda.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Requests are answered with 503 until both fetches have landed.
    tokio::spawn(async move {
        match agenda.load().await {
            Ok(transition) => {
                readiness_flag.store(true, Ordering::Release);
                info!(?transition, "agenda ready");
            }
            Err(err) => error!(error = %err, "agenda failed to load"),
        }
    });

    info!(
        ?config.environment,
        %addr,
        policy = config.agenda.overlap_policy.label(),
        "agenda service listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
