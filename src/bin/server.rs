use axum::{
    routing::{get, post},
    Extension, Router,
};
use hvac_triage::classifier::EmergencyClassifier;
use hvac_triage::notifications::SmsNotifier;
use hvac_triage::{api, escalation, migrator};
use sea_orm::{Database, DatabaseConnection};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    hvac_triage::telemetry::init_telemetry("hvac-triage-server");

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    // Database Connection
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    hvac_triage::metrics::init_metrics(&db).await;

    let notifier = SmsNotifier::new();
    let classifier = Arc::new(EmergencyClassifier::new());

    // Pending escalation windows live in the database; the sweeper picks
    // them back up after a restart.
    escalation::start_escalation_sweeper(db.clone(), notifier.clone());

    let app = app(db, notifier, classifier, prometheus_layer, metric_handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> &'static str {
    "OK"
}

fn app(
    db: DatabaseConnection,
    notifier: SmsNotifier,
    classifier: Arc<EmergencyClassifier>,
    prometheus_layer: axum_prometheus::PrometheusMetricLayer<'static>,
    metric_handle: metrics_exporter_prometheus::PrometheusHandle,
) -> Router {
    let webhook_routes = Router::new()
        .route("/webhook/voice", post(api::webhook::handle_voice_event))
        .route("/webhook/sms", post(api::sms::handle_inbound_sms))
        .route("/webhook/lookup-customer", post(api::tools::lookup_customer))
        .route(
            "/webhook/dispatch-emergency",
            post(api::tools::dispatch_emergency),
        )
        .route("/webhook/check-calendar", post(api::tools::check_calendar));

    let api_routes = Router::new()
        .route("/api/businesses", post(api::business::create_business))
        .route(
            "/api/businesses/:id",
            get(api::business::get_business).patch(api::business::update_business),
        )
        .route("/api/technicians", post(api::technician::create_technician))
        .route(
            "/api/businesses/:id/technicians",
            get(api::technician::list_on_call_technicians),
        )
        .route(
            "/api/businesses/:id/calls",
            get(api::calls::list_business_calls),
        )
        .route(
            "/api/businesses/:id/calls/latest",
            get(api::calls::get_latest_call),
        )
        .route("/api/calls/:id", get(api::calls::get_call))
        .route(
            "/api/businesses/:id/reports/generate",
            post(api::reports::generate_report),
        )
        .route(
            "/api/businesses/:id/reports/:date",
            get(api::reports::get_report),
        );

    let frontend_origin =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    Router::new()
        .route("/health", get(health_check))
        .merge(webhook_routes)
        .merge(api_routes)
        .layer(Extension(db))
        .layer(Extension(notifier))
        .layer(Extension(classifier))
        .layer(prometheus_layer)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        // Filled in by handlers where relevant
                        call_id = tracing::field::Empty,
                        business_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(
                    frontend_origin
                        .parse::<axum::http::HeaderValue>()
                        .expect("FRONTEND_URL must be a valid origin"),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_credentials(true),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
}
