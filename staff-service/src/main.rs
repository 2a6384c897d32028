use std::{env, sync::Arc};

use axum::http::HeaderValue;
use shared::telemetry::{TelemetryConfig, init_telemetry};
use sqlx::postgres::PgPoolOptions;
use staff_service::{
    api::{
        handler::{health, staff},
        router::build_router,
        state::StaffServiceAppState,
    },
    config::{DEFAULT_CONFIG_PATH, ServiceConfig},
    domain::{
        service::StaffService,
        staff::{CreateStaff, StaffRepository, StaffView, UpdateStaff},
    },
    infrastructure::{
        cache::{client::RedisCache, staff::CachedStaffRepository},
        memory::InMemoryStaffRepository,
        staff::PgStaffRepository,
    },
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const SERVICE_NAME: &str = "staff-service";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        staff::find_all,
        staff::find_by_id,
        staff::create,
        staff::update,
        staff::delete,
        staff::search,
        staff::export_csv,
        staff::export_excel,
        staff::departments,
        staff::positions,
    ),
    components(schemas(
        CreateStaff,
        UpdateStaff,
        StaffView,
        shared::responses::ErrorResponse,
        shared::responses::FieldViolation,
        shared::responses::HealthResponse,
    )),
    tags(
        (name = "Staff", description = "Staff records management"),
        (name = "Health", description = "Liveness"),
    )
)]
struct ApiDoc;

async fn build_repository(config: &ServiceConfig) -> Arc<dyn StaffRepository> {
    let store: Arc<dyn StaffRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await
                .expect("Failed to establish connection into Postgres");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run database migrations");

            tracing::info!("Using PostgreSQL staff store");
            Arc::new(PgStaffRepository::new(pool))
        }
        None if config.seed_demo_data => {
            tracing::info!("Using in-memory staff store with demo data");
            Arc::new(InMemoryStaffRepository::seeded())
        }
        None => {
            tracing::info!("Using empty in-memory staff store");
            Arc::new(InMemoryStaffRepository::new())
        }
    };

    match &config.redis_url {
        Some(redis_url) => {
            let cache = RedisCache::connect(redis_url, SERVICE_NAME)
                .await
                .expect("Failed to connect to Redis");
            Arc::new(CachedStaffRepository::new(store, cache))
        }
        None => store,
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let origin = origin
        .parse::<HeaderValue>()
        .expect("CORS_ORIGIN must be a valid header value");

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tokio::main]
async fn main() {
    let _guard = init_telemetry(&TelemetryConfig::from_env(SERVICE_NAME));

    let config_path =
        env::var("STAFF_SERVICE_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = ServiceConfig::load(&config_path).expect("Failed to load staff-service config");

    let repository = build_repository(&config).await;
    let state = Arc::new(StaffServiceAppState {
        staff_service: Arc::new(StaffService::new(repository, config.timezone())),
    });

    let app = build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&config.cors_origin))
        // tracing log (turn request into info level)
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        );

    let port = config.server_port;
    tracing::info!("staff-service listening on 0.0.0.0:{port}");

    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shared::shutdown::shutdown_signal())
        .await
        .expect("Oppsie! Server crashed!");

    tracing::info!("staff-service shut down");
}
