use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{get, http::header, web, App, HttpResponse, HttpServer, Responder};
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use finboard::config::AppConfig;
use finboard::remote::NotionClient;
use finboard::state::AppState;
use finboard::{account, auth, openapi, summary, transaction};

/// Health check endpoint that reports whether the remote source is reachable in principle
#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let remote = if state.config.require_api_key().is_ok() {
        "configured"
    } else {
        "unconfigured"
    };
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "remote": remote
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("CRITICAL: {e}. Refusing to start.");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    if config.require_api_key().is_err() {
        error!("NOTION_API_KEY is not set; data endpoints will answer 500 until it is");
    }

    let source = Arc::new(NotionClient::new(
        config.notion_base_url.clone(),
        config.notion_api_key.clone(),
    ));
    let allowed_origins = config.cors_allowed_origins.clone();
    let bind_addr = (config.host.clone(), config.port);
    let state = web::Data::new(AppState::new(config, source));

    info!(
        "Starting server at http://{}:{} (source error policy: {:?})",
        bind_addr.0, bind_addr.1, state.config.source_error_policy
    );

    // Rate limiting for login: burst of 5, then one request per second
    let login_governor_config = match GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .finish()
    {
        Some(config) => config,
        None => {
            error!("Invalid rate limiter configuration");
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid rate limiter configuration",
            ));
        }
    };

    HttpServer::new(move || {
        let allowed_origins = allowed_origins.clone();

        // Session cookies need credentialed CORS
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins
                    .split(',')
                    .any(|allowed| allowed.trim() == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            // Middleware (order matters: outer to inner)
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(state.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
            .service(health_check)
            .service(auth::logout)
            .service(auth::user)
            .service(account::bank_details)
            .service(account::credit_card_details)
            .service(account::financial_details)
            .service(transaction::bank_transactions)
            .service(transaction::credit_card_transactions)
            .service(summary::monthly_expenses)
            .service(summary::monthly_income)
            .service(summary::monthly_investments)
            .service(summary::yearly_summary)
            // Rate limited login (must be last to avoid catching all routes)
            .service(
                web::scope("")
                    .wrap(Governor::new(&login_governor_config))
                    .service(auth::login),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
