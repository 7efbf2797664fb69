use actix_web::{web, App, HttpServer};
use sso_api::middleware::{cors_middleware, JsonBody, RequestTrace, StructuredLogger, TraceSpan};
use sso_api::{routes, AppState, Config};
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (AUTH_ISSUER and AUTH_AUDIENCE are required, see `Config::from_env`).
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting SSO API on http://{}:{}",
        config.host, config.port
    );
    info!(
        issuer = %config.auth.issuer,
        audience = %config.auth.audience,
        jwks_uri = %config.auth.jwks_uri,
        "verifying tokens against identity provider"
    );

    let data = web::Data::new(AppState::from_auth_config(&config.auth));
    let json_body = JsonBody::new(config.max_json_payload_size);

    HttpServer::new(move || {
        App::new()
            .wrap(json_body)
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
