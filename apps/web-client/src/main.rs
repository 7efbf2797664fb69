use sso_web_client::{
    ApiCaller, AuthSession, CallKind, CallState, ClientConfig, EnvTokenRenewer, RedirectSession,
    SessionError,
};
use time::OffsetDateTime;
use tracing::info;

mod telemetry;

fn render(kind: CallKind, state: &CallState) {
    println!("── {kind:?} endpoint ({})", kind.path());
    if let Some(result) = &state.result {
        println!("   {} {}", result.status, result.status_text);
        println!(
            "   {}",
            serde_json::to_string_pretty(&result.body).unwrap_or_else(|_| result.body.to_string())
        );
    }
    if let Some(error) = &state.error {
        println!("   ⚠️  {error}");
    }
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    info!(domain = %config.domain, api = %config.api_base_url, "client configured");

    let session = RedirectSession::new(config.clone(), EnvTokenRenewer::default());
    let caller = ApiCaller::new(session, config.api_base_url.clone());

    render(CallKind::Public, &caller.call_public().await);

    match caller.get_token().await {
        Ok(snapshot) => match snapshot.decoded {
            Some(decoded) => {
                println!("🔑 Access token (decoded, not verified)");
                println!(
                    "{}",
                    serde_json::to_string_pretty(&decoded).unwrap_or_default()
                );
                if let Some(left) = decoded.expires_in(OffsetDateTime::now_utc()) {
                    println!("   expires in {}s", left.as_secs());
                }
            }
            None => println!("🔑 Access token obtained (opaque)"),
        },
        Err(SessionError::LoginRequired { login_url }) => {
            println!("🔐 Not logged in. Open this URL to sign in:\n   {login_url}");
        }
        Err(e) => eprintln!("❌ {e}"),
    }

    render(CallKind::Protected, &caller.call_protected().await);

    if caller.session().is_authenticated() {
        if let Ok(url) = caller.session().logout() {
            println!("👋 Log out at {url}");
        }
    }
}
