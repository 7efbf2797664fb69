pub mod app_state;
pub mod auth_config;

pub use app_state::AppState;
pub use auth_config::AuthConfig;
