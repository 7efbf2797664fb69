#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod caller;
pub mod config;
pub mod inspector;
pub mod session;

pub use caller::{ApiCaller, ApiResult, CallError, CallKind, CallState, TokenSnapshot};
pub use config::{ClientConfig, ConfigError};
pub use inspector::{inspect_token, DecodedToken, InspectError};
pub use session::{
    AuthSession, EnvTokenRenewer, RedirectSession, RenewError, SessionError, SilentRenewer,
};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    api_test_support::logging::init();
}
