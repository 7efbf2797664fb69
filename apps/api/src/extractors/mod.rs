pub mod auth_token;
pub mod verified_user;

pub use auth_token::AuthToken;
pub use verified_user::VerifiedUser;
