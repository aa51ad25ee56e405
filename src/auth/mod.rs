//! SMS login flow, access token, and token persistence.

pub mod error;
pub mod manager;
pub mod store;
pub mod token;

pub use error::{AuthError, RequiredField, EMAIL_VERIFICATION_REQUIRED};
pub use manager::{validate_phone_number, AuthManager, AuthState};
pub use store::{FileTokenStore, TokenStore};
pub use token::TokenInfo;
