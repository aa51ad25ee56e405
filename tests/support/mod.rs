#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use bay_wheels::auth::{AuthError, TokenInfo, TokenStore};
use bay_wheels::ClientConfig;
use wiremock::MockServer;

pub const PHONE: &str = "+14155551234";
pub const CODE: &str = "123456";
pub const EMAIL: &str = "rider@example.com";

#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<TokenInfo>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, token: TokenInfo) {
        *self.token.lock().expect("store lock poisoned") = Some(token);
    }

    pub fn get(&self) -> Option<TokenInfo> {
        self.token.lock().expect("store lock poisoned").clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<TokenInfo>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, token: &TokenInfo) -> Result<(), AuthError> {
        self.seed(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.token.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

pub fn config_for(server: &MockServer, token_path: &Path) -> ClientConfig {
    ClientConfig::builder()
        .base_url(server.uri())
        .token_path(token_path.to_path_buf())
        .build()
}

pub fn offline_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(server.uri())
        .persist_token(false)
        .build()
}

pub fn authed_config(server: &MockServer, token: &str) -> ClientConfig {
    ClientConfig::builder()
        .base_url(server.uri())
        .persist_token(false)
        .access_token(token)
        .build()
}
