/// Factory: build the process-wide `TokenValidator` from application `Config`.
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::services::auth::TokenValidator;

pub fn build_token_validator(config: &Config) -> Arc<TokenValidator> {
    info!(
        expiration_ms = config.jwt.expiration().as_millis() as u64,
        "JWT signing key loaded"
    );
    Arc::new(TokenValidator::new(&config.jwt))
}
