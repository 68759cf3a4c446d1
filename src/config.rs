/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, APP_ENV, JWT_SECRET, JWT_EXPIRATION)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は immutable。gate / validator には参照で渡す
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// HMAC-SHA256 needs at least a 256-bit key.
pub const MIN_SECRET_BYTES: usize = 32;

/// Used when `JWT_EXPIRATION` is missing or not positive.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_millis(3_600_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    BlankSecret,
    WeakSecret { len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::BlankSecret => write!(f, "JWT secret must not be blank"),
            ConfigError::WeakSecret { len } => write!(
                f,
                "JWT secret must be at least {} bytes, got {}",
                MIN_SECRET_BYTES, len
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Signing secret and token lifetime, fixed for the life of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtSettings {
    secret: String,
    expiration: Duration,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl JwtSettings {
    /// `expiration_ms <= 0` falls back to [`DEFAULT_EXPIRATION`] instead of failing,
    /// so the gateway still boots with partial configuration.
    pub fn new(secret: impl Into<String>, expiration_ms: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::BlankSecret);
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret { len: secret.len() });
        }

        let expiration = u64::try_from(expiration_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_EXPIRATION);

        Ok(Self { secret, expiration })
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub jwt: JwtSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let expiration_ms = lookup("JWT_EXPIRATION")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        let jwt = JwtSettings::new(secret, expiration_ms)?;

        Ok(Self {
            addr,
            app_env,
            jwt,
        })
    }
}
