//! # Server configuration from the environment
//!
//! Read once per process. `.env` is loaded through `dotenvy` first, so local
//! development only needs a `.env` file next to the binary.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `DATABASE_URL` | required | PostgreSQL connection string |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | Pool size |
//! | `SESSION_SECURE` | `false` | Mark the session cookie `Secure` (set behind HTTPS) |
//! | `SESSION_INACTIVITY_DAYS` | `7` | Session expiry after inactivity |
//! | `ADMIN_EMAILS` | empty | Comma-separated emails that carry the admin claim |
//! | `ADMIN_BOOTSTRAP_EMAIL` / `ADMIN_BOOTSTRAP_PASSWORD` | unset | Create or reset this admin account on startup |

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub session_secure: bool,
    pub session_inactivity_days: i64,
    pub admin_emails: Vec<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Build the config from any variable lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError("DATABASE_URL must be set".to_string()))?;

        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
        let session_secure = parse_or(&lookup, "SESSION_SECURE", false)?;
        let session_inactivity_days = parse_or(&lookup, "SESSION_INACTIVITY_DAYS", 7)?;

        let admin_emails = lookup("ADMIN_EMAILS")
            .map(|list| {
                list.split(',')
                    .map(normalize_email)
                    .filter(|email| !email.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let bootstrap_admin = match (
            lookup("ADMIN_BOOTSTRAP_EMAIL"),
            lookup("ADMIN_BOOTSTRAP_PASSWORD"),
        ) {
            (Some(email), Some(password)) if !password.is_empty() => Some(BootstrapAdmin {
                email: normalize_email(&email),
                password,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError(
                    "ADMIN_BOOTSTRAP_EMAIL and ADMIN_BOOTSTRAP_PASSWORD must be set together"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            database_url,
            max_connections,
            session_secure,
            session_inactivity_days,
            admin_emails,
            bootstrap_admin,
        })
    }

    #[cfg(feature = "server")]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Whether `email` is listed in `ADMIN_EMAILS`.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}

/// Emails are compared trimmed and lower-cased everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError(format!("{key} has an invalid value: {raw}"))),
        _ => Ok(default),
    }
}

#[cfg(feature = "server")]
static CONFIG: tokio::sync::OnceCell<ServerConfig> = tokio::sync::OnceCell::const_new();

/// The process-wide config, loaded on first use.
#[cfg(feature = "server")]
pub async fn config() -> Result<&'static ServerConfig, ConfigError> {
    CONFIG
        .get_or_try_init(|| async { ServerConfig::from_env() })
        .await
}
