//! Database configuration loaded from environment variables.

/// Connection-pool configuration.
///
/// All fields except the URL have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Maximum pool size (default: `20`).
    pub max_connections: u32,
    /// How long to wait for a free connection, in seconds (default: `30`).
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Build a configuration with default pool settings for the given URL.
    pub fn with_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            max_connections: 20,
            acquire_timeout_secs: 30,
        }
    }

    /// Load configuration from environment variables (after loading `.env`
    /// if present).
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `DATABASE_URL`            | (required) |
    /// | `DB_MAX_CONNECTIONS`      | `20`       |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `30`       |
    ///
    /// # Panics
    ///
    /// Panics when `DATABASE_URL` is unset or a numeric variable fails to
    /// parse -- misconfiguration should fail fast at startup.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        Self {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", 20),
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS", 30),
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is unset.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid value: {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_url_uses_default_pool_settings() {
        let config = DatabaseConfig::with_url("postgres://localhost/atelier");
        assert_eq!(config.url, "postgres://localhost/atelier");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout_secs, 30);
    }

    #[test]
    fn env_parse_falls_back_when_unset() {
        let value: u32 = env_parse("ATELIER_TEST_UNSET_VAR", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn env_parse_reads_a_set_variable() {
        std::env::set_var("ATELIER_TEST_MAX_CONN", "42");
        let value: u32 = env_parse("ATELIER_TEST_MAX_CONN", 7);
        assert_eq!(value, 42);
        std::env::remove_var("ATELIER_TEST_MAX_CONN");
    }
}
