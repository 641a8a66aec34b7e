use once_cell::sync::Lazy;

/// Postgres connection string. `DATABASE_URL` wins; otherwise the URL is
/// assembled from the `POSTGRES_*` variables.
pub static DATABASE_URL: Lazy<String> =
    Lazy::new(|| database_url_from(|key| std::env::var(key).ok()));

/// Upper bound on pooled Postgres connections. Defaults to `5`.
pub static DATABASE_MAX_CONNECTIONS: Lazy<u32> = Lazy::new(|| {
    std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(5)
});

/// Address the HTTP server should bind to. Defaults to `0.0.0.0`.
pub static BIND_ADDRESS: Lazy<String> =
    Lazy::new(|| std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()));

/// Port the HTTP server should listen on. Defaults to `8080`.
pub static BIND_PORT: Lazy<u16> = Lazy::new(|| {
    std::env::var("BIND_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080)
});

/// When set to a truthy value, allows the application to continue running even if database
/// migrations fail. Defaults to `false`.
pub static ALLOW_MIGRATION_FAILURE: Lazy<bool> = Lazy::new(|| {
    std::env::var("ALLOW_MIGRATION_FAILURE")
        .ok()
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
});

/// Backing store for subscription records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local; records are lost on restart.
    Memory,
}

/// `STORE=memory` runs without a database. Anything else selects Postgres.
pub static STORE: Lazy<StoreBackend> =
    Lazy::new(|| store_backend_from(std::env::var("STORE").ok().as_deref()));

/// Discrete Postgres settings, used when no `DATABASE_URL` is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
}

impl PostgresSettings {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            host: read("POSTGRES_HOST", "localhost"),
            port: read("POSTGRES_PORT", "5432"),
            user: read("POSTGRES_USER", "postgres"),
            password: read("POSTGRES_PASSWORD", "postgres"),
            dbname: read("POSTGRES_DB", "subscriptions"),
            sslmode: read("POSTGRES_SSLMODE", "disable"),
        }
    }

    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.dbname, self.sslmode
        )
    }
}

fn database_url_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("DATABASE_URL")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| PostgresSettings::from_lookup(lookup).connection_url())
}

fn store_backend_from(value: Option<&str>) -> StoreBackend {
    match value.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("memory") => StoreBackend::Memory,
        _ => StoreBackend::Postgres,
    }
}

fn is_truthy(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn explicit_database_url_wins() {
        let url = database_url_from(lookup(&[
            ("DATABASE_URL", "postgres://app:secret@db/subs"),
            ("POSTGRES_HOST", "ignored"),
        ]));
        assert_eq!(url, "postgres://app:secret@db/subs");
    }

    #[test]
    fn url_is_assembled_from_parts() {
        let url = database_url_from(lookup(&[
            ("POSTGRES_HOST", "postgres"),
            ("POSTGRES_USER", "svc"),
            ("POSTGRES_PASSWORD", "pw"),
            ("POSTGRES_SSLMODE", "require"),
        ]));
        assert_eq!(url, "postgres://svc:pw@postgres:5432/subscriptions?sslmode=require");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings = PostgresSettings::from_lookup(lookup(&[("POSTGRES_PORT", " ")]));
        assert_eq!(settings.port, "5432");
        assert_eq!(settings.host, "localhost");
    }

    #[test]
    fn store_backend_defaults_to_postgres() {
        assert_eq!(store_backend_from(None), StoreBackend::Postgres);
        assert_eq!(store_backend_from(Some("postgres")), StoreBackend::Postgres);
        assert_eq!(store_backend_from(Some(" Memory ")), StoreBackend::Memory);
        assert_eq!(store_backend_from(Some("redis")), StoreBackend::Postgres);
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy("YES"));
        assert!(is_truthy(" 1 "));
        assert!(!is_truthy("off"));
    }
}
