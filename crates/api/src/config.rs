use std::str::FromStr;

/// Which [`AgreementStore`](gigbridge_db::AgreementStore) backend to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "Invalid STORAGE_BACKEND '{other}'. Must be one of: postgres, memory"
            )),
        }
    }
}

/// Where contracts produced by request matching are sent.
#[derive(Debug, Clone)]
pub struct ContractServiceConfig {
    /// Base URL of the remote contract service, e.g. `http://contracts:3000`.
    pub url: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first when the service cannot be reached.
    pub retries: u32,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub storage: StorageBackend,
    /// Required when `storage` is [`StorageBackend::Postgres`].
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// `None` keeps contracts in this process's own store.
    pub contract_service: Option<ContractServiceConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `STORAGE_BACKEND`               | `postgres`              |
    /// | `DATABASE_URL`                  | (none)                  |
    /// | `DB_MAX_CONNECTIONS`            | `20`                    |
    /// | `CONTRACT_SERVICE_URL`          | (none, co-located)      |
    /// | `CONTRACT_SERVICE_TIMEOUT_SECS` | `10`                    |
    /// | `CONTRACT_SERVICE_RETRIES`      | `2`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let storage: StorageBackend = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .parse()
            .unwrap_or_else(|e| panic!("{e}"));

        let database_url = std::env::var("DATABASE_URL").ok();

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .map(|v| v.parse().expect("DB_MAX_CONNECTIONS must be a valid u32"))
            .unwrap_or(gigbridge_db::DEFAULT_MAX_CONNECTIONS);

        let contract_service = std::env::var("CONTRACT_SERVICE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| ContractServiceConfig {
                url: url.trim().trim_end_matches('/').to_string(),
                timeout_secs: std::env::var("CONTRACT_SERVICE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".into())
                    .parse()
                    .expect("CONTRACT_SERVICE_TIMEOUT_SECS must be a valid u64"),
                retries: std::env::var("CONTRACT_SERVICE_RETRIES")
                    .unwrap_or_else(|_| "2".into())
                    .parse()
                    .expect("CONTRACT_SERVICE_RETRIES must be a valid u32"),
            });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
            database_url,
            db_max_connections,
            contract_service,
        }
    }
}
