/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Postgres connection string used for every invocation.
    pub database_url: String,
    /// HTTP request timeout in seconds (default: `330`). Kept above the
    /// upload timeout so slow uploads fail with the upstream error instead.
    pub request_timeout_secs: u64,
    /// Admin secret for mutating requests.
    pub admin: AdminConfig,
    /// External storage service settings.
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default     |
    /// |------------------------|-------------|
    /// | `HOST`                 | `0.0.0.0`   |
    /// | `PORT`                 | `3000`      |
    /// | `DATABASE_URL`         | (required)  |
    /// | `REQUEST_TIMEOUT_SECS` | `330`       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "330".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            database_url,
            request_timeout_secs,
            admin: AdminConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

/// Shared admin secret settings.
#[derive(Clone, Default)]
pub struct AdminConfig {
    /// Expected value of the admin password. Empty denies all mutations
    /// unless `allow_empty_password` is set.
    pub password: String,
    pub allow_empty_password: bool,
}

impl AdminConfig {
    /// | Env Var                      | Default  |
    /// |------------------------------|----------|
    /// | `ADMIN_PASSWORD`             | (empty)  |
    /// | `ADMIN_ALLOW_EMPTY_PASSWORD` | `false`  |
    pub fn from_env() -> Self {
        let password = std::env::var("ADMIN_PASSWORD").unwrap_or_default();

        let allow_empty_password: bool = std::env::var("ADMIN_ALLOW_EMPTY_PASSWORD")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("ADMIN_ALLOW_EMPTY_PASSWORD must be true or false");

        if password.is_empty() && !allow_empty_password {
            tracing::warn!("ADMIN_PASSWORD is not set; all mutating requests will be rejected");
        }

        Self {
            password,
            allow_empty_password,
        }
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &"<redacted>")
            .field("allow_empty_password", &self.allow_empty_password)
            .finish()
    }
}

/// Where uploads go and how long we wait for them.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Multipart upload endpoint.
    pub upload_url: String,
    /// Public prefix for stored files, used when the service omits `url`.
    pub cdn_prefix: String,
    /// Upload timeout in seconds.
    pub upload_timeout_secs: u64,
}

impl StorageConfig {
    pub const DEFAULT_UPLOAD_URL: &'static str = "https://api.poehali.dev/storage/upload";
    pub const DEFAULT_CDN_PREFIX: &'static str = "https://cdn.poehali.dev/files";

    /// | Env Var               | Default                                  |
    /// |-----------------------|------------------------------------------|
    /// | `STORAGE_UPLOAD_URL`  | `https://api.poehali.dev/storage/upload` |
    /// | `STORAGE_CDN_PREFIX`  | `https://cdn.poehali.dev/files`          |
    /// | `UPLOAD_TIMEOUT_SECS` | `300`                                    |
    pub fn from_env() -> Self {
        let upload_url = std::env::var("STORAGE_UPLOAD_URL")
            .unwrap_or_else(|_| Self::DEFAULT_UPLOAD_URL.into());

        let cdn_prefix = std::env::var("STORAGE_CDN_PREFIX")
            .unwrap_or_else(|_| Self::DEFAULT_CDN_PREFIX.into());

        let upload_timeout_secs: u64 = std::env::var("UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("UPLOAD_TIMEOUT_SECS must be a valid u64");

        Self {
            upload_url,
            cdn_prefix,
            upload_timeout_secs,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_url: Self::DEFAULT_UPLOAD_URL.into(),
            cdn_prefix: Self::DEFAULT_CDN_PREFIX.into(),
            upload_timeout_secs: dubsite_storage::DEFAULT_UPLOAD_TIMEOUT.as_secs(),
        }
    }
}
