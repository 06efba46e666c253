use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub default_user: DefaultUserConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub jwt_leeway: Duration,
}

// Keeps the secret out of startup logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("token_ttl", &self.token_ttl)
            .field("jwt_leeway", &self.jwt_leeway)
            .finish()
    }
}

/// Local content store configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded file bytes
    pub root: PathBuf,
    /// Largest accepted upload in bytes
    pub max_file_size: u64,
}

/// Account provisioned at startup so a fresh install can sign in
#[derive(Clone)]
pub struct DefaultUserConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for DefaultUserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultUserConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            default_user: DefaultUserConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_TOKEN_TTL: &'static str = "7d";
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "JWT_SECRET environment variable is required".to_string())?;

        let token_ttl = parse_duration(
            &env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| Self::DEFAULT_TOKEN_TTL.to_string()),
        )
        .ok_or_else(|| "JWT_EXPIRES_IN must look like 3600, 45m, 12h or 7d".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            token_ttl,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl StorageConfig {
    const DEFAULT_ROOT: &'static str = "./uploads";
    const DEFAULT_MAX_FILE_SIZE: &'static str = "50mb";

    pub fn from_env() -> Result<Self, String> {
        let root = PathBuf::from(
            env::var("FILE_STORAGE_PATH").unwrap_or_else(|_| Self::DEFAULT_ROOT.to_string()),
        );

        let max_file_size = parse_byte_size(
            &env::var("MAX_FILE_SIZE").unwrap_or_else(|_| Self::DEFAULT_MAX_FILE_SIZE.to_string()),
        )
        .ok_or_else(|| "MAX_FILE_SIZE must look like 52428800, 512kb or 50mb".to_string())?;

        Ok(Self {
            root,
            max_file_size,
        })
    }
}

impl DefaultUserConfig {
    pub fn from_env() -> Result<Self, String> {
        let username = env::var("DEFAULT_USERNAME")
            .unwrap_or_else(|_| "admin".to_string())
            .trim()
            .to_string();
        let password = env::var("DEFAULT_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        if !(3..=30).contains(&username.chars().count()) {
            return Err("DEFAULT_USERNAME must be 3-30 characters".to_string());
        }
        if password.is_empty() {
            return Err("DEFAULT_PASSWORD must not be empty".to_string());
        }

        Ok(Self { username, password })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Cloud Drive API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Personal file storage: upload, list, download, delete".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

/// Parse a byte size such as `52428800`, `512kb`, `50mb` or `1gb` (binary multiples).
fn parse_byte_size(raw: &str) -> Option<u64> {
    let value = raw.trim().to_ascii_lowercase();
    let (digits, multiplier) = if let Some(n) = value.strip_suffix("gb") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("mb") {
        (n, 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("kb") {
        (n, 1024)
    } else if let Some(n) = value.strip_suffix('b') {
        (n, 1)
    } else {
        (value.as_str(), 1)
    };

    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Parse a duration such as `3600`, `30s`, `45m`, `12h` or `7d`.
fn parse_duration(raw: &str) -> Option<Duration> {
    let value = raw.trim().to_ascii_lowercase();
    let (digits, unit_secs) = match value.chars().last()? {
        's' => (&value[..value.len() - 1], 1),
        'm' => (&value[..value.len() - 1], 60),
        'h' => (&value[..value.len() - 1], 60 * 60),
        'd' => (&value[..value.len() - 1], 24 * 60 * 60),
        _ => (value.as_str(), 1),
    };

    let secs = digits.trim().parse::<u64>().ok()?.checked_mul(unit_secs)?;
    (secs > 0).then(|| Duration::from_secs(secs))
}
