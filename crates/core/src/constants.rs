//! Shared constants for contact-identity.

/// Maximum accepted email length, in UTF-16 code units.
pub const MAX_EMAIL_LEN: usize = 1000;

/// Maximum accepted phone number length, in UTF-16 code units.
pub const MAX_PHONE_LEN: usize = 20;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Port the HTTP server binds when neither `--port` nor `PORT` is given.
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Env var overriding [`PG_POOL_MAX_CONNECTIONS`].
pub const ENV_PG_MAX_CONNECTIONS: &str = "CONTACT_IDENTITY_PG_MAX_CONNECTIONS";

/// Env var enabling the administrative endpoints (`true`/`false`).
pub const ENV_ENABLE_ADMIN: &str = "CONTACT_IDENTITY_ENABLE_ADMIN";

/// Env var holding the PostgreSQL connection URL.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Env var holding the HTTP port.
pub const ENV_PORT: &str = "PORT";
