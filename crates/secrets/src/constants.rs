//! Shared constants for secret files and deployment descriptors.

/// Suffix every environment file passed to the loader must carry.
pub const ENV_FILE_SUFFIX: &str = ".env";

/// Environment file the CLI loads when none is given.
pub const DEFAULT_ENV_FILE: &str = "creds.env";

/// Deployment descriptor the compose injector rewrites when none is given.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Number of ancestor directories searched by the locator.
pub const SEARCH_DEPTH: usize = 3;

/// Lines starting with this marker are comments in environment files.
pub const COMMENT_PREFIX: char = '#';
