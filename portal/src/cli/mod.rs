//! CLI module for realm-portal
//!
//! Command-line flags override values from the config file and environment.

use clap::Parser;
use std::path::PathBuf;

/// Realm Portal - server status, captcha and account registration web portal
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "realm-portal")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    PORTAL_CONFIG                     Config file path (TOML/YAML/JSON)
    PORTAL_HOST                       Bind address (default: 0.0.0.0)
    PORTAL_PORT                       Listen port (default: 80)
    PORTAL_DATABASE_URL               Database URL (default: sqlite://portal.db)
    PORTAL_STATIC_FILES_PATH          Static files directory (default: public)
    PORTAL_POLL_INTERVAL_MS           Liveness poll interval (default: 3000)
    PORTAL_PROBE_TIMEOUT_MS           TCP probe timeout (default: 3000)
    PORTAL_CAPTCHA_TTL_MS             Captcha lifetime (default: 600000)
    PORTAL_CAPTCHA_SWEEP_INTERVAL_MS  Expired captcha sweep interval (default: 60000)
    PORTAL_LOG_LEVEL                  Log level (default: info, RUST_LOG takes precedence)
    PORTAL_LOG_DIR                    Directory for rotated JSON log files
    PORTAL_ENV                        Set to "production" to skip loading .env
"#)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "PORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory for rotated JSON log files
    #[arg(long, env = "PORTAL_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
