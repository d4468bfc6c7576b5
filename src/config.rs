use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "GlowDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the HTTP API.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8420";

/// Get the application data directory
/// ~/GlowDesk/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("GlowDesk")
}

/// Get the SQLite database path
pub fn database_path() -> PathBuf {
    app_data_dir().join("glowdesk.db")
}

/// Bind address for the HTTP API, overridable via `GLOWDESK_ADDR`.
pub fn bind_addr() -> SocketAddr {
    std::env::var("GLOWDESK_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.parse().expect("default addr parses"))
}

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "info,glowdesk_lib=debug".to_string()
}
