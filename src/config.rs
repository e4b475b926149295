use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Ratiba";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory (~/Ratiba/)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Ratiba")
}

/// Get the SQLite database path, honoring RATIBA_DB when set
pub fn database_path() -> PathBuf {
    match std::env::var("RATIBA_DB") {
        Ok(path) => PathBuf::from(path),
        Err(_) => app_data_dir().join("ratiba.db"),
    }
}

/// Listen address for the HTTP API, honoring RATIBA_BIND when set
pub fn bind_addr() -> SocketAddr {
    std::env::var("RATIBA_BIND")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8700)))
}

pub fn default_log_filter() -> String {
    "info,ratiba=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Ratiba"));
    }

    #[test]
    fn default_bind_is_loopback() {
        // Only meaningful when the env override is absent.
        if std::env::var("RATIBA_BIND").is_err() {
            let addr = bind_addr();
            assert!(addr.ip().is_loopback());
            assert_eq!(addr.port(), 8700);
        }
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
