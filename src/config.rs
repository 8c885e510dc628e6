use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Radscore";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Radscore/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Radscore")
}

/// Get the default cases directory (one sub-folder per patient study)
pub fn cases_dir() -> PathBuf {
    app_data_dir().join("cases")
}

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    "radscore=info".to_string()
}
