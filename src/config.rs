use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved runtime configuration for the TaskFlow service.
///
/// Built once in `main` from CLI flags / environment variables and handed to
/// the startup path explicitly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Directory holding the SQLite database file.
    pub data_dir: PathBuf,
    /// tracing env-filter string, e.g. "info" or "taskflow=debug".
    pub log_filter: String,
}

impl ServerConfig {
    pub fn new(port: Option<u16>, data_dir: Option<PathBuf>, log_filter: Option<String>) -> Self {
        Self {
            port: port.unwrap_or(DEFAULT_PORT),
            data_dir: data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            log_filter: log_filter.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}
