//! Service configuration resolved from environment variables.
//!
//! Every knob has a working default so `hemolens` starts with no
//! configuration at all: a local Ollama instance, a staging directory
//! under the user's home, and the bundled sample report path.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const APP_NAME: &str = "hemolens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Query substituted when `/analyze` receives an empty or whitespace-only query.
pub const DEFAULT_ANALYZE_QUERY: &str =
    "Please analyze my blood test report and provide a comprehensive summary";

/// Query substituted when `/analyze-sample` receives no query.
pub const DEFAULT_SAMPLE_QUERY: &str = "Please analyze the sample blood test report";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info,tower_http=warn")
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Base URL of the Ollama instance serving the reasoning model.
    pub ollama_base_url: String,
    /// Reasoning model name.
    pub model: String,
    /// Per-request timeout for reasoning calls, in seconds.
    pub llm_timeout_secs: u64,
    /// Directory where uploaded reports are staged for the duration of a request.
    pub staging_dir: PathBuf,
    /// The fixed reference document served by `/analyze-sample`.
    ///
    /// The sample fallback is deliberate product behavior, so it is an
    /// explicit setting rather than a hardcoded path.
    pub sample_report_path: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl ServiceConfig {
    /// Resolve configuration from `HEMOLENS_*` environment variables,
    /// falling back to defaults on missing or unparseable values.
    pub fn from_env() -> Self {
        Self {
            bind_addr: parse_var("HEMOLENS_BIND", default_bind_addr()),
            ollama_base_url: string_var("HEMOLENS_OLLAMA_URL", "http://localhost:11434"),
            model: string_var("HEMOLENS_MODEL", "medgemma"),
            llm_timeout_secs: parse_var("HEMOLENS_TIMEOUT_SECS", 300),
            staging_dir: path_var("HEMOLENS_STAGING_DIR", default_staging_dir),
            sample_report_path: path_var("HEMOLENS_SAMPLE_REPORT", || {
                PathBuf::from("data/sample.pdf")
            }),
            max_upload_bytes: parse_var::<usize>("HEMOLENS_MAX_UPLOAD_MB", 20) * 1024 * 1024,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Staging lives under the user's home so transient uploads never land in
/// a world-readable temp directory; temp dir is the no-home fallback.
fn default_staging_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".hemolens").join("uploads"))
        .unwrap_or_else(|| std::env::temp_dir().join("hemolens-uploads"))
}

fn string_var(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn path_var(name: &str, default: impl FnOnce() -> PathBuf) -> PathBuf {
    std::env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(var = name, value = %raw, "unparseable setting, using default");
                default
            }
        },
        Err(_) => default,
    }
}
