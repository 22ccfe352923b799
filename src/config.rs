//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Configuration is resolved once at startup and
//! passed into the components that need it.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream provider configuration
    pub providers: ProviderConfig,
    /// File upload configuration
    pub uploads: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Upstream provider configuration
///
/// Credentials are read once here; absence is not an error until a provider
/// that requires the credential is actually called.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// API key for the OpenAI chat completion API
    pub openai_api_key: Option<String>,
    /// API key for the DeepSeek chat completion API
    pub deepseek_api_key: Option<String>,
}

/// File upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where uploaded files are stored
    pub dir: String,
    /// Maximum size of a single uploaded file in bytes
    pub max_file_bytes: usize,
    /// Maximum number of files accepted per upload request
    pub max_files: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            providers: ProviderConfig {
                openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
                deepseek_api_key: env::var("DEEPSEEK_API_KEY").ok().filter(|k| !k.is_empty()),
            },
            uploads: UploadConfig {
                dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
                max_file_bytes: 10 * 1024 * 1024,
                max_files: 5,
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
