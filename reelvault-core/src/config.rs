//! Centralized configuration for Reelvault.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Central configuration for all Reelvault components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ReelvaultConfig {
    pub library: LibraryConfig,
    pub server: ServerConfig,
    pub editing: EditingConfig,
}

/// Video library and filesystem configuration.
///
/// Controls where media files are served from and where edited
/// outputs are written.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Root directory of the video library (the sandbox boundary)
    pub root_dir: PathBuf,
    /// Name of the reserved output subdirectory for edited files
    pub output_dir_name: &'static str,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("videos"),
            output_dir_name: "edited",
        }
    }
}

/// HTTP server configuration.
///
/// Controls bind address and optional static asset serving for
/// a bundled frontend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind the HTTP listener to
    pub host: String,
    /// Port to bind the HTTP listener to
    pub port: u16,
    /// Optional directory of static frontend assets to serve
    pub assets_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            assets_dir: None,
        }
    }
}

impl ServerConfig {
    /// Bind address string in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Edit pipeline configuration.
///
/// Controls the external ffmpeg invocation and the bounded worker
/// pool that admission-controls concurrent edits.
#[derive(Debug, Clone)]
pub struct EditingConfig {
    /// Path or name of the ffmpeg binary to invoke
    pub ffmpeg_binary: PathBuf,
    /// Maximum number of concurrent ffmpeg processes
    pub max_workers: usize,
    /// Maximum wall-clock time for a single edit job
    pub job_timeout: Duration,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            ffmpeg_binary: PathBuf::from("ffmpeg"),
            max_workers: num_cpus::get().min(4),
            job_timeout: Duration::from_secs(600),
        }
    }
}

impl ReelvaultConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("REELVAULT_LIBRARY_ROOT") {
            config.library.root_dir = PathBuf::from(root);
        }

        if let Ok(host) = std::env::var("REELVAULT_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("REELVAULT_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        if let Ok(binary) = std::env::var("REELVAULT_FFMPEG_PATH") {
            config.editing.ffmpeg_binary = PathBuf::from(binary);
        }

        if let Ok(workers) = std::env::var("REELVAULT_EDIT_WORKERS") {
            if let Ok(count) = workers.parse::<usize>() {
                config.editing.max_workers = count.max(1);
            }
        }

        if let Ok(timeout) = std::env::var("REELVAULT_EDIT_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.editing.job_timeout = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Uses a single edit worker and a short job timeout so test
    /// failures surface quickly.
    pub fn for_testing() -> Self {
        Self {
            editing: EditingConfig {
                max_workers: 1,
                job_timeout: Duration::from_secs(5),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ReelvaultConfig::default();

        assert_eq!(config.library.root_dir, PathBuf::from("videos"));
        assert_eq!(config.library.output_dir_name, "edited");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.editing.ffmpeg_binary, PathBuf::from("ffmpeg"));
        assert!(config.editing.max_workers >= 1);
        assert_eq!(config.editing.job_timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_testing_preset() {
        let config = ReelvaultConfig::for_testing();
        assert_eq!(config.editing.max_workers, 1);
        assert_eq!(config.editing.job_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("REELVAULT_LIBRARY_ROOT", "/srv/media");
            std::env::set_var("REELVAULT_PORT", "8080");
            std::env::set_var("REELVAULT_EDIT_WORKERS", "2");
            std::env::set_var("REELVAULT_EDIT_TIMEOUT", "30");
        }

        let config = ReelvaultConfig::from_env();

        assert_eq!(config.library.root_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.editing.max_workers, 2);
        assert_eq!(config.editing.job_timeout, Duration::from_secs(30));

        // Cleanup
        unsafe {
            std::env::remove_var("REELVAULT_LIBRARY_ROOT");
            std::env::remove_var("REELVAULT_PORT");
            std::env::remove_var("REELVAULT_EDIT_WORKERS");
            std::env::remove_var("REELVAULT_EDIT_TIMEOUT");
        }
    }
}
