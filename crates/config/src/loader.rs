use crate::{ConfigError, Configuration, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tsql_types::Reporter;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "tsqllintrc";

/// File name looked up in the current, program and home directories.
pub const CONFIG_FILE_NAME: &str = ".tsqllintrc";

const DEFAULT_CONFIG: &str = include_str!("default_config.json");

/// Locations consulted when no configuration path is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    /// Value of the `tsqllintrc` environment variable
    pub env_path: Option<PathBuf>,
    pub current_dir: Option<PathBuf>,
    /// Directory of the running executable
    pub program_dir: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
}

impl SearchPaths {
    /// Search paths of the running process.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            env_path: env::var_os(CONFIG_ENV_VAR)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            current_dir: env::current_dir().ok(),
            program_dir: env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
            home_dir: dirs::home_dir(),
        }
    }

    /// Candidate files in priority order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        let directories = [&self.current_dir, &self.program_dir, &self.home_dir];
        self.env_path
            .iter()
            .cloned()
            .chain(
                directories.into_iter()
                    .flatten()
                    .map(|dir| dir.join(CONFIG_FILE_NAME)),
            )
            .collect()
    }

    /// First candidate that exists as a file.
    #[tracing::instrument(skip(self))]
    pub fn find_config(&self) -> Option<PathBuf> {
        for candidate in self.candidates() {
            tracing::trace!(path = %candidate.display(), "Checking for config file");
            if candidate.is_file() {
                tracing::info!(path = %candidate.display(), "Found config file");
                return Some(candidate);
            }
        }
        tracing::debug!("No config file found");
        None
    }
}

/// Load a configuration file.
#[tracing::instrument(skip(reporter), fields(path = %path.display()))]
pub fn load_config(path: &Path, reporter: &dyn Reporter) -> Result<Configuration> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Configuration::from_json(&contents, reporter)?.with_source(path);
    tracing::info!("Config loaded successfully");
    Ok(config)
}

/// Resolve the configuration for this process.
///
/// See [`resolve_with`].
pub fn resolve(explicit_path: Option<&Path>, reporter: &dyn Reporter) -> Configuration {
    resolve_with(explicit_path, &SearchPaths::from_process(), reporter)
}

/// Resolve a configuration from an explicit path or the search cascade.
///
/// An explicit path that does not exist is reported and yields an unloaded,
/// empty configuration; the cascade is not consulted. When the cascade finds
/// nothing the built-in default is used. Failures are reported, never returned.
#[tracing::instrument(skip(search, reporter))]
pub fn resolve_with(
    explicit_path: Option<&Path>,
    search: &SearchPaths,
    reporter: &dyn Reporter,
) -> Configuration {
    let explicit_path =
        explicit_path.filter(|path| !path.as_os_str().to_string_lossy().trim().is_empty());

    let result = match explicit_path {
        Some(path) => load_config(path, reporter),
        None => match search.find_config() {
            Some(path) => load_config(&path, reporter),
            None => {
                tracing::debug!("Using built-in default configuration");
                Configuration::from_json(DEFAULT_CONFIG, reporter)
            }
        },
    };

    result.unwrap_or_else(|error| {
        tracing::warn!(%error, "Continuing with an empty configuration");
        reporter.report(&error.to_string());
        Configuration::default()
    })
}
