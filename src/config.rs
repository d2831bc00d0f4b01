//! File-based configuration for the `dist-stage` binary.
//!
//! Settings live in `dist-stage.toml` next to the build. Command-line flags
//! override individual values, and the merged result becomes the
//! [`StepConfig`] handed to the detachment step.
//!
//! ```toml
//! working_directory = "target/dist-stage"
//! staging_url = "https://dist.example.org/dev/foo"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use dist_stage_detach::StepConfig;
use serde::Deserialize;
use std::fs;
use std::io;
use thiserror::Error;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dist-stage.toml";

/// Working directory used when neither the file nor a flag sets one.
pub const DEFAULT_WORKING_DIRECTORY: &str = "target/dist-stage";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("could not read configuration file {path}")]
    Read {
        /// Configuration path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid configuration file {path}")]
    Parse {
        /// Configuration path.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// No staging URL was configured.
    #[error("staging_url is required; set it in {DEFAULT_CONFIG_FILE} or pass --staging-url")]
    MissingStagingUrl,
}

/// Settings read from the configuration file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Directory the detached artifacts are staged in.
    ///
    /// Also accepted as `output_directory`.
    #[serde(alias = "output_directory")]
    pub working_directory: Utf8PathBuf,
    /// Upload target of the downstream step. Required before a run.
    pub staging_url: Option<String>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            working_directory: Utf8PathBuf::from(DEFAULT_WORKING_DIRECTORY),
            staging_url: None,
        }
    }
}

impl StageConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or holds
    /// unknown keys. `origin` only labels the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use dist_stage::config::StageConfig;
    ///
    /// let config = StageConfig::from_toml(
    ///     "output_directory = \"out\"\n",
    ///     Utf8Path::new("dist-stage.toml"),
    /// )?;
    /// assert_eq!(config.working_directory, "out");
    /// # Ok::<(), dist_stage::config::ConfigError>(())
    /// ```
    pub fn from_toml(source: &str, origin: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: origin.to_owned(),
            source: Box::new(source),
        })
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, including
    /// when it does not exist, or [`ConfigError::Parse`] if it is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&source, path)
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] for any read failure other than a
    /// missing file, or [`ConfigError::Parse`] if the file is invalid.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::debug!("no configuration file at {path}; using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Replace file values with those given on the command line.
    #[must_use]
    pub fn with_overrides(
        mut self,
        working_directory: Option<Utf8PathBuf>,
        staging_url: Option<String>,
    ) -> Self {
        if let Some(directory) = working_directory {
            self.working_directory = directory;
        }
        if staging_url.is_some() {
            self.staging_url = staging_url;
        }
        self
    }

    /// Validate the settings and build the step configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingStagingUrl`] if the staging URL is
    /// absent or blank.
    pub fn into_step_config(self) -> Result<StepConfig, ConfigError> {
        let staging_url = self
            .staging_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingStagingUrl)?
            .to_owned();
        Ok(StepConfig {
            working_directory: self.working_directory,
            staging_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ORIGIN: &str = "dist-stage.toml";

    fn parse(source: &str) -> StageConfig {
        StageConfig::from_toml(source, Utf8Path::new(ORIGIN))
            .unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"))
    }

    #[rstest]
    fn empty_file_uses_defaults() {
        let config = parse("");
        assert_eq!(config, StageConfig::default());
        assert_eq!(config.working_directory, DEFAULT_WORKING_DIRECTORY);
    }

    #[rstest]
    #[case::canonical("working_directory = \"out/stage\"\n")]
    #[case::alias("output_directory = \"out/stage\"\n")]
    fn reads_working_directory(#[case] source: &str) {
        assert_eq!(parse(source).working_directory, "out/stage");
    }

    #[rstest]
    fn rejects_unknown_keys() {
        let err = StageConfig::from_toml("stagingUrl = \"x\"\n", Utf8Path::new(ORIGIN))
            .expect_err("unknown key must be rejected");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(ORIGIN));
    }

    #[rstest]
    fn flags_override_file_values() {
        let config = parse("working_directory = \"a\"\nstaging_url = \"https://one\"\n")
            .with_overrides(Some(Utf8PathBuf::from("b")), Some("https://two".to_owned()));
        assert_eq!(config.working_directory, "b");
        assert_eq!(config.staging_url.as_deref(), Some("https://two"));
    }

    #[rstest]
    fn absent_flags_keep_file_values() {
        let config = parse("staging_url = \"https://one\"\n").with_overrides(None, None);
        assert_eq!(config.staging_url.as_deref(), Some("https://one"));
    }

    #[rstest]
    #[case::absent("")]
    #[case::empty("staging_url = \"\"\n")]
    #[case::blank("staging_url = \"   \"\n")]
    fn step_config_requires_staging_url(#[case] source: &str) {
        let err = parse(source)
            .into_step_config()
            .expect_err("missing staging url");
        assert!(matches!(err, ConfigError::MissingStagingUrl));
    }

    #[rstest]
    fn step_config_carries_trimmed_values() {
        let step = parse("working_directory = \"out\"\nstaging_url = \" https://dist \"\n")
            .into_step_config()
            .expect("valid configuration");
        assert_eq!(step.working_directory, "out");
        assert_eq!(step.staging_url, "https://dist");
    }
}
