//! Optional YAML run configuration.
//!
//! A config file supplies defaults for the dataset flags so repeat runs stay
//! short. Precedence is command line, then config file, then built-ins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::DEFAULT_PIVOT_STATES,
    cli::{DatasetArgs, parse_delimiter},
    dataset::{DEFAULT_DATASET_FILE, Dataset, LoadOptions},
    locate::locate_dataset,
    store,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub input: Option<PathBuf>,
    pub search_root: Option<PathBuf>,
    /// File name to search for when no explicit input is given.
    pub dataset_file: Option<String>,
    pub encoding: Option<String>,
    /// Same forms the command line accepts: a single character, "tab", or
    /// an escape like "\t".
    pub delimiter: Option<String>,
    pub pivot_states: Option<usize>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Reading config file {path:?}"))?;
        let config: AppConfig =
            serde_yaml::from_str(&raw).with_context(|| format!("Parsing config file {path:?}"))?;
        Ok(config)
    }
}

/// The dataset flags after merging command line, config file and built-in
/// defaults. Every subcommand resolves one of these and loads through it.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: Option<PathBuf>,
    pub search_root: Option<PathBuf>,
    pub dataset_file: String,
    pub load_options: LoadOptions,
    pub pivot_states: usize,
}

impl RunSettings {
    pub fn resolve(args: &DatasetArgs, pivot_states: Option<usize>) -> Result<Self> {
        let config = match &args.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        let delimiter = match (args.delimiter, config.delimiter.as_deref()) {
            (Some(delimiter), _) => Some(delimiter),
            (None, Some(raw)) => {
                Some(parse_delimiter(raw).map_err(|msg| anyhow!("Config delimiter: {msg}"))?)
            }
            (None, None) => None,
        };
        Ok(Self {
            input: args.input.clone().or(config.input),
            search_root: args.search_root.clone().or(config.search_root),
            dataset_file: args
                .dataset_file
                .clone()
                .or(config.dataset_file)
                .unwrap_or_else(|| DEFAULT_DATASET_FILE.to_string()),
            load_options: LoadOptions {
                delimiter,
                encoding: args.input_encoding.clone().or(config.encoding),
            },
            pivot_states: pivot_states
                .or(config.pivot_states)
                .unwrap_or(DEFAULT_PIVOT_STATES),
        })
    }

    /// Locates and loads the dataset through the shared store.
    pub fn load(&self) -> Result<Arc<Dataset>> {
        let path = locate_dataset(
            self.input.as_deref(),
            self.search_root.as_deref(),
            &self.dataset_file,
        )?;
        store::shared().get_or_load(&path, &self.load_options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profitlens.yaml");
        fs::write(&path, "encoding: windows-1252\npivot_states: 10\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.encoding.as_deref(), Some("windows-1252"));
        assert_eq!(config.pivot_states, Some(10));
        assert!(config.input.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profitlens.yaml");
        fs::write(&path, "encodings: latin1\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = AppConfig::load(Path::new("/nonexistent/profitlens.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("profitlens.yaml"));
    }

    #[test]
    fn command_line_beats_config_beats_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profitlens.yaml");
        fs::write(&path, "encoding: utf-8\ndelimiter: \";\"\npivot_states: 5\n").unwrap();

        let args = DatasetArgs {
            input: None,
            search_root: None,
            dataset_file: None,
            delimiter: Some(b','),
            input_encoding: None,
            config: Some(path),
        };
        let settings = RunSettings::resolve(&args, None).unwrap();
        assert_eq!(settings.load_options.delimiter, Some(b','));
        assert_eq!(settings.load_options.encoding.as_deref(), Some("utf-8"));
        assert_eq!(settings.pivot_states, 5);
        assert_eq!(settings.dataset_file, DEFAULT_DATASET_FILE);
    }
}
