//! This module provides the `ConfigLoader` struct, responsible for loading xorshift
//! configurations from various sources, including files, strings and directories.

use crate::orchestrator::XorShiftConfig;
use crate::types::TuringMachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// `ConfigLoader` is a utility struct for loading `XorShiftConfig` values from JSON.
/// It provides methods to load a config from a single file, from string content,
/// and to discover and load all `.json` files within a specified directory.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a single configuration from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the `.json` file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(XorShiftConfig)` if the file is read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if the content is not a valid config document.
    /// * `Err(TuringMachineError::InvalidConfig)` if the document parses but its seed is invalid.
    pub fn load_config(path: &Path) -> Result<XorShiftConfig, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_config_from_string(&content)
    }

    /// Loads a single configuration from the provided JSON string.
    pub fn load_config_from_string(content: &str) -> Result<XorShiftConfig, TuringMachineError> {
        let config: XorShiftConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads all configuration files (`.json` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each loaded file yields either
    /// its path and config or the error that stopped it.
    pub fn load_configs(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, XorShiftConfig), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        let mut results = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => results.push(Err(TuringMachineError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        // Directory order is platform dependent.
        paths.sort();

        results.extend(
            paths
                .into_iter()
                .filter(|path| !path.is_dir() && path.extension().is_some_and(|ext| ext == "json"))
                .map(|path| match Self::load_config(&path) {
                    Ok(config) => Ok((path, config)),
                    Err(e) => Err(TuringMachineError::FileError(format!(
                        "Failed to load config from {}: {}",
                        path.display(),
                        e
                    ))),
                }),
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "test.json",
            r#"{ "name": "Test", "seed": "110010", "a": 1, "b": 2, "c": 1, "left_padding": 4 }"#,
        );

        let config = ConfigLoader::load_config(&path).unwrap();

        assert_eq!(config.name, "Test");
        assert_eq!(config.seed, "110010");
        assert_eq!((config.a, config.b, config.c), (1, 2, 1));
        assert_eq!(config.left_padding, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ConfigLoader::load_config(&dir.path().join("missing.json"));

        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let result = ConfigLoader::load_config_from_string("This is not a valid config");
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));

        let result = ConfigLoader::load_config_from_string(r#"{ "seed": "1011" }"#);
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));
    }

    #[test]
    fn test_load_invalid_seed() {
        let result =
            ConfigLoader::load_config_from_string(r#"{ "seed": "1021", "a": 1, "b": 1, "c": 1 }"#);

        assert!(matches!(result, Err(TuringMachineError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_configs_from_directory() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "valid.json",
            r#"{ "seed": "1011", "a": 1, "b": 1, "c": 1 }"#,
        );
        write_file(dir.path(), "invalid.json", "not json");
        write_file(dir.path(), "ignored.txt", "This file should be ignored");
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let results = ConfigLoader::load_configs(dir.path());

        assert_eq!(results.len(), 2);
        // Sorted by path: invalid.json comes first.
        assert!(results[0].is_err());
        let (path, config) = results[1].as_ref().unwrap();
        assert!(path.ends_with("valid.json"));
        assert_eq!(config.seed, "1011");
    }

    #[test]
    fn test_load_configs_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ConfigLoader::load_configs(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
    }
}
