//! Configuration file handling.
//!
//! The configuration file is stored at `$SPENDLOG_HOME/config.json` and sits
//! next to the SQLite database file. The `Config` object is the handle the
//! rest of the program works through: it knows the data-directory paths and
//! owns the database connection.

use crate::db::Db;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "spendlog";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const SPENDLOG_SQLITE: &str = "spendlog.sqlite";

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$SPENDLOG_HOME`; from there it
/// loads `$SPENDLOG_HOME/config.json` and opens the database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    db_path: PathBuf,
}

impl Config {
    /// Creates the data directory and:
    /// - Writes an initial `config.json` with default settings
    /// - Creates and migrates a fresh SQLite database
    ///
    /// # Errors
    /// - Returns an error if the database file already exists or any file
    ///   operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spendlog home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        let db_path = root.join(config_file.db_file());
        let db = Db::init(&db_path)
            .await
            .context("Unable to create the SQLite database")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            db_path,
        })
    }

    /// This will:
    /// - validate that the home directory and the config file exist
    /// - load the config file
    /// - open the database, running any pending schema migrations
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run `spendlog init` first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let db_path = resolve_db_path(&root, config_file.db_file());
        let db = Db::load(&db_path)
            .await
            .context("Unable to load the SQLite database")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            db_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Returns the stored `db_file` if it is absolute, otherwise resolves it
/// relative to the home directory.
fn resolve_db_path(root: &Path, db_file: PathBuf) -> PathBuf {
    if db_file.is_absolute() {
        return db_file;
    }
    root.join(db_file)
}

/// Represents the serialization and deserialization format of the
/// configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spendlog",
///   "config_version": 1,
///   "db_file": "spendlog.sqlite"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spendlog"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the SQLite database file (optional, relative to the home
    /// directory or absolute). Defaults to $SPENDLOG_HOME/spendlog.sqlite
    #[serde(skip_serializing_if = "Option::is_none")]
    db_file: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            db_file: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the database file path, falling back to the default name when
    /// none is configured.
    pub fn db_file(&self) -> PathBuf {
        self.db_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SPENDLOG_SQLITE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("spendlog_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.config_path().is_file());
        assert!(config.db_path().is_file());
        assert!(config.db_path().ends_with(SPENDLOG_SQLITE));
    }

    #[tokio::test]
    async fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("spendlog_home");

        let created = Config::create(&home_dir).await.unwrap();
        let loaded = Config::load(&home_dir).await.unwrap();

        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.db_path(), loaded.db_path());
    }

    #[tokio::test]
    async fn test_config_load_without_init_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path()).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("The config file is missing"));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");

        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");

        let original = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            db_file: Some(PathBuf::from("elsewhere.sqlite")),
        };
        original.save(&config_path).await.unwrap();

        let loaded = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_config_file_default_db_file() {
        let config = ConfigFile::default();
        assert_eq!(config.db_file(), PathBuf::from(SPENDLOG_SQLITE));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("db_file"));
    }

    #[test]
    fn test_resolve_db_path() {
        let root = Path::new("/data/spendlog");
        assert_eq!(
            resolve_db_path(root, PathBuf::from("spendlog.sqlite")),
            PathBuf::from("/data/spendlog/spendlog.sqlite")
        );
        assert_eq!(
            resolve_db_path(root, PathBuf::from("/mnt/elsewhere.sqlite")),
            PathBuf::from("/mnt/elsewhere.sqlite")
        );
    }
}
