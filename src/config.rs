use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Filter, Item};
use crate::theme::ThemeMode;

const APP_DIR: &str = "extensions-manager";
const DEFAULT_TITLE: &str = "Extensions Manager";

#[derive(Parser, Debug, Default)]
#[command(name = "extensions-manager")]
#[command(about = "Browse, toggle and prune a catalog of extensions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Start in this theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Start with this filter selected
    #[arg(long, value_enum)]
    pub filter: Option<Filter>,

    /// JSON file with the extensions to load instead of the built-in set
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Settings file to read
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where to write the session log
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the filtered list and exit
    #[arg(long)]
    pub print: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<ThemeMode>,
    #[serde(default)]
    pub filter: Option<Filter>,
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl Settings {
    /// Missing file means defaults. The file is never written.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Unable to read settings from {}", path.display()))?;
        let parsed: Settings = serde_json::from_str(&data)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(parsed.anchored_at(path))
    }

    /// Relative paths in a settings file are relative to that file.
    fn anchored_at(mut self, settings_path: &Path) -> Self {
        if let (Some(catalog), Some(dir)) = (self.catalog.as_ref(), settings_path.parent()) {
            if catalog.is_relative() {
                self.catalog = Some(dir.join(catalog));
            }
        }
        self
    }
}

pub struct AppPaths {
    pub settings_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl AppPaths {
    pub fn new() -> Self {
        let log_dir = dirs::state_dir().or_else(dirs::cache_dir);
        Self {
            settings_file: dirs::config_dir().map(|dir| dir.join(APP_DIR).join("settings.json")),
            log_file: log_dir.map(|dir| dir.join(APP_DIR).join("session.log")),
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Unable to read catalog {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&data)
        .with_context(|| format!("Invalid catalog file {}", path.display()))?;
    let catalog = Catalog::from_items(items)
        .with_context(|| format!("Rejected catalog {}", path.display()))?;
    Ok(catalog)
}

#[derive(Debug)]
pub struct Config {
    pub title: String,
    pub theme: ThemeMode,
    pub filter: Filter,
    pub catalog: Catalog,
    pub log_file: Option<PathBuf>,
    pub print: bool,
}

impl Config {
    pub fn resolve(cli: Cli, paths: AppPaths) -> Result<Self> {
        let settings = match cli.config.as_deref().or(paths.settings_file.as_deref()) {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Config::merge(cli, settings, paths)
    }

    fn merge(cli: Cli, settings: Settings, paths: AppPaths) -> Result<Self> {
        let catalog = match cli.catalog.or(settings.catalog) {
            Some(path) => load_catalog(&path)?,
            None => Catalog::seeded(),
        };
        Ok(Config {
            title: settings
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.into()),
            theme: cli.theme.or(settings.theme).unwrap_or_default(),
            filter: cli.filter.or(settings.filter).unwrap_or_default(),
            catalog,
            log_file: cli.log_file.or(paths.log_file),
            print: cli.print,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_paths() -> AppPaths {
        AppPaths {
            settings_file: None,
            log_file: None,
        }
    }

    #[test]
    fn defaults_without_settings_or_flags() {
        let config = Config::resolve(Cli::default(), no_paths()).unwrap();
        assert_eq!(config.title, "Extensions Manager");
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.filter, Filter::All);
        assert_eq!(config.catalog.len(), 12);
        assert!(config.log_file.is_none());
        assert!(!config.print);
    }

    #[test]
    fn missing_settings_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!dir.path().join("absent.json").exists());
    }

    #[test]
    fn cli_flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"title":"My Panel","theme":"light","filter":"inactive"}"#,
        )
        .unwrap();

        let cli = Cli::parse_from(["extensions-manager", "--filter", "active"]);
        let paths = AppPaths {
            settings_file: Some(path),
            log_file: Some(dir.path().join("session.log")),
        };
        let config = Config::resolve(cli, paths).unwrap();
        assert_eq!(config.title, "My Panel");
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.filter, Filter::Active);
        assert_eq!(config.log_file, Some(dir.path().join("session.log")));
    }

    #[test]
    fn malformed_settings_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let cli = Cli::parse_from([
            "extensions-manager",
            "--config",
            file.path().to_str().unwrap(),
        ]);
        let err = Config::resolve(cli, no_paths()).unwrap_err();
        assert!(err.to_string().contains("Invalid settings file"));
    }

    #[test]
    fn catalog_file_replaces_seed_items() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id":"a","name":"Alpha","description":"first","icon":"A","accent":"pink-200","active":false}},
                {{"id":"b","name":"Beta","description":"second","icon":"B","accent":"cyan-300"}}
            ]"#
        )
        .unwrap();
        let cli = Cli::parse_from([
            "extensions-manager",
            "--catalog",
            file.path().to_str().unwrap(),
            "--print",
        ]);
        let config = Config::resolve(cli, no_paths()).unwrap();
        assert_eq!(config.catalog.len(), 2);
        assert_eq!(config.catalog.get("a").map(|entry| entry.active), Some(false));
        assert_eq!(config.catalog.get("b").map(|entry| entry.active), Some(false));
        assert!(config.print);
    }

    #[test]
    fn relative_catalog_in_settings_resolves_next_to_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("exts.json"),
            r#"[{"id":"only","name":"Only","description":"","icon":"O","accent":"green-300","active":true}]"#,
        )
        .unwrap();
        let settings_path = dir.path().join("settings.json");
        fs::write(&settings_path, r#"{"catalog":"exts.json"}"#).unwrap();

        let settings = Settings::load(&settings_path).unwrap();
        assert_eq!(settings.catalog, Some(dir.path().join("exts.json")));

        let paths = AppPaths {
            settings_file: Some(settings_path),
            log_file: None,
        };
        let config = Config::resolve(Cli::default(), paths).unwrap();
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.catalog.get("only").map(|entry| entry.active), Some(true));
    }

    #[test]
    fn absolute_catalog_in_settings_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("elsewhere").join("exts.json");
        let settings = Settings {
            catalog: Some(absolute.clone()),
            ..Settings::default()
        }
        .anchored_at(&dir.path().join("settings.json"));
        assert_eq!(settings.catalog, Some(absolute));
    }

    #[test]
    fn catalog_file_with_duplicate_ids_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id":"a","name":"Alpha","description":"","icon":"A","accent":"pink-200"}},
                {{"id":"a","name":"Again","description":"","icon":"B","accent":"cyan-300"}}
            ]"#
        )
        .unwrap();
        let err = load_catalog(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate extension id `a`"));
    }
}
