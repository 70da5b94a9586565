// ABOUTME: Application configuration parsing for hoist.yml.
// ABOUTME: Splits out `app` and `build`; every other key is the service definition.

mod build;
mod client;
mod init;

pub use build::BuildConfig;
pub use client::{
    ClientSettings, DEFAULT_API_URL, DEFAULT_REGISTRY_HOST, ENV_ACCESS_TOKEN, ENV_API_URL,
    ENV_POLL_INTERVAL, ENV_REGISTRY_HOST, default_poll_interval,
};
pub use init::init_config;

use crate::error::{Error, Result};
use crate::types::AppName;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "hoist.yml";
pub const CONFIG_FILENAME_ALT: &str = "hoist.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".hoist/config.yml";

/// Open-ended service definition sent to the platform.
pub type Definition = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub app: Option<AppName>,
    pub build: Option<BuildConfig>,
    pub definition: Definition,
}

impl AppConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let data: Definition = serde_yaml::from_str(yaml)?;
        Self::from_map(data)
    }

    /// Build a config from a raw top-level table.
    pub fn from_map(mut data: Definition) -> Result<Self> {
        let app = match data.remove("app") {
            Some(Value::String(name)) => Some(
                AppName::new(&name).map_err(|e| Error::InvalidConfig(format!("app: {}", e)))?,
            ),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(Error::InvalidConfig(format!(
                    "app: expected a string, found {}",
                    other
                )));
            }
        };

        let build = match data.remove("build") {
            Some(Value::Object(table)) => BuildConfig::from_map(&table),
            _ => None,
        };

        Ok(Self {
            app,
            build,
            definition: data,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find and load the config file in `dir`.
    pub fn discover(dir: &Path) -> Result<(Self, PathBuf)> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in candidates {
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, path));
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn has_definition(&self) -> bool {
        !self.definition.is_empty()
    }

    pub fn to_yaml(&self) -> Result<String> {
        let document = Document {
            app: self.app.as_ref(),
            build: self.build.as_ref(),
            definition: &self.definition,
        };
        Ok(serde_yaml::to_string(&document)?)
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn template(app: AppName) -> Self {
        let mut definition = Definition::new();
        definition.insert(
            "services".to_string(),
            serde_json::json!([{ "internal_port": 8080, "protocol": "tcp" }]),
        );

        AppConfig {
            app: Some(app),
            build: None,
            definition,
        }
    }
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    app: Option<&'a AppName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    build: Option<&'a BuildConfig>,
    #[serde(flatten)]
    definition: &'a Definition,
}

/// Resolve a user-supplied config path.
///
/// A path with an extension names the file itself; anything else is a
/// directory holding `hoist.yml`.
pub fn resolve_config_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.join(CONFIG_FILENAME)
    }
}
