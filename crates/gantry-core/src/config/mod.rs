//! # Gantry System Manifest
//!
//! A manifest describes a system declaratively: the component keys in
//! insertion order, the kind each one is built from, its dependency
//! declaration and free-form settings for the kind's factory.
//!
//! ```toml
//! [system]
//! name = "shop"
//! idempotent = true
//!
//! [[components]]
//! key = "db"
//! kind = "service"
//!
//! [[components]]
//! key = "api"
//! kind = "service"
//! dependencies = { database = "db" }
//! settings = { fail_on_start = false }
//! ```
//!
//! JSON is always supported; YAML and TOML sit behind the `yaml-config` and
//! `toml-config` features (both on by default).
pub mod error;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{DependencySpec, Key};
use crate::kernel::constants::{DEFAULT_SYSTEM_NAME, KIND_NOOP};
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::Gate;

pub use error::ConfigError;

/// Manifest serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "JSON"),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => write!(f, "YAML"),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => write!(f, "TOML"),
        }
    }
}

fn default_system_name() -> String {
    DEFAULT_SYSTEM_NAME.to_string()
}

fn default_kind() -> String {
    KIND_NOOP.to_string()
}

fn default_enabled() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// The `[system]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    #[serde(default = "default_system_name")]
    pub name: String,
    /// Skip components already in the target state
    #[serde(default)]
    pub idempotent: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            name: default_system_name(),
            idempotent: false,
        }
    }
}

/// One component entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub key: Key,
    #[serde(default = "default_kind")]
    pub kind: String,
    /// A list of keys or a map of field to key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
    /// A disabled component is present in the system but holds nothing
    #[serde(default = "default_enabled", skip_serializing_if = "is_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub settings: Value,
}

impl ComponentConfig {
    pub fn new(key: impl Into<Key>, kind: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            dependencies: None,
            enabled: true,
            settings: Value::Null,
        }
    }

    /// The dependency declaration, if any
    pub fn dependency_spec(&self) -> Result<Option<DependencySpec>, LifecycleError> {
        self.dependencies
            .as_ref()
            .map(|value| DependencySpec::try_from(value))
            .transpose()
    }

    /// Get a setting, deserialized to `T`
    pub fn setting<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.settings
            .get(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a setting with default
    pub fn setting_or<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        self.setting(name).unwrap_or(default)
    }
}

/// Declarative description of a system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemManifest {
    #[serde(default)]
    pub system: SystemSettings,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

impl SystemManifest {
    /// Read and check a manifest, picking the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            ConfigError::UnsupportedFormat(
                path.extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "<no extension>".to_string()),
            )
        })?;
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading {} manifest from {}", format, path.display());
        Self::parse(&data, format)
    }

    /// Parse and check a manifest held in memory
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let parse_error = |source: crate::component::BoxError| ConfigError::Parse {
            format: format.to_string(),
            source,
        };
        let manifest: SystemManifest = match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| parse_error(Box::new(e)))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| parse_error(Box::new(e)))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| parse_error(Box::new(e)))?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check keys are non-empty and unique, and every dependency declaration is well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, component) in self.components.iter().enumerate() {
            if component.key.as_str().is_empty() {
                return Err(ConfigError::EmptyKey(index));
            }
            if !seen.insert(&component.key) {
                return Err(ConfigError::DuplicateKey(component.key.clone()));
            }
            component
                .dependency_spec()
                .map_err(|source| ConfigError::Dependencies {
                    key: component.key.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn gate(&self) -> Gate {
        if self.system.idempotent {
            Gate::Idempotent
        } else {
            Gate::Always
        }
    }

    /// Look up a component entry by key
    pub fn component(&self, key: &Key) -> Option<&ComponentConfig> {
        self.components.iter().find(|component| &component.key == key)
    }
}
