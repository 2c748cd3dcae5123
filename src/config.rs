//! Configuration management for ora-bind.
//!
//! Handles loading credentials from TOML files and environment variables, and
//! loading node definitions (SQL template plus parameters) from TOML or JSON.

use crate::bind::ParameterDescriptor;
use crate::error::{NodeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the database user.
pub const ENV_USER: &str = "ORACLE_USER";
/// Environment variable holding the database password.
pub const ENV_PASSWORD: &str = "ORACLE_PASSWORD";
/// Environment variable holding the connect string.
pub const ENV_CONNECT_STRING: &str = "ORACLE_CONNECT_STRING";

/// Main configuration structure for ora-bind.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named credential sets.
    #[serde(default)]
    pub credentials: HashMap<String, Credentials>,
}

/// Oracle credentials as supplied by the host.
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Database user.
    #[serde(default)]
    pub user: Option<String>,

    /// Database password (not recommended to store in config).
    #[serde(default)]
    pub password: Option<String>,

    /// Easy Connect string or TNS alias, e.g. `dbhost:1521/ORCLPDB1`.
    #[serde(default, alias = "connect_string")]
    pub connection_string: Option<String>,
}

// Keeps the password out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connection_string", &self.connection_string)
            .finish()
    }
}

impl Credentials {
    /// Creates credentials with every field set.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
            connection_string: Some(connection_string.into()),
        }
    }

    /// Merges another set into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &Credentials) {
        if other.user.is_some() {
            self.user = other.user.clone();
        }
        if other.password.is_some() {
            self.password = other.password.clone();
        }
        if other.connection_string.is_some() {
            self.connection_string = other.connection_string.clone();
        }
    }

    /// Applies environment variables (ORACLE_USER, etc.) as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.user.is_none() {
            self.user = std::env::var(ENV_USER).ok();
        }
        if self.password.is_none() {
            self.password = std::env::var(ENV_PASSWORD).ok();
        }
        if self.connection_string.is_none() {
            self.connection_string = std::env::var(ENV_CONNECT_STRING).ok();
        }
    }

    /// Returns the user name, or an error if it is missing.
    pub fn user(&self) -> Result<&str> {
        self.user
            .as_deref()
            .ok_or_else(|| NodeError::config("Database user is required"))
    }

    /// Returns the password; a missing password is passed to the driver as empty.
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or("")
    }

    /// Returns the connect string, or an error if it is missing.
    pub fn connection_string(&self) -> Result<&str> {
        self.connection_string
            .as_deref()
            .ok_or_else(|| NodeError::config("Connection string is required"))
    }

    /// Returns a display-safe string (no password) for logs.
    pub fn display_string(&self) -> String {
        let user = self.user.as_deref().unwrap_or("unknown");
        let target = self.connection_string.as_deref().unwrap_or("unknown");
        format!("{user} @ {target}")
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ora-bind")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            NodeError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named credential set, or the default set if name is None.
    pub fn get_credentials(&self, name: Option<&str>) -> Option<&Credentials> {
        let key = name.unwrap_or("default");
        self.credentials.get(key)
    }
}

/// Node parameters as configured on the host: the SQL template and its parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NodeDefinition {
    /// SQL statement with `:name` placeholders.
    #[serde(default)]
    pub query: String,

    /// Parameters in the order they were entered.
    #[serde(default)]
    pub params: Vec<ParameterDescriptor>,
}

impl NodeDefinition {
    /// Loads a node definition, choosing JSON for `.json` files and TOML otherwise.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NodeError::config(format!(
                "Failed to read node definition {}: {e}",
                path.display()
            ))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| NodeError::config(format!("Invalid node definition: {e}")))
    }

    /// Parses JSON, accepting the host's `{"params": {"values": [...]}}` nesting
    /// as well as a flat `params` array.
    pub fn from_json(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Params {
            Flat(Vec<ParameterDescriptor>),
            Nested {
                #[serde(default)]
                values: Vec<ParameterDescriptor>,
            },
        }

        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            query: String,
            params: Option<Params>,
        }

        let raw: Raw = serde_json::from_str(content)
            .map_err(|e| NodeError::config(format!("Invalid node definition: {e}")))?;

        let params = match raw.params {
            Some(Params::Flat(values)) | Some(Params::Nested { values }) => values,
            None => Vec::new(),
        };

        Ok(Self {
            query: raw.query,
            params,
        })
    }
}
