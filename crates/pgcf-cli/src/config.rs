//! Deployment configuration loaded from `pgcf.toml`.
//!
//! Every section is optional. Upload secrets can also come from the
//! environment (`PGCF_GCP_BUCKET`, `PGCF_GCP_ACCESS_TOKEN`,
//! `PGCF_GCP_SERVICE_ACCOUNT_JSON`), which takes precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use pgcf_output::{
    DirectorySink, EXPORT_FILE_NAME, GcsCredential, GcsSink, ObjectSink, ServiceAccountKey,
    UploadError,
};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pgcf.toml";

/// Default framework table path.
pub const DEFAULT_FRAMEWORK_FILE: &str = "PGCF.csv";

pub const ENV_GCP_BUCKET: &str = "PGCF_GCP_BUCKET";
pub const ENV_GCP_ACCESS_TOKEN: &str = "PGCF_GCP_ACCESS_TOKEN";
pub const ENV_GCP_SERVICE_ACCOUNT_JSON: &str = "PGCF_GCP_SERVICE_ACCOUNT_JSON";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Framework table path.
    pub framework: Option<PathBuf>,
    pub export: ExportConfig,
    pub upload: UploadConfig,
    pub gcp: GcpConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Local path of the written export.
    pub file_name: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from(EXPORT_FILE_NAME),
        }
    }
}

/// Which object store receives uploads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Gcs,
    Directory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub sink: SinkKind,
}

/// Google Cloud Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpConfig {
    pub bucket_name: String,
    /// OAuth2 bearer token with `devstorage.read_write` scope. Takes
    /// precedence over `service_account_json`.
    pub access_token: String,
    /// Service account key, inline JSON or a path to the key file.
    pub service_account_json: String,
    /// API endpoint override (emulators).
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub path: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("uploads"),
        }
    }
}

impl GcpConfig {
    /// Resolves how uploads authenticate.
    ///
    /// # Errors
    ///
    /// [`UploadError::NotConfigured`] when neither a token nor a key is set,
    /// [`UploadError::Io`] when the key file cannot be read, and
    /// [`UploadError::InvalidCredentials`] when the key does not parse.
    pub fn credential(&self) -> Result<GcsCredential, UploadError> {
        if !self.access_token.trim().is_empty() {
            return Ok(GcsCredential::AccessToken(self.access_token.clone()));
        }
        let source = self.service_account_json.trim();
        if source.is_empty() {
            return Err(UploadError::NotConfigured {
                field: "access_token or service_account_json",
            });
        }
        let key = if source.starts_with('{') {
            ServiceAccountKey::from_json(source)?
        } else {
            let path = PathBuf::from(source);
            let json = fs::read_to_string(&path).map_err(|source| UploadError::Io {
                operation: "read",
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "service account key read");
            ServiceAccountKey::from_json(&json)?
        };
        Ok(GcsCredential::ServiceAccount(key))
    }
}

impl AppConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, `pgcf.toml` in the working
    /// directory is used if present, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };
        Self::load_from(&path)
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bucket) = lookup(ENV_GCP_BUCKET).filter(|v| !v.is_empty()) {
            self.gcp.bucket_name = bucket;
        }
        if let Some(token) = lookup(ENV_GCP_ACCESS_TOKEN).filter(|v| !v.is_empty()) {
            self.gcp.access_token = token;
        }
        if let Some(key) = lookup(ENV_GCP_SERVICE_ACCOUNT_JSON).filter(|v| !v.is_empty()) {
            self.gcp.service_account_json = key;
        }
    }

    /// Framework path, falling back to `PGCF.csv`.
    pub fn framework_path(&self) -> PathBuf {
        self.framework
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRAMEWORK_FILE))
    }

    /// Builds the configured upload destination.
    pub fn build_sink(&self) -> Result<Box<dyn ObjectSink>, UploadError> {
        match self.upload.sink {
            SinkKind::Gcs => {
                let mut sink = GcsSink::new(self.gcp.bucket_name.clone(), self.gcp.credential()?)?;
                if let Some(endpoint) = &self.gcp.endpoint {
                    sink = sink.with_endpoint(endpoint.clone());
                }
                Ok(Box::new(sink))
            }
            SinkKind::Directory => Ok(Box::new(DirectorySink::new(self.directory.path.clone()))),
        }
    }
}
