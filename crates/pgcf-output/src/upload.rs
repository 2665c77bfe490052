//! Optional upload of the export to an object store.
//!
//! Uploading never affects the local export: callers write the file first
//! and report the upload outcome separately. There are no retries.

use std::fs;
use std::path::PathBuf;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use crate::auth::GcsCredential;
use crate::error::UploadError;
use crate::export::{EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};

/// Public Google Cloud Storage endpoint.
pub const GCS_DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Where an upload landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Human-readable location, e.g. `gs://bucket/competency_selections.csv`.
    pub location: String,
    pub bytes: usize,
}

/// Destination for uploaded export documents.
pub trait ObjectSink {
    /// Short description of the destination for messages and logs.
    fn describe(&self) -> String;

    /// Stores `data` under `name`, replacing any existing object.
    fn put(&self, name: &str, data: &[u8], content_type: &str) -> Result<UploadReceipt, UploadError>;
}

/// Uploads the export under its fixed object name.
pub fn upload_export(sink: &dyn ObjectSink, data: &[u8]) -> Result<UploadReceipt, UploadError> {
    debug!(destination = %sink.describe(), bytes = data.len(), "uploading export");
    match sink.put(EXPORT_FILE_NAME, data, EXPORT_CONTENT_TYPE) {
        Ok(receipt) => {
            info!(location = %receipt.location, bytes = receipt.bytes, "export uploaded");
            Ok(receipt)
        }
        Err(error) => {
            warn!(destination = %sink.describe(), %error, "export upload failed");
            Err(error)
        }
    }
}

/// Google Cloud Storage sink using the JSON API media upload.
pub struct GcsSink {
    client: Client,
    bucket: String,
    credential: GcsCredential,
    endpoint: String,
}

impl GcsSink {
    /// Creates a sink for `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::NotConfigured`] if the bucket or a direct
    /// access token is empty.
    pub fn new(bucket: impl Into<String>, credential: GcsCredential) -> Result<Self, UploadError> {
        let bucket = bucket.into();
        if bucket.trim().is_empty() {
            return Err(UploadError::NotConfigured {
                field: "bucket_name",
            });
        }
        if let GcsCredential::AccessToken(token) = &credential
            && token.trim().is_empty()
        {
            return Err(UploadError::NotConfigured {
                field: "access_token",
            });
        }
        let client = Client::builder()
            .build()
            .map_err(|source| UploadError::Network { source })?;
        Ok(Self {
            client,
            bucket,
            credential,
            endpoint: GCS_DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Overrides the API endpoint (emulators, private gateways).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Media upload URL for an object name.
    pub fn upload_url(&self, name: &str) -> Result<Url, UploadError> {
        let base = format!("{}/upload/storage/v1/b/{}/o", self.endpoint, self.bucket);
        Url::parse_with_params(&base, &[("uploadType", "media"), ("name", name)]).map_err(|e| {
            UploadError::InvalidEndpoint {
                url: base.clone(),
                reason: e.to_string(),
            }
        })
    }
}

impl ObjectSink for GcsSink {
    fn describe(&self) -> String {
        format!("gs://{}", self.bucket)
    }

    fn put(&self, name: &str, data: &[u8], content_type: &str) -> Result<UploadReceipt, UploadError> {
        let url = self.upload_url(name)?;
        let token = self.credential.bearer_token(&self.client)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .map_err(|source| UploadError::Network { source })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(UploadReceipt {
            location: format!("gs://{}/{}", self.bucket, name),
            bytes: data.len(),
        })
    }
}

/// Sink that stores objects as files in a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectSink for DirectorySink {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn put(&self, name: &str, data: &[u8], _content_type: &str) -> Result<UploadReceipt, UploadError> {
        fs::create_dir_all(&self.root).map_err(|source| UploadError::Io {
            operation: "create directory",
            path: self.root.clone(),
            source,
        })?;
        let path = self.root.join(name);
        fs::write(&path, data).map_err(|source| UploadError::Io {
            operation: "write",
            path: path.clone(),
            source,
        })?;
        Ok(UploadReceipt {
            location: path.display().to_string(),
            bytes: data.len(),
        })
    }
}
