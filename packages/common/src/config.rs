use std::path::PathBuf;

use serde::Deserialize;

/// Which media store implementation the server talks to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Files under `root_dir`, served by the API process itself.
    #[default]
    Filesystem,
    /// An S3-compatible bucket. Requires the `object-storage` feature.
    S3,
}

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3Config {
    pub bucket: String,
    /// Region name. Default: "us-east-1".
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Custom endpoint (MinIO, R2, ...). Empty means AWS.
    #[serde(default)]
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Use `endpoint/bucket/key` addressing instead of virtual hosts.
    #[serde(default)]
    pub path_style: bool,
}

fn default_s3_region() -> String {
    "us-east-1".into()
}

/// Media storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Default: filesystem.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend. Default: "./data/media".
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// Prefix used to build public media URLs. Default: "/media".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Largest accepted upload in bytes. Default: 512 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    #[serde(default)]
    pub s3: Option<S3Config>,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./data/media")
}
fn default_public_base_url() -> String {
    "/media".into()
}
fn default_max_upload_size() -> u64 {
    512 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root_dir: default_root_dir(),
            public_base_url: default_public_base_url(),
            max_upload_size: default_max_upload_size(),
            s3: None,
        }
    }
}
