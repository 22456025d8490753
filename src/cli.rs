use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{SyncConfig, DEFAULT_REGION};

#[derive(Parser)]
#[command(name = "objectsync", version, about = "Pull and push object-store prefixes")]
pub struct Cli {
    #[arg(long, env = "OBJECTSYNC_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: String,

    #[arg(long, env = "OBJECTSYNC_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: String,

    #[arg(long, env = "OBJECTSYNC_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Endpoint of an S3-compatible store
    #[arg(long, env = "OBJECTSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    #[arg(long, env = "OBJECTSYNC_FORCE_PATH_STYLE")]
    pub force_path_style: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Download every object under REMOTE_PREFIX into LOCAL_ROOT
    Pull {
        bucket: String,
        remote_prefix: String,
        local_root: PathBuf,
    },
    /// Upload a file or directory tree under REMOTE_PREFIX
    Push {
        bucket: String,
        local_path: PathBuf,
        remote_prefix: String,
    },
}

impl Cli {
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            force_path_style: self.force_path_style,
        }
    }
}
