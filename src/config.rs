use std::fmt;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};

use crate::{model::sync::SyncError, util};

pub const DEFAULT_REGION: &str = "cn-north-4";

const CREDENTIALS_PROVIDER: &str = "objectsync";

#[derive(Clone)]
pub struct SyncConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    /// Override for S3-compatible stores, e.g. `https://obs.cn-north-4.example.com`.
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

fn check_secret_like(name: &str, value: &str) -> Result<(), SyncError> {
    if value.is_empty() {
        return Err(SyncError::Config(format!("{} is empty", name)));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SyncError::Config(format!(
            "{} contains whitespace or control characters",
            name
        )));
    }
    Ok(())
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        check_secret_like("access key id", &self.access_key_id)?;
        check_secret_like("secret access key", &self.secret_access_key)?;

        if self.region.is_empty()
            || !self
                .region
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SyncError::Config(format!(
                "malformed region: `{}`",
                self.region
            )));
        }

        if let Some(endpoint) = &self.endpoint {
            let host = endpoint
                .strip_prefix("https://")
                .or_else(|| endpoint.strip_prefix("http://"));

            match host {
                Some(host) if !host.is_empty() && !host.starts_with('/') => {}
                _ => {
                    return Err(SyncError::Config(format!(
                        "malformed endpoint: `{}`",
                        endpoint
                    )))
                }
            }
        }

        Ok(())
    }

    /// Builds the store client. Must be called inside a tokio runtime.
    pub fn build_s3_client(&self) -> Result<aws_sdk_s3::Client, SyncError> {
        self.validate()?;

        let credentials = Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(self.region.clone()));

        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = util::poll::poll_until_ready(loader.load());
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(self.force_path_style)
            .build();

        Ok(aws_sdk_s3::Client::from_conf(s3_config))
    }
}
