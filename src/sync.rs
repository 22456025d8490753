use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, span, Level};
use walkdir::WalkDir;

use crate::{
    adapters,
    config::SyncConfig,
    model::{
        key::{normalize_prefix, ObjectKey},
        object::RemoteObject,
        sync::{Direction, SyncError, SyncReport, Transferred},
    },
};

/// Moves objects between a bucket prefix and a local directory tree.
pub struct SyncClient {
    client: Box<dyn adapters::ObjectAdapter>,
}

impl SyncClient {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = config.build_s3_client()?;
        Ok(Self::with_client(Box::new(client)))
    }

    pub fn with_client(client: Box<dyn adapters::ObjectAdapter>) -> Self {
        Self { client }
    }

    /// Downloads every object under `remote_prefix` into `local_root`.
    ///
    /// The listing is drained before anything is written; if it fails the
    /// call fails. Per-object failures land in the report.
    pub fn pull(
        &self,
        bucket: &str,
        remote_prefix: &str,
        local_root: &Path,
    ) -> Result<SyncReport, SyncError> {
        let span = span!(Level::INFO, "pull", context = "pull");
        let _e = span.enter();
        info!(
            bucket = bucket,
            remote_prefix = remote_prefix,
            local_root = %local_root.display(),
            "called"
        );

        let prefix = normalize_prefix(remote_prefix);
        let objects = match self.client.fs_list_objects(bucket, prefix) {
            Err(err) => {
                error!(error_message=%err, error_group="list_objects");
                return Err(SyncError::Listing {
                    prefix: prefix.to_string(),
                    source: err,
                });
            }
            Ok(objects) => objects,
        };
        info!(count = objects.len(), "listed");

        let mut report = SyncReport::new(Direction::Pull);
        let mut written = HashSet::new();
        for obj in objects {
            match self.pull_object(bucket, prefix, &obj, local_root, &mut written) {
                Err(err) => report.record_failure(obj.key, err),
                Ok(Some(transferred)) => report.transferred.push(transferred),
                Ok(None) => {}
            }
        }

        report.log_summary();
        Ok(report)
    }

    fn pull_object(
        &self,
        bucket: &str,
        prefix: &str,
        obj: &RemoteObject,
        local_root: &Path,
        written: &mut HashSet<PathBuf>,
    ) -> Result<Option<Transferred>, SyncError> {
        let key = ObjectKey::from(obj.key.as_str());

        let relative = key.relative_path(prefix).map_err(|err| {
            error!(error_message=%err, error_group="map_key");
            SyncError::key(key.as_str(), &err)
        })?;
        let local_path = local_root.join(relative);

        if key.is_directory_marker() {
            fs::create_dir_all(&local_path).map_err(|err| {
                error!(error_message=%err, error_group="create_dir");
                SyncError::io(key.as_str(), &err)
            })?;
            debug!(key = %key, path = %local_path.display(), "directory marker");
            return Ok(None);
        }

        // distinct keys can collapse onto one path, e.g. `p/a` and `pa` under `p`
        if written.contains(&local_path) {
            let message = format!("`{}` was already written by another key", local_path.display());
            error!(error_message=%message, error_group="map_key");
            return Err(SyncError::Transfer {
                item: key.to_string(),
                message,
                status: None,
            });
        }

        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                error!(error_message=%err, error_group="create_dir");
                SyncError::io(key.as_str(), &err)
            })?;
        }

        let body = self
            .client
            .fs_download_object(bucket, key.as_str())
            .map_err(|err| {
                error!(error_message=%err, error_group="get_object");
                SyncError::store(key.as_str(), err)
            })?;

        info!(key = %key, path = %local_path.display(), size = ?obj.size, "downloading");
        fs::write(&local_path, &body).map_err(|err| {
            error!(error_message=%err, error_group="write_file");
            SyncError::io(key.as_str(), &err)
        })?;
        written.insert(local_path.clone());

        Ok(Some(Transferred {
            key: obj.key.clone(),
            path: local_path,
            bytes: body.len() as u64,
        }))
    }

    /// Uploads a file, or every file beneath a directory, under `remote_prefix`.
    ///
    /// Directories are walked in file-name order. A missing `local_path`
    /// fails before any store call.
    pub fn push(
        &self,
        bucket: &str,
        local_path: &Path,
        remote_prefix: &str,
    ) -> Result<SyncReport, SyncError> {
        let span = span!(Level::INFO, "push", context = "push");
        let _e = span.enter();
        info!(
            bucket = bucket,
            local_path = %local_path.display(),
            remote_prefix = remote_prefix,
            "called"
        );

        let metadata = match fs::metadata(local_path) {
            Err(err) => {
                error!(error_message=%err, error_group="stat");
                return Err(SyncError::PathNotFound(local_path.to_path_buf()));
            }
            Ok(metadata) => metadata,
        };

        let mut report = SyncReport::new(Direction::Push);

        if metadata.is_file() {
            let item = local_path.display().to_string();
            let file_name = match local_path.file_name() {
                None => return Err(SyncError::PathNotFound(local_path.to_path_buf())),
                Some(name) => PathBuf::from(name),
            };

            match ObjectKey::join(remote_prefix, &file_name) {
                Err(err) => {
                    error!(error_message=%err, error_group="map_key");
                    report.record_failure(item.clone(), SyncError::key(item, &err));
                }
                Ok(key) => self.push_into(&mut report, bucket, local_path, &key),
            }
        } else if metadata.is_dir() {
            self.push_dir(&mut report, bucket, local_path, remote_prefix);
        } else {
            return Err(SyncError::PathNotFound(local_path.to_path_buf()));
        }

        report.log_summary();
        Ok(report)
    }

    fn push_dir(&self, report: &mut SyncReport, bucket: &str, root: &Path, remote_prefix: &str) {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Err(err) => {
                    error!(error_message=%err, error_group="walk_dir");
                    let item = err
                        .path()
                        .unwrap_or(root)
                        .display()
                        .to_string();
                    let message = err.to_string();
                    report.record_failure(
                        item.clone(),
                        SyncError::Transfer {
                            item,
                            message,
                            status: None,
                        },
                    );
                    continue;
                }
                Ok(entry) => entry,
            };

            let path = entry.path();
            let item = path.display().to_string();

            // symlinked directories are not followed, symlinked files are uploaded
            if entry.path_is_symlink() {
                match fs::metadata(path) {
                    Err(err) => {
                        error!(error_message=%err, error_group="read_file");
                        report.record_failure(item.clone(), SyncError::io(item, &err));
                        continue;
                    }
                    Ok(metadata) if !metadata.is_file() => continue,
                    Ok(_) => {}
                }
            } else if !entry.file_type().is_file() {
                continue;
            }

            let key = path
                .strip_prefix(root)
                .map_err(|err| err.to_string())
                .and_then(|relative| {
                    ObjectKey::join(remote_prefix, relative).map_err(|err| err.to_string())
                });

            match key {
                Err(message) => {
                    error!(error_message=%message, error_group="map_key");
                    report.record_failure(
                        item.clone(),
                        SyncError::Transfer {
                            item,
                            message,
                            status: None,
                        },
                    );
                }
                Ok(key) => self.push_into(report, bucket, path, &key),
            }
        }
    }

    fn push_into(&self, report: &mut SyncReport, bucket: &str, path: &Path, key: &ObjectKey) {
        match self.push_file(bucket, path, key) {
            Err(err) => report.record_failure(path.display().to_string(), err),
            Ok(transferred) => report.transferred.push(transferred),
        }
    }

    fn push_file(
        &self,
        bucket: &str,
        path: &Path,
        key: &ObjectKey,
    ) -> Result<Transferred, SyncError> {
        let item = path.display().to_string();
        info!(path = %item, bucket = bucket, key = %key, "uploading");

        let body = fs::read(path).map_err(|err| {
            error!(error_message=%err, error_group="read_file");
            SyncError::io(item.as_str(), &err)
        })?;
        let bytes = body.len() as u64;

        self.client
            .fs_put_object(bucket, key.as_str(), body)
            .map_err(|err| {
                error!(error_message=%err, error_group="put_object");
                SyncError::store(item.as_str(), err)
            })?;

        Ok(Transferred {
            key: key.to_string(),
            path: path.to_path_buf(),
            bytes,
        })
    }
}
