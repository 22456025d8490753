use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;

/// Keys always use `/`, whatever the host path separator is.
pub const SEPARATOR: char = '/';

#[derive(Debug, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key `{key}` is not under prefix `{prefix}`")]
    NotUnderPrefix { key: String, prefix: String },
    #[error("key `{key}` has unsafe segment `{segment}`")]
    UnsafeSegment { key: String, segment: String },
    #[error("path `{}` is not valid UTF-8", .0.display())]
    NonUtf8(PathBuf),
    #[error("path `{}` cannot be used in a key", .0.display())]
    UnsupportedComponent(PathBuf),
    #[error("path `{}` has no components", .0.display())]
    Empty(PathBuf),
}

/// Treats `""`, `"/"` and friends as the bucket root.
pub fn normalize_prefix(prefix: &str) -> &str {
    if prefix.trim_matches(SEPARATOR).is_empty() {
        ""
    } else {
        prefix
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Zero-byte "folder" objects some consoles create, e.g. `photos/2024/`.
    pub fn is_directory_marker(&self) -> bool {
        self.0.ends_with(SEPARATOR)
    }

    fn file_name(&self) -> &str {
        self.0
            .trim_end_matches(SEPARATOR)
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or("")
    }

    /// Builds `prefix/relative` out of the normal components of `relative`.
    pub fn join(prefix: &str, relative: &Path) -> Result<Self, KeyError> {
        let mut key = normalize_prefix(prefix)
            .trim_end_matches(SEPARATOR)
            .to_string();
        let mut segments = 0;

        for component in relative.components() {
            let segment = match component {
                Component::Normal(segment) => segment
                    .to_str()
                    .ok_or_else(|| KeyError::NonUtf8(relative.to_path_buf()))?,
                Component::CurDir => continue,
                _ => return Err(KeyError::UnsupportedComponent(relative.to_path_buf())),
            };

            if !key.is_empty() {
                key.push(SEPARATOR);
            }
            key.push_str(segment);
            segments += 1;
        }

        if segments == 0 {
            return Err(KeyError::Empty(relative.to_path_buf()));
        }

        Ok(Self(key))
    }

    /// Maps the key to a path relative to the local root of a pull from
    /// `prefix`. A file key equal to the prefix maps to its last segment.
    pub fn relative_path(&self, prefix: &str) -> Result<PathBuf, KeyError> {
        let prefix = normalize_prefix(prefix);
        let rest = self
            .0
            .strip_prefix(prefix)
            .ok_or_else(|| KeyError::NotUnderPrefix {
                key: self.0.clone(),
                prefix: prefix.to_string(),
            })?
            .trim_start_matches(SEPARATOR);

        let rest = if rest.is_empty() && !self.is_directory_marker() {
            self.file_name()
        } else {
            rest
        };

        let mut path = PathBuf::new();
        for segment in rest.split(SEPARATOR).filter(|s| !s.is_empty()) {
            // must stay a single normal component on this host
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => path.push(segment),
                _ => {
                    return Err(KeyError::UnsafeSegment {
                        key: self.0.clone(),
                        segment: segment.to_string(),
                    })
                }
            }
        }

        Ok(path)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}
