use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Reference to a locally picked image.
///
/// Serialized as a plain string, e.g. `"file:///home/me/Pictures/cat.png"`.
/// No format or size constraints are enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageUri(String);

impl ImageUri {
    /// Wrap an arbitrary URI string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` URI from an absolute local path.
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    /// Get the URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ImageUri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl From<&str> for ImageUri {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let uri = ImageUri::new("file:///tmp/a.png");
        assert_eq!(
            serde_json::to_string(&uri).unwrap(),
            r#""file:///tmp/a.png""#
        );
    }

    #[test]
    fn from_path_prefixes_scheme() {
        let uri = ImageUri::from_path(Path::new("/tmp/header.jpg"));
        assert_eq!(uri.as_str(), "file:///tmp/header.jpg");
    }
}
