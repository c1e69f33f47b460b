//! Image picker that resolves a path typed into the terminal.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use formcraft::{ImagePicker, ImageUri, PickError};

/// Resolves user input to an image URI.
///
/// - empty input means the user cancelled
/// - input that already carries a scheme (`file://`, `https://`, ...) is taken verbatim
/// - anything else is a local path; it must name an existing file and becomes an
///   absolute `file://` URI. A leading `~/` expands to `$HOME`.
#[derive(Debug, Clone)]
pub struct FilePathPicker {
    input: String,
}

impl FilePathPicker {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    fn expand_home(raw: &str) -> PathBuf {
        match (raw.strip_prefix("~/"), std::env::var_os("HOME")) {
            (Some(rest), Some(home)) => Path::new(&home).join(rest),
            _ => PathBuf::from(raw),
        }
    }
}

impl ImagePicker for FilePathPicker {
    fn pick_image(&self) -> Result<Option<ImageUri>, PickError> {
        let raw = self.input.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if raw.contains("://") {
            return Ok(Some(ImageUri::new(raw)));
        }

        let path = Self::expand_home(raw);
        let absolute = match std::fs::canonicalize(&path) {
            Ok(absolute) => absolute,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(PickError::NotFound(path)),
            Err(err) => return Err(err.into()),
        };
        if !absolute.is_file() {
            return Err(PickError::NotFound(path));
        }

        Ok(Some(ImageUri::from_path(&absolute)))
    }
}
