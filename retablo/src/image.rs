//! Where the image being described comes from
use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use crate::errors::ValidationError;

/// File extensions accepted for uploads, compared case-insensitively
pub const UPLOAD_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An image given by reference, or a local file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    Upload(PathBuf),
}

impl ImageSource {
    /// Cheap checks that need no file access
    ///
    /// # Errors
    ///
    /// Errors if the url is empty or the upload has an unsupported extension
    pub fn check(&self) -> Result<(), ValidationError> {
        match self {
            ImageSource::Url(url) if url.trim().is_empty() => Err(ValidationError::MissingImage),
            ImageSource::Url(_) => Ok(()),
            ImageSource::Upload(path) => check_extension(path),
        }
    }

    /// What to show the user for this source
    pub fn display(&self) -> String {
        match self {
            ImageSource::Url(url) => url.trim().to_string(),
            ImageSource::Upload(path) => path.display().to_string(),
        }
    }

    /// Checks the source and returns the reference stored with the record
    ///
    /// Urls are used as given. Uploads are copied to a temporary `.png` file in `dir` that
    /// outlives the session; its path is the reference.
    ///
    /// # Errors
    ///
    /// Errors if the url is empty, or if the upload has an unsupported extension or cannot be read
    pub async fn resolve_in(&self, dir: &Path) -> Result<String, ValidationError> {
        self.check()?;

        match self {
            ImageSource::Url(url) => Ok(url.trim().to_string()),
            ImageSource::Upload(path) => {
                let staged = stage_upload(path, dir)
                    .await
                    .map_err(|reason| ValidationError::UnreadableImage {
                        path: path.display().to_string(),
                        reason,
                    })?;

                Ok(staged.display().to_string())
            }
        }
    }
}

fn check_extension(path: &Path) -> Result<(), ValidationError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    if UPLOAD_EXTENSIONS
        .iter()
        .any(|allowed| extension.eq_ignore_ascii_case(allowed))
    {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedImageType(
            path.display().to_string(),
        ))
    }
}

#[tracing::instrument(skip(dir), err)]
async fn stage_upload(path: &Path, dir: &Path) -> anyhow::Result<PathBuf> {
    let bytes = fs_err::tokio::read(path).await?;

    let mut staged = tempfile::Builder::new()
        .prefix("retablo-")
        .suffix(".png")
        .tempfile_in(dir)?;
    staged.write_all(&bytes)?;

    let (_, staged_path) = staged.keep()?;
    tracing::debug!(staged = %staged_path.display(), bytes = bytes.len(), "Staged upload");

    Ok(staged_path)
}
