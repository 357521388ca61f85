//! Receipt image storage on the local filesystem.

use std::io;
use std::path::PathBuf;

use expense_core::media::{expense_image_path, with_suffix, ValidatedImage, EXPENSE_IMAGE_DIR};
use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Length of the random suffix added when a file name is already taken.
const SUFFIX_LEN: usize = 7;

/// Attempts at finding a free file name before giving up.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Writes uploads under the media root and renders their public URLs.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStore {
    /// `url_prefix` must start and end with `/`.
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self { root, url_prefix }
    }

    /// Public URL of a stored file, e.g. `/media/expense_image/receipt.png`.
    pub fn url_for(&self, relative_path: &str) -> String {
        format!("{}{relative_path}", self.url_prefix)
    }

    /// Store a receipt image, returning its path relative to the media root.
    ///
    /// Existing files are never overwritten; on a name clash a random
    /// suffix is inserted before the extension.
    pub async fn save_expense_image(&self, image: &ValidatedImage) -> io::Result<String> {
        let dir = self.root.join(EXPENSE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let mut name = image.file_name.clone();
        for _ in 0..MAX_NAME_ATTEMPTS {
            let target = dir.join(&name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&image.bytes).await?;
                    file.flush().await?;
                    tracing::debug!(path = %target.display(), bytes = image.bytes.len(), "Stored receipt image");
                    return Ok(expense_image_path(&name));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    name = with_suffix(&image.file_name, &random_suffix());
                }
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free file name for '{}'", image.file_name),
        ))
    }

    /// Remove a file stored by [`MediaStore::save_expense_image`] that no
    /// row ended up referencing. Failures are logged and otherwise ignored.
    pub async fn discard(&self, relative_path: &str) {
        let target = self.root.join(relative_path);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => tracing::debug!(path = %target.display(), "Removed unreferenced receipt image"),
            Err(e) => tracing::warn!(
                path = %target.display(),
                error = %e,
                "Failed to remove unreferenced receipt image"
            ),
        }
    }
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect()
}
