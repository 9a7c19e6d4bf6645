//! Receipt images stored next to the ledger, one directory per user.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::LedgerError,
    utils::persistence::{ensure_dir, remove_if_exists, write_atomic},
};

const DEFAULT_NAMESPACE: &str = "default";
const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Filesystem store for uploaded receipt images.
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    root: PathBuf,
}

impl ReceiptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `user`'s receipts, or the shared one when no user is set.
    pub fn user_dir(&self, user: &str) -> PathBuf {
        self.root.join(namespace(user))
    }

    /// Saves an uploaded image and returns the path to record on the expense.
    ///
    /// Only the final component of `file_name` is used. A receipt with the same
    /// name for the same user is replaced.
    pub fn save(&self, user: &str, file_name: &str, bytes: &[u8]) -> Result<PathBuf, LedgerError> {
        let path = self.target(user, file_name)?;
        ensure_dir(&self.user_dir(user))?;
        if path.exists() {
            tracing::warn!(path = %path.display(), "replacing existing receipt with the same name");
        }
        write_atomic(&path, bytes)?;
        tracing::info!(path = %path.display(), size = bytes.len(), "receipt stored");
        Ok(path)
    }

    /// Where `save` would place `file_name` for `user`.
    pub fn target(&self, user: &str, file_name: &str) -> Result<PathBuf, LedgerError> {
        let name = Path::new(file_name.trim())
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LedgerError::UnsupportedReceipt(file_name.to_string()))?;
        if !has_image_extension(name) {
            return Err(LedgerError::UnsupportedReceipt(format!(
                "{name} (expected a .jpg or .png image)"
            )));
        }
        Ok(self.user_dir(user).join(name))
    }

    /// Copies a receipt from disk into the store.
    pub fn import(&self, user: &str, source: &Path) -> Result<PathBuf, LedgerError> {
        let bytes = fs::read(source)?;
        let name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LedgerError::UnsupportedReceipt(source.display().to_string()))?;
        self.save(user, name, &bytes)
    }

    /// Deletes a stored receipt that no expense ended up referencing.
    pub fn discard(&self, path: &Path) -> Result<(), LedgerError> {
        if remove_if_exists(path)? {
            tracing::debug!(path = %path.display(), "receipt discarded");
        }
        Ok(())
    }

    /// Reads back a receipt referenced by an expense record.
    pub fn read(&self, receipt_path: &str) -> Result<Vec<u8>, LedgerError> {
        Ok(fs::read(receipt_path)?)
    }
}

fn namespace(user: &str) -> String {
    let sanitized: String = user
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '.').is_empty() {
        DEFAULT_NAMESPACE.into()
    } else {
        sanitized
    }
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
