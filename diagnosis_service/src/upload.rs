use std::{
    io,
    path::{Path, PathBuf},
};
use uuid::Uuid;

/// An uploaded file persisted in the upload directory. The file is removed
/// when the guard is dropped, whichever way the request ends.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub async fn persist(dir: &Path, original_name: &str, data: &[u8]) -> io::Result<Self> {
        // Guard exists before the write so a partial file is still cleaned up.
        let upload = Self {
            path: dir.join(unique_file_name(original_name)),
        };
        tokio::fs::write(&upload.path, data).await?;
        tracing::debug!("Stored upload at {:?}", upload.path);

        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed upload {:?}", self.path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove upload {:?}: {}", self.path, e),
        }
    }
}

/// Random name that keeps the client's extension, when it is a plain one.
fn unique_file_name(original_name: &str) -> String {
    let id = Uuid::new_v4().simple();
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

pub fn ensure_upload_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}
