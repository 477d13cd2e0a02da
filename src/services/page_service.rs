use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, info};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::WikiError;
use crate::types::Page;

const PAGE_EXTENSION: &str = "txt";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Flat-directory page storage: one `<title>.txt` file per page
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Create a new page store rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        debug!("Creating PageStore with root directory: {:?}", root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing the page `title`
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root.join(format!("{}.{}", title, PAGE_EXTENSION))
    }

    /// Read a page from disk. Any read failure counts as a missing page.
    pub async fn load(&self, title: &str) -> Result<Page, WikiError> {
        let path = self.path_for(title);
        match fs::read(&path).await {
            Ok(body) => {
                debug!("Loaded page '{}' from {:?}, {} bytes", title, path, body.len());
                Ok(Page::with_body(title, body))
            }
            Err(e) => {
                debug!("Page '{}' unavailable at {:?}: {}", title, path, e);
                Err(WikiError::PageNotFound(title.to_string()))
            }
        }
    }

    /// Write a page, replacing whatever was stored under its title.
    ///
    /// The root directory is created on every call. The body goes to a
    /// temporary sibling file that is renamed over the page, so concurrent
    /// saves of one title leave exactly one writer's bytes behind.
    pub async fn save(&self, page: &Page) -> Result<(), WikiError> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            error!("Failed to create page directory {:?}: {}", self.root, e);
            WikiError::Io(e)
        })?;

        let path = self.path_for(&page.title);
        let tmp = self.temp_path_for(&page.title);
        if let Err(e) = write_private(&tmp, &page.body).await {
            error!("Failed to write page '{}' to {:?}: {}", page.title, tmp, e);
            let _ = fs::remove_file(&tmp).await;
            return Err(WikiError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            error!("Failed to move {:?} to {:?}: {}", tmp, path, e);
            let _ = fs::remove_file(&tmp).await;
            return Err(WikiError::Io(e));
        }

        info!("Saved page '{}' to {:?}, {} bytes", page.title, path, page.body.len());
        Ok(())
    }

    fn temp_path_for(&self, title: &str) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(".{}.{}.{}-{}.tmp", title, PAGE_EXTENSION, std::process::id(), n))
    }
}

/// Create `path` readable and writable by the owner only
async fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(body).await?;
    file.flush().await?;
    Ok(())
}
