//! Icon assets
//!
//! Finds each application's icon on disk, reads them concurrently, and hands
//! the bytes to a [`TextureLoader`] that turns them into texture handles.
//! An icon that cannot be found or decoded is not an error: the node is
//! simply never drawn.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::bundle::{Application, Bundle};
use crate::graph::TextureHandle;

/// Icon file extensions, in lookup order
pub const ICON_EXTENSIONS: &[&str] = &["svg", "png"];

/// Converts decoded icon bytes into backend textures
pub trait TextureLoader {
    /// Create a texture for `node_id` from raw image bytes.
    ///
    /// Returning `None` leaves the node untextured.
    fn upload(&mut self, node_id: &str, image: &[u8]) -> Option<TextureHandle>;
}

/// Loader that accepts any non-empty image and issues sequential handles
#[derive(Debug, Clone)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Number of handles issued so far
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLoader for HandleAllocator {
    fn upload(&mut self, _node_id: &str, image: &[u8]) -> Option<TextureHandle> {
        if image.is_empty() {
            return None;
        }
        let handle = TextureHandle(self.next);
        self.next += 1;
        Some(handle)
    }
}

/// Directory holding `<charm-name>.<ext>` icon files
#[derive(Debug, Clone)]
pub struct IconDirectory {
    root: PathBuf,
}

impl IconDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths tried for an application's icon, in order
    pub fn candidates(&self, app: &Application) -> Vec<PathBuf> {
        ICON_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", app.icon_name(), ext)))
            .collect()
    }
}

/// Icon bytes fetched for one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedIcon {
    /// Application (node) name
    pub name: String,
    /// File contents, `None` when no candidate could be read
    pub image: Option<Vec<u8>>,
}

/// Read every application's icon concurrently.
///
/// Results come back in bundle order regardless of completion order.
pub async fn fetch_icons(dir: &IconDirectory, bundle: &Bundle) -> Vec<FetchedIcon> {
    let mut tasks = JoinSet::new();
    for (index, app) in bundle.applications.iter().enumerate() {
        let candidates = dir.candidates(app);
        tasks.spawn(async move { (index, read_first(candidates).await) });
    }

    let mut images: Vec<Option<Vec<u8>>> = vec![None; bundle.applications.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, image)) => images[index] = image,
            Err(e) => warn!("icon task failed: {e}"),
        }
    }

    bundle
        .applications
        .iter()
        .zip(images)
        .map(|(app, image)| FetchedIcon {
            name: app.name.clone(),
            image,
        })
        .collect()
}

/// Contents of the first readable candidate
async fn read_first(candidates: Vec<PathBuf>) -> Option<Vec<u8>> {
    for path in candidates {
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "icon read");
                return Some(bytes);
            }
            Err(e) => debug!(path = %path.display(), "icon unavailable: {e}"),
        }
    }
    None
}
