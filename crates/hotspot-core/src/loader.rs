//! Filesystem asset loader
//!
//! Reads glTF models from a root directory on a tokio runtime. Asset
//! references are site-style absolute paths (`/models/leaf.glb`) resolved
//! against the root. The loaded bytes are checked to be a glTF container but
//! are otherwise left to the renderer.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

use crate::asset::{AssetLoadFailure, AssetLoader, LoadFuture};

/// Raw model file contents
#[derive(Clone, PartialEq, Eq)]
pub struct ModelBytes {
    pub asset_ref: String,
    pub bytes: Arc<[u8]>,
}

impl ModelBytes {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ModelBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBytes")
            .field("asset_ref", &self.asset_ref)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub struct FsAssetLoader {
    root: PathBuf,
    runtime: Handle,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>, runtime: Handle) -> Self {
        Self {
            root: root.into(),
            runtime,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an asset reference to a file under the root
    pub fn resolve_path(&self, asset_ref: &str) -> Result<PathBuf, AssetLoadFailure> {
        if asset_ref.starts_with("http://") || asset_ref.starts_with("https://") {
            return Err(AssetLoadFailure::new(
                asset_ref,
                "remote assets are not supported by the filesystem loader",
            ));
        }

        let relative = Path::new(asset_ref.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return Err(AssetLoadFailure::new(asset_ref, "empty asset path"));
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AssetLoadFailure::new(
                asset_ref,
                "asset path escapes the asset root",
            ));
        }

        Ok(self.root.join(relative))
    }
}

/// Check that `bytes` look like the glTF flavor named by the extension
pub fn validate_model(asset_ref: &str, bytes: &[u8]) -> Result<(), AssetLoadFailure> {
    let extension = Path::new(asset_ref)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("glb") => {
            if bytes.len() < 12 || &bytes[..4] != b"glTF" {
                return Err(AssetLoadFailure::new(asset_ref, "missing binary glTF header"));
            }
        }
        Some("gltf") => {
            let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
            if first != Some(&b'{') {
                return Err(AssetLoadFailure::new(asset_ref, "glTF document is not a JSON object"));
            }
        }
        _ => {
            return Err(AssetLoadFailure::new(asset_ref, "unsupported model format"));
        }
    }

    Ok(())
}

impl AssetLoader for FsAssetLoader {
    type Handle = ModelBytes;

    fn load(&self, asset_ref: &str) -> LoadFuture<ModelBytes> {
        let path = match self.resolve_path(asset_ref) {
            Ok(path) => path,
            Err(failure) => return Box::pin(async move { Err(failure) }),
        };

        let asset_ref = asset_ref.to_string();
        let join_ref = asset_ref.clone();
        let task = self.runtime.spawn(async move {
            debug!(path = %path.display(), "Reading model");
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                AssetLoadFailure::new(&asset_ref, format!("{}: {}", path.display(), e))
            })?;
            validate_model(&asset_ref, &bytes)?;
            Ok(ModelBytes {
                asset_ref,
                bytes: bytes.into(),
            })
        });

        Box::pin(async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(AssetLoadFailure::new(join_ref, e)),
            }
        })
    }
}
