//! glTF model loading through the Bevy asset server
//!
//! `ModelLoader` is the `AssetLoader` handed to the hotspot field. A load
//! request is queued and answered later by `drive_model_loads`, which starts
//! the glTF load and reports the default scene once the asset server is done.

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use hotspot_core::{AssetLoadFailure, AssetLoader, LoadFuture};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;

type ModelReply = oneshot::Sender<Result<Handle<Scene>, AssetLoadFailure>>;

struct ModelRequest {
    asset_ref: String,
    reply: ModelReply,
}

/// Queue of model loads requested by the hotspot field
#[derive(Resource, Clone, Default)]
pub struct ModelLoader {
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ModelLoader {
    fn take_requests(&self) -> Vec<ModelRequest> {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *requests)
    }
}

impl AssetLoader for ModelLoader {
    type Handle = Handle<Scene>;

    fn load(&self, asset_ref: &str) -> LoadFuture<Handle<Scene>> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ModelRequest {
                asset_ref: asset_ref.to_string(),
                reply,
            });

        let asset_ref = asset_ref.to_string();
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(AssetLoadFailure::new(asset_ref, "model loader stopped")))
        })
    }
}

struct LoadingModel {
    asset_ref: String,
    handle: Handle<Gltf>,
    reply: ModelReply,
}

/// glTF loads started but not yet reported back
#[derive(Resource, Default)]
pub struct PendingModels {
    loading: Vec<LoadingModel>,
}

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingModels>()
            .add_systems(Update, drive_model_loads);
    }
}

/// Start queued loads and answer the ones the asset server has finished
pub fn drive_model_loads(
    loader: Res<ModelLoader>,
    mut pending: ResMut<PendingModels>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    for request in loader.take_requests() {
        let asset_path = normalize_model_path(&request.asset_ref);
        tracing::info!("Starting to load model: {}", asset_path);
        let handle: Handle<Gltf> = asset_server.load(asset_path);
        pending.loading.push(LoadingModel {
            asset_ref: request.asset_ref,
            handle,
            reply: request.reply,
        });
    }

    if pending.loading.is_empty() {
        return;
    }

    let loading = std::mem::take(&mut pending.loading);
    for model in loading {
        // Field went away; nobody is waiting for this model
        if model.reply.is_closed() {
            continue;
        }

        let result = match asset_server.get_load_state(model.handle.id()) {
            Some(LoadState::Loaded) => Some(
                gltf_assets
                    .get(&model.handle)
                    .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()))
                    .ok_or_else(|| AssetLoadFailure::new(&model.asset_ref, "glTF has no scenes")),
            ),
            Some(LoadState::Failed(err)) => Some(Err(AssetLoadFailure::new(&model.asset_ref, err))),
            _ => None,
        };

        match result {
            Some(result) => {
                // The receiver may have been dropped since the check above
                let _ = model.reply.send(result);
            }
            None => pending.loading.push(model),
        }
    }
}

/// Map a hotspot asset reference to an asset server path
pub fn normalize_model_path(path: &str) -> String {
    // Absolute URLs go to the asset server as-is
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    path.trim().trim_start_matches('/').to_string()
}
