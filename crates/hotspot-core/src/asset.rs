//! Asset resolution with procedural fallback
//!
//! Every hotspot resolves to something drawable. A hotspot without an asset
//! reference resolves immediately to its procedural shape. A hotspot with one
//! starts an asynchronous load through the injected `AssetLoader`; until the
//! load settles the hotspot is `Pending` (draw nothing), after which it is
//! either the loaded handle or, on any failure, the procedural shape.
//!
//! Loads are deduplicated per asset reference in an `AssetCache`, which can be
//! cloned and shared between resolvers and fields. In-flight loads are polled
//! from the frame path with a no-op waker, so resolution never blocks and a
//! result is only ever pulled by a live owner of the cache.

use futures_util::future::BoxFuture;
use futures_util::task::noop_waker_ref;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use thiserror::Error;
use tracing::{info, warn};

use crate::hotspot::{Hotspot, ProceduralShape};

/// Any reason an external asset could not be obtained
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load asset {asset_ref}: {reason}")]
pub struct AssetLoadFailure {
    pub asset_ref: String,
    pub reason: String,
}

impl AssetLoadFailure {
    pub fn new(asset_ref: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            asset_ref: asset_ref.into(),
            reason: reason.to_string(),
        }
    }
}

/// Future returned by an `AssetLoader`
pub type LoadFuture<H> = BoxFuture<'static, Result<H, AssetLoadFailure>>;

/// Collaborator that knows how to fetch an asset by reference
pub trait AssetLoader: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    fn load(&self, asset_ref: &str) -> LoadFuture<Self::Handle>;
}

/// Adapts a closure returning a future into an `AssetLoader`
pub struct FnLoader<F, H> {
    f: F,
    _handle: PhantomData<fn() -> H>,
}

impl<F, Fut, H> FnLoader<F, H>
where
    F: Fn(&str) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<H, AssetLoadFailure>> + Send + 'static,
    H: Clone + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _handle: PhantomData,
        }
    }
}

impl<F, Fut, H> AssetLoader for FnLoader<F, H>
where
    F: Fn(&str) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<H, AssetLoadFailure>> + Send + 'static,
    H: Clone + Send + Sync + 'static,
{
    type Handle = H;

    fn load(&self, asset_ref: &str) -> LoadFuture<H> {
        Box::pin((self.f)(asset_ref))
    }
}

/// Observable state of one asset load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<H> {
    Pending,
    Loaded(H),
    Failed(AssetLoadFailure),
}

/// What a renderer should draw for a hotspot
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedVisual<H> {
    LoadedAsset(H),
    Procedural(ProceduralShape),
}

impl<H> ResolvedVisual<H> {
    pub fn handle(&self) -> Option<&H> {
        match self {
            ResolvedVisual::LoadedAsset(handle) => Some(handle),
            ResolvedVisual::Procedural(_) => None,
        }
    }

    pub fn procedural_shape(&self) -> Option<ProceduralShape> {
        match self {
            ResolvedVisual::LoadedAsset(_) => None,
            ResolvedVisual::Procedural(shape) => Some(*shape),
        }
    }
}

/// Result of resolving a hotspot at one point in time
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<H> {
    /// Load in flight; draw nothing for this hotspot
    Pending,
    Ready(ResolvedVisual<H>),
}

impl<H> Resolution<H> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }

    pub fn visual(&self) -> Option<&ResolvedVisual<H>> {
        match self {
            Resolution::Pending => None,
            Resolution::Ready(visual) => Some(visual),
        }
    }

    pub fn into_visual(self) -> Option<ResolvedVisual<H>> {
        match self {
            Resolution::Pending => None,
            Resolution::Ready(visual) => Some(visual),
        }
    }
}

enum CacheSlot<H> {
    InFlight(LoadFuture<H>),
    Loaded(H),
    Failed(AssetLoadFailure),
}

/// Keyed store of asset loads, shared by cloning
///
/// Entries are only removed by `invalidate`; there is no eviction.
pub struct AssetCache<H> {
    slots: Arc<Mutex<HashMap<String, CacheSlot<H>>>>,
}

impl<H> Clone for AssetCache<H> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<H> Default for AssetCache<H> {
    fn default() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<H> fmt::Debug for AssetCache<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("AssetCache")
            .field("entries", &slots.len())
            .finish()
    }
}

impl<H: Clone + Send + 'static> AssetCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheSlot<H>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance the load for `asset_ref`, starting it with `start` if it was never requested
    pub fn poll_or_start(
        &self,
        asset_ref: &str,
        start: impl FnOnce() -> LoadFuture<H>,
    ) -> LoadState<H> {
        let mut slots = self.lock();
        let slot = slots.entry(asset_ref.to_string()).or_insert_with(|| {
            info!(asset_ref = %asset_ref, "Starting asset load");
            CacheSlot::InFlight(start())
        });
        advance(asset_ref, slot)
    }

    /// Advance an existing load; `None` if `asset_ref` was never requested
    pub fn poll(&self, asset_ref: &str) -> Option<LoadState<H>> {
        let mut slots = self.lock();
        slots.get_mut(asset_ref).map(|slot| advance(asset_ref, slot))
    }

    /// Forget a settled load so the next request starts a fresh one
    ///
    /// Returns false if nothing was removed (unknown or still in flight).
    pub fn invalidate(&self, asset_ref: &str) -> bool {
        let mut slots = self.lock();
        match slots.get(asset_ref) {
            Some(CacheSlot::Loaded(_)) | Some(CacheSlot::Failed(_)) => {
                slots.remove(asset_ref);
                info!(asset_ref = %asset_ref, "Asset invalidated");
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, asset_ref: &str) -> bool {
        self.lock().contains_key(asset_ref)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn advance<H: Clone>(asset_ref: &str, slot: &mut CacheSlot<H>) -> LoadState<H> {
    if let CacheSlot::InFlight(future) = slot {
        let mut cx = Context::from_waker(noop_waker_ref());
        let poll = future.as_mut().poll(&mut cx);
        match poll {
            Poll::Pending => return LoadState::Pending,
            Poll::Ready(Ok(handle)) => {
                info!(asset_ref = %asset_ref, "Asset loaded");
                *slot = CacheSlot::Loaded(handle);
            }
            Poll::Ready(Err(failure)) => {
                warn!(
                    asset_ref = %asset_ref,
                    error = %failure,
                    "Asset load failed, using procedural fallback"
                );
                *slot = CacheSlot::Failed(failure);
            }
        }
    }

    match slot {
        CacheSlot::InFlight(_) => LoadState::Pending,
        CacheSlot::Loaded(handle) => LoadState::Loaded(handle.clone()),
        CacheSlot::Failed(failure) => LoadState::Failed(failure.clone()),
    }
}

/// Resolves hotspots to visuals through a loader and a (possibly shared) cache
pub struct AssetResolver<L: AssetLoader> {
    loader: L,
    cache: AssetCache<L::Handle>,
}

impl<L: AssetLoader> AssetResolver<L> {
    /// Resolver with a private cache
    pub fn new(loader: L) -> Self {
        Self::with_cache(loader, AssetCache::new())
    }

    /// Resolver that shares `cache` with other resolvers
    pub fn with_cache(loader: L, cache: AssetCache<L::Handle>) -> Self {
        Self { loader, cache }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn cache(&self) -> &AssetCache<L::Handle> {
        &self.cache
    }

    /// Current visual for `hotspot`, starting its load on first use
    ///
    /// Load failures are absorbed here: the caller only ever sees `Pending`
    /// or a drawable visual.
    pub fn resolve(&self, hotspot: &Hotspot) -> Resolution<L::Handle> {
        let fallback = ResolvedVisual::Procedural(hotspot.icon.procedural_shape());

        let Some(asset_ref) = hotspot.asset_ref() else {
            return Resolution::Ready(fallback);
        };

        match self
            .cache
            .poll_or_start(asset_ref, || self.loader.load(asset_ref))
        {
            LoadState::Pending => Resolution::Pending,
            LoadState::Loaded(handle) => Resolution::Ready(ResolvedVisual::LoadedAsset(handle)),
            LoadState::Failed(_) => Resolution::Ready(fallback),
        }
    }

    /// Raw load state for `hotspot`; `None` if it has no asset or was never resolved
    pub fn load_state(&self, hotspot: &Hotspot) -> Option<LoadState<L::Handle>> {
        hotspot
            .asset_ref()
            .and_then(|asset_ref| self.cache.poll(asset_ref))
    }

    /// Allow the next `resolve` of `hotspot` to retry its load
    pub fn invalidate(&self, hotspot: &Hotspot) -> bool {
        hotspot
            .asset_ref()
            .map(|asset_ref| self.cache.invalidate(asset_ref))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotspot::IconKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn failing_loader(
        calls: Arc<AtomicUsize>,
    ) -> impl AssetLoader<Handle = &'static str> {
        FnLoader::new(move |asset_ref: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            let failure = AssetLoadFailure::new(asset_ref, "not found");
            async move { Err::<&'static str, _>(failure) }
        })
    }

    fn counting_loader(
        calls: Arc<AtomicUsize>,
    ) -> impl AssetLoader<Handle = String> {
        FnLoader::new(move |asset_ref: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            let handle = format!("handle:{}", asset_ref);
            async move { Ok::<_, AssetLoadFailure>(handle) }
        })
    }

    /// Loader whose single load completes when the returned sender fires
    fn deferred_loader() -> (
        impl AssetLoader<Handle = String>,
        oneshot::Sender<Result<String, AssetLoadFailure>>,
    ) {
        let (tx, rx) = oneshot::channel();
        let rx = Mutex::new(Some(rx));
        let loader = FnLoader::new(move |asset_ref: &str| {
            let rx = rx.lock().unwrap().take();
            let asset_ref = asset_ref.to_string();
            async move {
                match rx {
                    Some(rx) => rx
                        .await
                        .unwrap_or_else(|_| Err(AssetLoadFailure::new(asset_ref, "sender dropped"))),
                    None => Err(AssetLoadFailure::new(asset_ref, "already loaded once")),
                }
            }
        });
        (loader, tx)
    }

    #[test]
    fn test_missing_asset_resolves_procedural_without_loading() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = AssetResolver::new(counting_loader(calls.clone()));
        let herbal = Hotspot::new("herbal", [0.0; 3], IconKind::Leaf).with_asset("");

        assert_eq!(
            resolver.resolve(&herbal),
            Resolution::Ready(ResolvedVisual::Procedural(ProceduralShape::Leaf))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(resolver.cache().is_empty());
        assert!(resolver.load_state(&herbal).is_none());
    }

    #[test]
    fn test_load_failure_falls_back_and_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = AssetResolver::new(failing_loader(calls.clone()));
        let hotspot =
            Hotspot::new("panchakarma", [0.0; 3], IconKind::Mortar).with_asset("/models/mortar.glb");

        let expected = Resolution::Ready(ResolvedVisual::Procedural(ProceduralShape::Mortar));
        assert_eq!(resolver.resolve(&hotspot), expected);
        assert_eq!(resolver.resolve(&hotspot), expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(resolver.load_state(&hotspot), Some(LoadState::Failed(_))));
    }

    #[test]
    fn test_unknown_icon_failure_falls_back_to_leaf() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = AssetResolver::new(failing_loader(calls));
        let hotspot = Hotspot::new("x", [0.0; 3], IconKind::Unknown).with_asset("/models/x.glb");

        assert_eq!(
            resolver.resolve(&hotspot),
            Resolution::Ready(ResolvedVisual::Procedural(ProceduralShape::Leaf))
        );
    }

    #[test]
    fn test_invalidate_allows_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = AssetResolver::new(failing_loader(calls.clone()));
        let hotspot = Hotspot::new("a", [0.0; 3], IconKind::Leaf).with_asset("/models/leaf.glb");

        resolver.resolve(&hotspot);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(resolver.invalidate(&hotspot));
        resolver.resolve(&hotspot);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_successful_load_is_shared_per_reference() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = AssetResolver::new(counting_loader(calls.clone()));
        let a = Hotspot::new("a", [0.0; 3], IconKind::Leaf).with_asset("/models/leaf.glb");
        let b = Hotspot::new("b", [1.0; 3], IconKind::Mortar).with_asset("/models/leaf.glb");

        let expected =
            Resolution::Ready(ResolvedVisual::LoadedAsset("handle:/models/leaf.glb".to_string()));
        assert_eq!(resolver.resolve(&a), expected);
        assert_eq!(resolver.resolve(&b), expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_shared_between_resolvers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = AssetCache::new();
        let first = AssetResolver::with_cache(counting_loader(calls.clone()), cache.clone());
        let second = AssetResolver::with_cache(counting_loader(calls.clone()), cache.clone());
        let hotspot = Hotspot::new("a", [0.0; 3], IconKind::Leaf).with_asset("/models/leaf.glb");

        first.resolve(&hotspot);
        second.resolve(&hotspot);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_pending_until_load_completes() {
        let (loader, tx) = deferred_loader();
        let resolver = AssetResolver::new(loader);
        let hotspot = Hotspot::new("a", [0.0; 3], IconKind::Calendar).with_asset("/models/calendar.glb");

        assert!(resolver.resolve(&hotspot).is_pending());
        assert!(resolver.resolve(&hotspot).is_pending());
        assert!(!resolver.invalidate(&hotspot));

        tx.send(Ok("calendar-scene".to_string())).unwrap();
        assert_eq!(
            resolver.resolve(&hotspot),
            Resolution::Ready(ResolvedVisual::LoadedAsset("calendar-scene".to_string()))
        );
    }

    #[test]
    fn test_pending_load_discarded_after_teardown() {
        let (loader, tx) = deferred_loader();
        let resolver = AssetResolver::new(loader);
        let hotspot = Hotspot::new("a", [0.0; 3], IconKind::Leaf).with_asset("/models/leaf.glb");

        assert!(resolver.resolve(&hotspot).is_pending());
        drop(resolver);

        // Nobody is left to receive the result
        assert!(tx.send(Ok("late".to_string())).is_err());
    }
}
