//! Document persistence backends.
//!
//! Documents are stored as plain JSON, so any backend that can keep a
//! string per key can implement [`Storage`].

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::canvas::{Canvas, CanvasDocument};
use crate::config::PlannerConfig;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future, usable on single-threaded wasm as well as native.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// `Send + Sync` on native targets, nothing on wasm.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> PlatformBounds for T {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> PlatformBounds for T {}

/// Keyed document store.
pub trait Storage: PlatformBounds {
    fn save(&self, id: &str, document: &CanvasDocument) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<CanvasDocument>>;

    /// Deleting a missing document succeeds.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Stored ids, sorted.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Load a document into a fresh canvas. The document is keyed by its own id.
pub async fn open_canvas<S: Storage + ?Sized>(
    storage: &S,
    id: &str,
    config: PlannerConfig,
) -> StorageResult<Canvas> {
    let document = storage.load(id).await?;
    log::debug!("opened '{}' ({} objects)", document.name, document.len());
    Ok(Canvas::with_document(document, config))
}

/// Save a canvas's document under the document id.
pub async fn save_canvas<S: Storage + ?Sized>(storage: &S, canvas: &Canvas) -> StorageResult<String> {
    let id = canvas.document.id.clone();
    storage.save(&id, &canvas.document).await?;
    Ok(id)
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn noop_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);
    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
