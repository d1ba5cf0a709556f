//! Asynchronous font loading with per-font readiness
//!
//! The loader is executor-agnostic: fetching goes through a caller-supplied
//! [`FontFetcher`], and timeouts take a caller-supplied timer future. Each
//! font has its own load, so a render never waits on fonts it does not use.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{self, AbortHandle, Abortable, BoxFuture, Either, FutureExt, Shared};
use thiserror::Error;

use super::{default_font, get_font, get_font_urls, FontDescriptor};

/// Why a font could not be loaded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FontLoadError {
    #[error("font '{name}' has no loadable sources")]
    NoSources { name: String },

    #[error("failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("loading font '{name}' was cancelled")]
    Cancelled { name: String },

    #[error("loading font '{name}' timed out")]
    TimedOut { name: String },
}

impl FontLoadError {
    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Retrieves the bytes behind a font URL
pub trait FontFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, FontLoadError>>;
}

/// Readiness of one font
#[derive(Debug, Clone, PartialEq)]
pub enum FontStatus {
    Loading,
    Ready,
    Failed(FontLoadError),
}

impl FontStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, FontStatus::Ready)
    }
}

/// A font whose data has been fetched
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub descriptor: FontDescriptor,
    /// The source that succeeded
    pub url: String,
    pub data: Arc<Vec<u8>>,
}

type SharedLoad = Shared<BoxFuture<'static, FontStatus>>;

enum Entry {
    Loading {
        id: u64,
        load: SharedLoad,
        abort: AbortHandle,
    },
    Ready(LoadedFont),
    Failed(FontLoadError),
}

struct Inner {
    fetcher: Arc<dyn FontFetcher>,
    entries: Mutex<HashMap<String, Entry>>,
    next_id: AtomicU64,
}

impl Inner {
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the outcome of load `id` unless it was cancelled or superseded
    fn finish(&self, key: &str, id: u64, outcome: Result<LoadedFont, FontLoadError>) -> FontStatus {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(Entry::Loading { id: current, .. }) if *current == id => {}
            Some(Entry::Failed(err)) => return FontStatus::Failed(err.clone()),
            Some(Entry::Ready(_)) => return FontStatus::Ready,
            _ => {
                return FontStatus::Failed(FontLoadError::Cancelled {
                    name: key.to_string(),
                })
            }
        }
        match outcome {
            Ok(font) => {
                log::debug!("font '{}' ready from {}", key, font.url);
                entries.insert(key.to_string(), Entry::Ready(font));
                FontStatus::Ready
            }
            Err(err) => {
                log::warn!("font '{}' failed to load, using default font: {}", key, err);
                entries.insert(key.to_string(), Entry::Failed(err.clone()));
                FontStatus::Failed(err)
            }
        }
    }
}

/// Loads registered fonts and tracks which ones are ready
#[derive(Clone)]
pub struct FontLoader {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for FontLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLoader")
            .field("fonts", &self.inner.entries().len())
            .finish()
    }
}

impl FontLoader {
    /// Create a loader backed by the given fetcher
    pub fn new(fetcher: impl FontFetcher + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher: Arc::new(fetcher),
                entries: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Start (or join) loading a font.
    ///
    /// Unknown names load the default font. A font that is already ready
    /// resolves immediately, and a load in flight is shared rather than
    /// fetched twice. Failed or cancelled loads are retried.
    pub fn load_font(&self, name: &str) -> BoxFuture<'static, FontStatus> {
        let descriptor = get_font(name);
        let key = descriptor.name.clone();

        let mut entries = self.inner.entries();
        match entries.get(&key) {
            Some(Entry::Ready(_)) => return future::ready(FontStatus::Ready).boxed(),
            Some(Entry::Loading { load, .. }) => return load.clone().boxed(),
            _ => {}
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let urls = get_font_urls(&key);
        let fetch = fetch_first(Arc::clone(&self.inner.fetcher), descriptor, urls);
        let (abort, registration) = AbortHandle::new_pair();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let task_key = key.clone();

        let load = async move {
            let outcome = match Abortable::new(fetch, registration).await {
                Ok(result) => result,
                Err(_aborted) => Err(FontLoadError::Cancelled {
                    name: task_key.clone(),
                }),
            };
            match weak.upgrade() {
                Some(inner) => inner.finish(&task_key, id, outcome),
                None => match outcome {
                    Ok(_) => FontStatus::Ready,
                    Err(err) => FontStatus::Failed(err),
                },
            }
        }
        .boxed()
        .shared();

        entries.insert(
            key,
            Entry::Loading {
                id,
                load: load.clone(),
                abort,
            },
        );
        load.boxed()
    }

    /// Load several fonts concurrently; failures stay isolated per font
    pub async fn load_fonts<S: AsRef<str>>(&self, names: &[S]) -> Vec<(String, FontStatus)> {
        let loads = names.iter().map(|name| {
            let name = name.as_ref().to_string();
            self.load_font(&name).map(move |status| (name, status))
        });
        future::join_all(loads).await
    }

    /// Load a font, giving up when `timer` completes first.
    ///
    /// On expiry the shared load is cancelled, so every waiter sees
    /// [`FontLoadError::TimedOut`] and the font can be retried later.
    pub async fn load_font_with_timeout<T>(&self, name: &str, timer: T) -> FontStatus
    where
        T: Future<Output = ()>,
    {
        let load = self.load_font(name);
        match future::select(load, Box::pin(timer)).await {
            Either::Left((status, _)) => status,
            Either::Right(((), _)) => {
                let key = get_font(name).name;
                let err = FontLoadError::TimedOut { name: key.clone() };
                self.abort_with(&key, err.clone());
                FontStatus::Failed(err)
            }
        }
    }

    /// Cancel an in-flight load; returns whether anything was cancelled
    pub fn cancel(&self, name: &str) -> bool {
        let key = get_font(name).name;
        let err = FontLoadError::Cancelled { name: key.clone() };
        self.abort_with(&key, err)
    }

    fn abort_with(&self, key: &str, err: FontLoadError) -> bool {
        let mut entries = self.inner.entries();
        if let Some(Entry::Loading { abort, .. }) = entries.get(key) {
            abort.abort();
            entries.insert(key.to_string(), Entry::Failed(err));
            return true;
        }
        false
    }

    /// Current readiness, or `None` if the font was never requested
    pub fn status(&self, name: &str) -> Option<FontStatus> {
        let key = get_font(name).name;
        self.inner.entries().get(&key).map(|entry| match entry {
            Entry::Loading { .. } => FontStatus::Loading,
            Entry::Ready(_) => FontStatus::Ready,
            Entry::Failed(err) => FontStatus::Failed(err.clone()),
        })
    }

    pub fn is_ready(&self, name: &str) -> bool {
        matches!(self.status(name), Some(FontStatus::Ready))
    }

    /// Completes once the font's current load settles.
    ///
    /// Does not start a load; `None` if the font was never requested.
    pub fn ready(&self, name: &str) -> Option<BoxFuture<'static, FontStatus>> {
        let key = get_font(name).name;
        let entries = self.inner.entries();
        match entries.get(&key)? {
            Entry::Loading { load, .. } => Some(load.clone().boxed()),
            Entry::Ready(_) => Some(future::ready(FontStatus::Ready).boxed()),
            Entry::Failed(err) => Some(future::ready(FontStatus::Failed(err.clone())).boxed()),
        }
    }

    /// Fetched data of a ready font
    pub fn loaded(&self, name: &str) -> Option<LoadedFont> {
        let key = get_font(name).name;
        match self.inner.entries().get(&key) {
            Some(Entry::Ready(font)) => Some(font.clone()),
            _ => None,
        }
    }

    /// Font to render with right now: the requested one if it is ready,
    /// otherwise the default font as a placeholder
    pub fn resolve_render_font(&self, name: &str) -> FontDescriptor {
        let font = get_font(name);
        if self.is_ready(&font.name) {
            font
        } else {
            get_font(&default_font())
        }
    }
}

async fn fetch_first(
    fetcher: Arc<dyn FontFetcher>,
    descriptor: FontDescriptor,
    urls: Vec<String>,
) -> Result<LoadedFont, FontLoadError> {
    let mut last_error = FontLoadError::NoSources {
        name: descriptor.name.clone(),
    };
    for url in urls {
        match fetcher.fetch(&url).await {
            Ok(data) => {
                return Ok(LoadedFont {
                    descriptor,
                    url,
                    data: Arc::new(data),
                })
            }
            Err(err) => {
                log::debug!("font source {} failed: {}", url, err);
                last_error = err;
            }
        }
    }
    Err(last_error)
}
