#![allow(dead_code)]

use async_trait::async_trait;
use clip_library::api::{check_status, page_context, FetchError, LibraryApi, META_CONTEXT, VIDEOS_CONTEXT};
use clip_library::cache::{Clock, LibraryCache, SessionBackend, StorageError};
use clip_library::controller::{LibraryConfig, LibraryController};
use clip_library::models::{Clip, ClipType, ClipsPage, LibraryMeta, VideoItem, ViewVariant};
use clip_library::session::{Delay, LibrarySession, MountGuard};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Meta,
    Page {
        variant: ViewVariant,
        limit: usize,
        offset: usize,
    },
    SetFavorite {
        clip_id: String,
        value: bool,
    },
    Videos,
}

/// Scripted in-memory server.
#[derive(Default)]
pub struct MockApi {
    pub meta: RefCell<Option<LibraryMeta>>,
    pub pages: RefCell<HashMap<(ViewVariant, usize), ClipsPage>>,
    pub page_status: RefCell<Option<u16>>,
    pub favorite_status: RefCell<Option<u16>>,
    pub favorite_latency: Cell<Duration>,
    pub calls: RefCell<Vec<(Instant, ApiCall)>>,
    pub before_response: RefCell<Option<Box<dyn Fn()>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, variant: ViewVariant, page: ClipsPage) -> Self {
        self.pages.borrow_mut().insert((variant, page.offset), page);
        self
    }

    pub fn with_meta(self, meta: LibraryMeta) -> Self {
        *self.meta.borrow_mut() = Some(meta);
        self
    }

    pub fn fail_pages_with(&self, status: u16) {
        *self.page_status.borrow_mut() = Some(status);
    }

    pub fn fail_favorites_with(&self, status: u16) {
        *self.favorite_status.borrow_mut() = Some(status);
    }

    /// Holds every favorite update this long before answering.
    pub fn delay_favorites_by(&self, latency: Duration) {
        self.favorite_latency.set(latency);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().iter().map(|(_, call)| call.clone()).collect()
    }

    pub fn page_calls(&self) -> Vec<(Instant, usize)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|(at, call)| match call {
                ApiCall::Page { offset, .. } => Some((*at, *offset)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.borrow_mut().push((Instant::now(), call));
    }

    fn run_hook(&self) {
        if let Some(hook) = self.before_response.borrow().as_ref() {
            hook();
        }
    }

    fn page(&self, variant: ViewVariant, limit: usize, offset: usize) -> Result<ClipsPage, FetchError> {
        self.record(ApiCall::Page {
            variant,
            limit,
            offset,
        });
        self.run_hook();
        if let Some(status) = *self.page_status.borrow() {
            check_status(page_context(variant), status)?;
        }
        Ok(self
            .pages
            .borrow()
            .get(&(variant, offset))
            .cloned()
            .unwrap_or(ClipsPage {
                clips: vec![],
                limit,
                offset,
                next_offset: offset,
                has_more: false,
            }))
    }
}

#[async_trait(?Send)]
impl LibraryApi for MockApi {
    async fn fetch_library_meta(&self) -> Result<LibraryMeta, FetchError> {
        self.record(ApiCall::Meta);
        self.meta.borrow().clone().ok_or(FetchError::Status {
            context: META_CONTEXT,
            status: 500,
        })
    }

    async fn fetch_library_clips(&self, limit: usize, offset: usize) -> Result<ClipsPage, FetchError> {
        tokio::task::yield_now().await;
        self.page(ViewVariant::All, limit, offset)
    }

    async fn fetch_favorite_clips(&self, limit: usize, offset: usize) -> Result<ClipsPage, FetchError> {
        tokio::task::yield_now().await;
        self.page(ViewVariant::FavoritesOnly, limit, offset)
    }

    async fn set_clip_favorite(&self, clip_id: &str, value: bool) -> Result<(), FetchError> {
        self.record(ApiCall::SetFavorite {
            clip_id: clip_id.to_string(),
            value,
        });
        tokio::task::yield_now().await;
        let latency = self.favorite_latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.run_hook();
        match *self.favorite_status.borrow() {
            Some(status) => check_status(clip_library::api::SET_FAVORITE_CONTEXT, status),
            None => Ok(()),
        }
    }

    async fn fetch_videos(&self) -> Result<Vec<VideoItem>, FetchError> {
        self.record(ApiCall::Videos);
        check_status(VIDEOS_CONTEXT, 200)?;
        Ok(vec![])
    }
}

/// Session storage kept in a map.
#[derive(Default)]
pub struct MemorySessionBackend {
    items: RefCell<HashMap<String, String>>,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl SessionBackend for MemorySessionBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Wall clock for the cache; moves only through `advance`.
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Cell::new(start_millis),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.as_millis() as i64);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

/// Sleeps on tokio's clock and records every requested delay.
#[derive(Default)]
pub struct TokioDelay {
    pub requested: RefCell<Vec<Duration>>,
}

#[async_trait(?Send)]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        self.requested.borrow_mut().push(duration);
        tokio::time::sleep(duration).await;
    }
}

pub fn clip(id: usize, favorite: bool) -> Clip {
    Clip {
        id: id.to_string(),
        video_id: "1".to_string(),
        title: format!("Clip {id}"),
        summary: String::new(),
        clip_type: if id % 2 == 0 {
            ClipType::Concept
        } else {
            ClipType::Technique
        },
        tags: vec![],
        main_tags: vec![format!("main-{}", id % 3)],
        video_tags: vec![],
        sub_tags: vec![],
        position: None,
        duration: 10 + id as u32,
        timestamp_start: "00:00".to_string(),
        timestamp_end: "00:10".to_string(),
        source_course: "Fundamentals".to_string(),
        source_video: None,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        file_path: format!("supabase://clips/{id}.mp4"),
        thumbnail_url: None,
        is_favorite: favorite,
    }
}

pub fn page(start: usize, count: usize, has_more: bool, favorite: bool) -> ClipsPage {
    ClipsPage {
        clips: (start..start + count).map(|id| clip(id, favorite)).collect(),
        limit: 36,
        offset: start,
        next_offset: start + count,
        has_more,
    }
}

pub struct Harness {
    pub api: Rc<MockApi>,
    pub delay: Rc<TokioDelay>,
    pub cache: Rc<LibraryCache>,
    pub session_store: Rc<MemorySessionBackend>,
    pub clock: Rc<ManualClock>,
    pub guard: MountGuard,
    pub changes: Rc<RefCell<usize>>,
}

impl Harness {
    pub fn new(api: MockApi) -> Self {
        let session_store = Rc::new(MemorySessionBackend::new());
        let clock = Rc::new(ManualClock::new(1_700_000_000_000));
        let cache = Rc::new(LibraryCache::new(session_store.clone(), clock.clone()));
        Self {
            api: Rc::new(api),
            delay: Rc::new(TokioDelay::default()),
            cache,
            session_store,
            clock,
            guard: MountGuard::new(),
            changes: Rc::new(RefCell::new(0)),
        }
    }

    pub fn session(&self, variant: ViewVariant) -> LibrarySession<MockApi, TokioDelay> {
        self.session_with(variant, Rc::new(|| {}))
    }

    pub fn session_with(
        &self,
        variant: ViewVariant,
        on_change: Rc<dyn Fn()>,
    ) -> LibrarySession<MockApi, TokioDelay> {
        let controller = Rc::new(RefCell::new(LibraryController::new(
            variant,
            self.cache.clone(),
            LibraryConfig::default(),
        )));
        let changes = self.changes.clone();
        let on_change: Rc<dyn Fn()> = Rc::new(move || {
            *changes.borrow_mut() += 1;
            on_change();
        });
        LibrarySession::new(
            controller,
            self.api.clone(),
            self.delay.clone(),
            self.guard.clone(),
            on_change,
        )
    }
}
