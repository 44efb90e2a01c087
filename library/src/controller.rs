//! Library state controller for one view variant.
//!
//! The controller never performs I/O. Each network step is split into a
//! `begin_*` call that moves the state machine and hands out a request, and an
//! `apply_*`/`finish_*` call that folds the result back in. This keeps every
//! transition synchronous, so callers can hold the controller in a `RefCell`
//! without keeping a borrow alive across an await point.

use crate::api::FetchError;
use crate::cache::LibraryCache;
use crate::filter::{filter_and_sort, ClipFilter, SortMode};
use crate::models::{CachedLibraryState, Clip, ClipsPage, LibraryMeta, ViewVariant};
use crate::tag_options::FacetOptions;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 36;
pub const AUTO_PAGINATE_DELAY: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub page_size: usize,
    pub auto_paginate_delay: Duration,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            auto_paginate_delay: AUTO_PAGINATE_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    HydratingFromCache,
    LoadingFirstPage,
    Idle,
    LoadingMore,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub variant: ViewVariant,
    pub limit: usize,
    pub offset: usize,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A fresh snapshot was found; no request is needed.
    Hydrated,
    FetchFirstPage(PageRequest),
}

/// Handed out by [`LibraryController::begin_toggle`], returned to
/// [`LibraryController::finish_toggle`] once the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub clip_id: String,
    pub previous: bool,
    pub requested: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteMutation {
    Pending {
        clip_id: String,
        previous: bool,
        requested: bool,
    },
    Committed {
        clip_id: String,
        value: bool,
    },
    RolledBack {
        clip_id: String,
        restored: bool,
        error: FetchError,
    },
}

impl FavoriteMutation {
    pub fn clip_id(&self) -> &str {
        match self {
            FavoriteMutation::Pending { clip_id, .. }
            | FavoriteMutation::Committed { clip_id, .. }
            | FavoriteMutation::RolledBack { clip_id, .. } => clip_id,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FavoriteMutation::Pending { .. })
    }
}

#[derive(Debug)]
pub struct LibraryController {
    variant: ViewVariant,
    config: LibraryConfig,
    cache: Rc<LibraryCache>,
    phase: Phase,
    clips: Vec<Clip>,
    options: FacetOptions,
    has_more: bool,
    next_offset: usize,
    load_in_flight: bool,
    /// Set by a failed page load; blocks background pagination until retry.
    page_error: Option<String>,
    /// Set by a rolled back favorite toggle; display only.
    favorite_error: Option<String>,
    selected: Option<Clip>,
    generation: u64,
    /// Only toggles still waiting on the server.
    pending: HashMap<String, FavoriteMutation>,
}

impl LibraryController {
    pub fn new(variant: ViewVariant, cache: Rc<LibraryCache>, config: LibraryConfig) -> Self {
        Self {
            variant,
            config,
            cache,
            phase: Phase::Uninitialized,
            clips: Vec::new(),
            options: FacetOptions::default(),
            has_more: false,
            next_offset: 0,
            load_in_flight: false,
            page_error: None,
            favorite_error: None,
            selected: None,
            generation: 0,
            pending: HashMap::new(),
        }
    }

    pub fn variant(&self) -> ViewVariant {
        self.variant
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn options(&self) -> &FacetOptions {
        &self.options
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    pub fn is_load_in_flight(&self) -> bool {
        self.load_in_flight
    }

    /// The message to show inline. A page failure wins over a favorite one.
    pub fn error(&self) -> Option<&str> {
        self.page_error
            .as_deref()
            .or(self.favorite_error.as_deref())
    }

    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    pub fn favorite_error(&self) -> Option<&str> {
        self.favorite_error.as_deref()
    }

    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected.as_ref()
    }

    pub fn favorite_mutation(&self, clip_id: &str) -> Option<&FavoriteMutation> {
        self.pending.get(clip_id)
    }

    /// Ids of clips whose favorite toggle is still waiting on the server.
    pub fn pending_favorites(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }

    pub fn visible_clips(&self, filter: &ClipFilter, sort: SortMode) -> Vec<&Clip> {
        filter_and_sort(&self.clips, filter, sort)
    }

    /// Starts (or restarts) the view: hydrate from cache or ask for page one.
    pub fn activate(&mut self) -> Activation {
        self.generation += 1;
        self.phase = Phase::HydratingFromCache;

        if let Some(snapshot) = self.cache.read(self.variant) {
            debug!(
                "Hydrated {:?} from cache with {} clips",
                self.variant,
                snapshot.clips.len()
            );
            self.hydrate(snapshot);
            self.phase = Phase::Idle;
            return Activation::Hydrated;
        }

        Activation::FetchFirstPage(self.start_first_page())
    }

    fn start_first_page(&mut self) -> PageRequest {
        self.phase = Phase::LoadingFirstPage;
        self.load_in_flight = true;
        self.page_error = None;
        self.request_at(0)
    }

    fn request_at(&self, offset: usize) -> PageRequest {
        PageRequest {
            variant: self.variant,
            limit: self.config.page_size,
            offset,
            generation: self.generation,
        }
    }

    fn hydrate(&mut self, snapshot: CachedLibraryState) {
        self.options = FacetOptions::from_snapshot(&snapshot);
        self.has_more = snapshot.has_more_from_server;
        self.next_offset = snapshot.next_offset;
        self.clips = snapshot.clips;
        self.load_in_flight = false;
        self.page_error = None;
    }

    /// Joins server-wide filter values into the option sets.
    pub fn apply_meta(&mut self, meta: &LibraryMeta) {
        self.options.merge_meta(meta);
    }

    /// Whether the background loop should fetch another page.
    pub fn should_auto_paginate(&self) -> bool {
        self.phase == Phase::Idle && self.has_more && !self.load_in_flight && self.page_error.is_none()
    }

    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.phase != Phase::Idle || self.load_in_flight || !self.has_more {
            return None;
        }
        self.phase = Phase::LoadingMore;
        self.load_in_flight = true;
        Some(self.request_at(self.next_offset))
    }

    /// Folds a page response into the state. Returns `true` when the page was
    /// merged; stale or failed responses return `false`.
    pub fn apply_page(
        &mut self,
        request: PageRequest,
        result: Result<ClipsPage, FetchError>,
    ) -> bool {
        if request.generation != self.generation || !self.load_in_flight {
            debug!("Dropping stale page response at offset {}", request.offset);
            return false;
        }

        let first_page = match self.phase {
            Phase::LoadingFirstPage if request.offset == 0 => true,
            Phase::LoadingMore if request.offset == self.next_offset => false,
            _ => {
                debug!(
                    "Dropping unexpected page response at offset {} in {:?}",
                    request.offset, self.phase
                );
                return false;
            }
        };
        self.load_in_flight = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!("Page load for {:?} failed: {e}", self.variant);
                self.page_error = Some(e.to_string());
                self.phase = if first_page { Phase::Error } else { Phase::Idle };
                return false;
            }
        };

        self.options.extend_from_clips(&page.clips);
        if first_page {
            self.clips.clear();
        }
        self.append_unique(page.clips);
        self.has_more = page.has_more;
        self.next_offset = page.next_offset;
        self.page_error = None;
        self.phase = Phase::Idle;
        self.persist();

        debug!(
            "{:?} now holds {} clips (has_more: {})",
            self.variant,
            self.clips.len(),
            self.has_more
        );
        true
    }

    fn append_unique(&mut self, incoming: Vec<Clip>) {
        let mut known: HashSet<String> = self.clips.iter().map(|c| c.id.clone()).collect();
        for clip in incoming {
            if known.insert(clip.id.clone()) {
                self.clips.push(clip);
            } else {
                debug!("Skipping duplicate clip {}", clip.id);
            }
        }
    }

    /// Recovers from an error. From [`Phase::Error`] this restarts the first
    /// page; after a failed background page it re-arms pagination.
    pub fn retry(&mut self) -> Option<PageRequest> {
        self.favorite_error = None;
        match self.phase {
            Phase::Error => Some(self.start_first_page()),
            Phase::Idle => {
                self.page_error = None;
                None
            }
            _ => None,
        }
    }

    pub fn dismiss_favorite_error(&mut self) {
        self.favorite_error = None;
    }

    pub fn select_clip(&mut self, clip_id: &str) -> bool {
        self.selected = self.clips.iter().find(|c| c.id == clip_id).cloned();
        self.selected.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn current_favorite(&self, clip_id: &str) -> Option<bool> {
        self.clips
            .iter()
            .find(|c| c.id == clip_id)
            .or(self.selected.as_ref().filter(|c| c.id == clip_id))
            .map(|c| c.is_favorite)
    }

    fn set_favorite_flag(&mut self, clip_id: &str, value: bool) {
        if let Some(clip) = self.clips.iter_mut().find(|c| c.id == clip_id) {
            clip.is_favorite = value;
        }
        if let Some(selected) = self.selected.as_mut().filter(|c| c.id == clip_id) {
            selected.is_favorite = value;
        }
    }

    /// Optimistically flips the favorite flag of `clip_id`.
    ///
    /// Returns `None` when the clip is unknown or a toggle for it is still
    /// waiting on the server.
    pub fn begin_toggle(&mut self, clip_id: &str) -> Option<FavoriteToggle> {
        if self
            .pending
            .get(clip_id)
            .is_some_and(FavoriteMutation::is_pending)
        {
            debug!("Favorite toggle for {clip_id} already pending");
            return None;
        }

        let previous = self.current_favorite(clip_id)?;
        let requested = !previous;
        self.set_favorite_flag(clip_id, requested);
        self.pending.insert(
            clip_id.to_string(),
            FavoriteMutation::Pending {
                clip_id: clip_id.to_string(),
                previous,
                requested,
            },
        );

        Some(FavoriteToggle {
            clip_id: clip_id.to_string(),
            previous,
            requested,
        })
    }

    pub fn finish_toggle(
        &mut self,
        toggle: FavoriteToggle,
        result: Result<(), FetchError>,
    ) -> FavoriteMutation {
        self.pending.remove(&toggle.clip_id);

        match result {
            Ok(()) => {
                self.cache.clear_library_caches();
                if self.variant.is_favorites_only() && !toggle.requested {
                    self.clips.retain(|c| c.id != toggle.clip_id);
                    if self
                        .selected
                        .as_ref()
                        .is_some_and(|c| c.id == toggle.clip_id)
                    {
                        self.selected = None;
                    }
                    self.persist();
                }
                FavoriteMutation::Committed {
                    clip_id: toggle.clip_id,
                    value: toggle.requested,
                }
            }
            Err(e) => {
                warn!("Favorite update for {} failed: {e}", toggle.clip_id);
                self.set_favorite_flag(&toggle.clip_id, toggle.previous);
                self.favorite_error = Some(e.to_string());
                FavoriteMutation::RolledBack {
                    clip_id: toggle.clip_id,
                    restored: toggle.previous,
                    error: e,
                }
            }
        }
    }

    /// The state as it may be persisted. Clips with a toggle in flight carry
    /// their last confirmed favorite value, never the optimistic one.
    pub fn snapshot(&self) -> CachedLibraryState {
        let clips = self
            .clips
            .iter()
            .map(|clip| match self.pending.get(&clip.id) {
                Some(FavoriteMutation::Pending { previous, .. }) => Clip {
                    is_favorite: *previous,
                    ..clip.clone()
                },
                _ => clip.clone(),
            })
            .collect();

        CachedLibraryState {
            clips,
            has_more_from_server: self.has_more,
            next_offset: self.next_offset,
            main_tag_options: self.options.main_tags.to_vec(),
            video_tag_options: self.options.video_tags.to_vec(),
            sub_tag_options: self.options.sub_tags.to_vec(),
            position_options: self.options.positions.to_vec(),
            cached_at: self.cache.now_millis(),
        }
    }

    fn persist(&self) {
        self.cache.write(self.variant, self.snapshot());
    }
}
