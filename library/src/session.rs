//! Async drivers that connect a [`LibraryController`] to a [`LibraryApi`].
//!
//! A [`LibrarySession`] is cheap to clone: every field is reference counted,
//! so a view can hand clones to spawned futures. Controller borrows are only
//! taken between await points.

use crate::api::LibraryApi;
use crate::controller::{Activation, FavoriteMutation, LibraryController, PageRequest};
use async_trait::async_trait;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// Tracks whether the view that owns a session is still mounted. Results that
/// arrive after unmount are dropped; the requests themselves are not aborted.
#[derive(Debug, Clone)]
pub struct MountGuard(Rc<Cell<bool>>);

impl MountGuard {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn unmount(&self) {
        self.0.set(false);
    }

    pub fn is_mounted(&self) -> bool {
        self.0.get()
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LibrarySession<A: ?Sized, D: ?Sized> {
    controller: Rc<RefCell<LibraryController>>,
    api: Rc<A>,
    delay: Rc<D>,
    guard: MountGuard,
    on_change: Rc<dyn Fn()>,
}

impl<A: ?Sized, D: ?Sized> Clone for LibrarySession<A, D> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            api: self.api.clone(),
            delay: self.delay.clone(),
            guard: self.guard.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<A, D> LibrarySession<A, D>
where
    A: LibraryApi + ?Sized,
    D: Delay + ?Sized,
{
    pub fn new(
        controller: Rc<RefCell<LibraryController>>,
        api: Rc<A>,
        delay: Rc<D>,
        guard: MountGuard,
        on_change: Rc<dyn Fn()>,
    ) -> Self {
        Self {
            controller,
            api,
            delay,
            guard,
            on_change,
        }
    }

    pub fn controller(&self) -> &Rc<RefCell<LibraryController>> {
        &self.controller
    }

    pub fn guard(&self) -> &MountGuard {
        &self.guard
    }

    fn notify(&self) {
        if self.guard.is_mounted() {
            (self.on_change)();
        }
    }

    /// Activates the view, then keeps fetching pages in the background until
    /// the server runs out or something fails.
    pub async fn start(&self) {
        self.activate().await;
        self.auto_paginate().await;
    }

    pub async fn activate(&self) {
        let activation = self.controller.borrow_mut().activate();
        self.notify();
        if let Activation::FetchFirstPage(request) = activation {
            self.load_first_page(request).await;
        }
    }

    async fn load_first_page(&self, request: PageRequest) {
        match self.api.fetch_library_meta().await {
            Ok(meta) => {
                if self.guard.is_mounted() {
                    self.controller.borrow_mut().apply_meta(&meta);
                }
            }
            // Option sets then come from clip payloads only.
            Err(e) => warn!("{e}"),
        }
        if !self.guard.is_mounted() {
            return;
        }

        let result = self
            .api
            .fetch_page(request.variant, request.limit, request.offset)
            .await;
        if !self.guard.is_mounted() {
            debug!("View unmounted, dropping first page");
            return;
        }
        self.controller.borrow_mut().apply_page(request, result);
        self.notify();
    }

    /// Fetches the next page if the controller allows it. Returns `true` when
    /// a page was merged.
    pub async fn load_more(&self) -> bool {
        let Some(request) = self.controller.borrow_mut().begin_load_more() else {
            return false;
        };
        self.notify();

        let result = self
            .api
            .fetch_page(request.variant, request.limit, request.offset)
            .await;
        if !self.guard.is_mounted() {
            debug!("View unmounted, dropping page at offset {}", request.offset);
            return false;
        }
        let merged = self.controller.borrow_mut().apply_page(request, result);
        self.notify();
        merged
    }

    /// Background prefetch loop. Waits the configured delay before each page.
    pub async fn auto_paginate(&self) {
        let delay = self.controller.borrow().config().auto_paginate_delay;
        while self.guard.is_mounted() && self.controller.borrow().should_auto_paginate() {
            self.delay.sleep(delay).await;
            if !self.guard.is_mounted() || !self.controller.borrow().should_auto_paginate() {
                break;
            }
            if !self.load_more().await {
                break;
            }
        }
    }

    /// Clears an error and resumes loading.
    pub async fn retry(&self) {
        let request = self.controller.borrow_mut().retry();
        self.notify();
        if let Some(request) = request {
            self.load_first_page(request).await;
        }
        self.auto_paginate().await;
    }

    /// Optimistic favorite toggle. Returns the settled mutation, or `None`
    /// when the toggle was rejected.
    ///
    /// The outcome is applied even if the view unmounted meanwhile. A commit
    /// clears the shared cache; a rollback has nothing to undo there because
    /// pending values are never persisted.
    pub async fn toggle_favorite(&self, clip_id: &str) -> Option<FavoriteMutation> {
        let toggle = self.controller.borrow_mut().begin_toggle(clip_id)?;
        self.notify();

        let result = self
            .api
            .set_clip_favorite(&toggle.clip_id, toggle.requested)
            .await;
        let outcome = self.controller.borrow_mut().finish_toggle(toggle, result);
        self.notify();
        Some(outcome)
    }
}
