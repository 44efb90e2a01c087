use crate::api::GlooLibraryApi;
use crate::storage::BrowserSessionStorage;
use async_trait::async_trait;
use clip_library::api::ApiEndpoints;
use clip_library::cache::{LibraryCache, SystemClock};
use clip_library::controller::{LibraryConfig, LibraryController};
use clip_library::models::ViewVariant;
use clip_library::session::{Delay, LibrarySession, MountGuard};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub struct GlooDelay;

#[async_trait(?Send)]
impl Delay for GlooDelay {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

pub type ViewSession = LibrarySession<GlooLibraryApi, GlooDelay>;

/// Everything a view needs to talk to the server, shared through a yew
/// context. One cache instance serves both view variants.
#[derive(Clone)]
pub struct LibraryServices {
    api: Rc<GlooLibraryApi>,
    cache: Rc<LibraryCache>,
    delay: Rc<GlooDelay>,
    config: LibraryConfig,
}

impl PartialEq for LibraryServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.api, &other.api) && Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl LibraryServices {
    pub fn new(base_url: &str) -> Self {
        Self {
            api: Rc::new(GlooLibraryApi::new(base_url)),
            cache: Rc::new(LibraryCache::new(BrowserSessionStorage, SystemClock)),
            delay: Rc::new(GlooDelay),
            config: LibraryConfig::default(),
        }
    }

    pub fn api(&self) -> &Rc<GlooLibraryApi> {
        &self.api
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        self.api.endpoints()
    }

    pub fn session(&self, variant: ViewVariant, on_change: Rc<dyn Fn()>) -> ViewSession {
        let controller = LibraryController::new(variant, self.cache.clone(), self.config.clone());
        LibrarySession::new(
            Rc::new(RefCell::new(controller)),
            self.api.clone(),
            self.delay.clone(),
            MountGuard::new(),
            on_change,
        )
    }
}
