//! Core of the clip library client: wire types, the remote data client
//! contract, the session cache, filtering, and the per-view state controller.
//!
//! Nothing in this crate touches the browser. The `frontend` crate supplies
//! the HTTP client, session storage, and timers.

pub mod api;
pub mod cache;
pub mod controller;
pub mod filter;
pub mod format;
pub mod models;
pub mod session;
pub mod tag_options;

pub use api::{ApiEndpoints, FetchError, LibraryApi};
pub use cache::{Clock, LibraryCache, SessionBackend, StorageError, SystemClock};
pub use controller::{FavoriteMutation, LibraryConfig, LibraryController, Phase};
pub use filter::{ClipFilter, SortMode, TagFacet};
pub use models::{CachedLibraryState, Clip, ClipType, ClipsPage, LibraryMeta, VideoItem, ViewVariant};
pub use session::{Delay, LibrarySession, MountGuard};
pub use tag_options::{FacetOptions, TagOptions};
