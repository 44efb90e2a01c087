//! Remote data client contract.
//!
//! [`LibraryApi`] is the seam between the controller and the HTTP layer. The
//! browser build implements it with `gloo-net`; tests implement it in memory.
//! URL construction lives in [`ApiEndpoints`] so it can be shared and tested
//! without a network.

use crate::models::{ClipsPage, LibraryMeta, VideoItem, ViewVariant};
use async_trait::async_trait;
use thiserror::Error;

pub const META_CONTEXT: &str = "Failed to load library metadata";
pub const CLIPS_CONTEXT: &str = "Failed to load clips";
pub const FAVORITES_CONTEXT: &str = "Failed to load favorites";
pub const SET_FAVORITE_CONTEXT: &str = "Failed to update favorite";
pub const VIDEOS_CONTEXT: &str = "Failed to load videos";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("{context} (HTTP {status})")]
    Status { context: &'static str, status: u16 },

    #[error("{context}: network error: {message}")]
    Network {
        context: &'static str,
        message: String,
    },

    #[error("{context}: invalid response: {message}")]
    Decode {
        context: &'static str,
        message: String,
    },
}

impl FetchError {
    /// The generic, endpoint-specific part of the message.
    pub fn context(&self) -> &'static str {
        match self {
            FetchError::Status { context, .. }
            | FetchError::Network { context, .. }
            | FetchError::Decode { context, .. } => context,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Maps an HTTP status to success or a [`FetchError::Status`].
pub fn check_status(context: &'static str, status: u16) -> Result<(), FetchError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(FetchError::Status { context, status })
    }
}

pub fn page_context(variant: ViewVariant) -> &'static str {
    match variant {
        ViewVariant::All => CLIPS_CONTEXT,
        ViewVariant::FavoritesOnly => FAVORITES_CONTEXT,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base_url: String,
}

impl ApiEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn library_meta(&self) -> String {
        format!("{}/api/library/meta", self.base_url)
    }

    pub fn library_clips(&self, limit: usize, offset: usize) -> String {
        format!(
            "{}/api/library/clips?limit={limit}&offset={offset}",
            self.base_url
        )
    }

    pub fn favorite_clips(&self, limit: usize, offset: usize) -> String {
        format!(
            "{}/api/library/favorites?limit={limit}&offset={offset}",
            self.base_url
        )
    }

    pub fn page(&self, variant: ViewVariant, limit: usize, offset: usize) -> String {
        match variant {
            ViewVariant::All => self.library_clips(limit, offset),
            ViewVariant::FavoritesOnly => self.favorite_clips(limit, offset),
        }
    }

    pub fn clip_favorite(&self, clip_id: &str, value: bool) -> String {
        format!(
            "{}/api/clips/{}/favorite?value={value}",
            self.base_url,
            urlencoding::encode(clip_id)
        )
    }

    pub fn videos(&self) -> String {
        format!("{}/api/library/videos", self.base_url)
    }

    /// Playback source for a clip. Used as a `src`, never fetched here.
    pub fn clip_stream_url(&self, clip_id: &str) -> String {
        format!(
            "{}/api/clips/{}/stream",
            self.base_url,
            urlencoding::encode(clip_id)
        )
    }

    pub fn video_stream_url(&self, video_id: &str) -> String {
        format!(
            "{}/api/videos/{}/stream",
            self.base_url,
            urlencoding::encode(video_id)
        )
    }
}

#[async_trait(?Send)]
pub trait LibraryApi {
    async fn fetch_library_meta(&self) -> Result<LibraryMeta, FetchError>;

    async fn fetch_library_clips(&self, limit: usize, offset: usize)
        -> Result<ClipsPage, FetchError>;

    async fn fetch_favorite_clips(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ClipsPage, FetchError>;

    /// Idempotent; the response body is ignored.
    async fn set_clip_favorite(&self, clip_id: &str, value: bool) -> Result<(), FetchError>;

    async fn fetch_videos(&self) -> Result<Vec<VideoItem>, FetchError>;

    async fn fetch_page(
        &self,
        variant: ViewVariant,
        limit: usize,
        offset: usize,
    ) -> Result<ClipsPage, FetchError> {
        match variant {
            ViewVariant::All => self.fetch_library_clips(limit, offset).await,
            ViewVariant::FavoritesOnly => self.fetch_favorite_clips(limit, offset).await,
        }
    }
}
