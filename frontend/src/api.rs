use clip_library::api::{
    check_status, ApiEndpoints, FetchError, LibraryApi, CLIPS_CONTEXT, FAVORITES_CONTEXT,
    META_CONTEXT, SET_FAVORITE_CONTEXT, VIDEOS_CONTEXT,
};
use clip_library::models::{ClipsPage, LibraryMeta, VideoItem, VideosResponse};
use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

/// [`LibraryApi`] over the browser's fetch.
#[derive(Debug, Clone)]
pub struct GlooLibraryApi {
    endpoints: ApiEndpoints,
}

impl GlooLibraryApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoints: ApiEndpoints::new(base_url),
        }
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }
}

fn network_error(context: &'static str, e: gloo_net::Error) -> FetchError {
    let error = FetchError::Network {
        context,
        message: e.to_string(),
    };
    log::error!("{error}");
    error
}

async fn ensure_ok(context: &'static str, response: Response) -> Result<Response, FetchError> {
    if let Err(error) = check_status(context, response.status()) {
        let text = response.text().await.unwrap_or_default();
        log::warn!("{error}: {text}");
        return Err(error);
    }
    Ok(response)
}

async fn get_json<T: DeserializeOwned>(url: &str, context: &'static str) -> Result<T, FetchError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| network_error(context, e))?;
    let response = ensure_ok(context, response).await?;

    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode {
            context,
            message: e.to_string(),
        })
}

#[async_trait(?Send)]
impl LibraryApi for GlooLibraryApi {
    async fn fetch_library_meta(&self) -> Result<LibraryMeta, FetchError> {
        get_json(&self.endpoints.library_meta(), META_CONTEXT).await
    }

    async fn fetch_library_clips(&self, limit: usize, offset: usize) -> Result<ClipsPage, FetchError> {
        get_json(&self.endpoints.library_clips(limit, offset), CLIPS_CONTEXT).await
    }

    async fn fetch_favorite_clips(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ClipsPage, FetchError> {
        get_json(&self.endpoints.favorite_clips(limit, offset), FAVORITES_CONTEXT).await
    }

    async fn set_clip_favorite(&self, clip_id: &str, value: bool) -> Result<(), FetchError> {
        let url = self.endpoints.clip_favorite(clip_id, value);
        let response = Request::post(&url)
            .send()
            .await
            .map_err(|e| network_error(SET_FAVORITE_CONTEXT, e))?;
        ensure_ok(SET_FAVORITE_CONTEXT, response).await?;
        Ok(())
    }

    async fn fetch_videos(&self) -> Result<Vec<VideoItem>, FetchError> {
        let response: VideosResponse = get_json(&self.endpoints.videos(), VIDEOS_CONTEXT).await?;
        Ok(response.videos)
    }
}
