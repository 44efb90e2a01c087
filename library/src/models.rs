use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClipType {
    Concept,
    Technique,
}

impl ClipType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ClipType::Concept => "Concept",
            ClipType::Technique => "Technique",
        }
    }

    pub fn all_variants() -> Vec<Self> {
        vec![ClipType::Concept, ClipType::Technique]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: String,
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "type")]
    pub clip_type: ClipType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub main_tags: Vec<String>,
    #[serde(default)]
    pub video_tags: Vec<String>,
    #[serde(default)]
    pub sub_tags: Vec<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub duration: u32, // seconds
    #[serde(default)]
    pub timestamp_start: String,
    #[serde(default)]
    pub timestamp_end: String,
    #[serde(default)]
    pub source_course: String,
    #[serde(default)]
    pub source_video: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Clip {
    /// Every tag attached to the clip, flat tags first, then the facet sets.
    pub fn all_tags(&self) -> impl Iterator<Item = &String> {
        self.tags
            .iter()
            .chain(self.main_tags.iter())
            .chain(self.video_tags.iter())
            .chain(self.sub_tags.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub clip_count: u32,
    #[serde(default)]
    pub main_tags: Vec<String>,
    #[serde(default)]
    pub sub_tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideosResponse {
    #[serde(default)]
    pub videos: Vec<VideoItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMeta {
    #[serde(default)]
    pub main_tag_options: Vec<String>,
    #[serde(default)]
    pub video_tag_options: Vec<String>,
    #[serde(default)]
    pub sub_tag_options: Vec<String>,
    #[serde(default)]
    pub position_options: Vec<String>,
}

/// One page of `/api/library/clips` or `/api/library/favorites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipsPage {
    pub clips: Vec<Clip>,
    pub limit: usize,
    pub offset: usize,
    pub next_offset: usize,
    pub has_more: bool,
}

/// Persisted snapshot of one view variant. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLibraryState {
    pub clips: Vec<Clip>,
    pub has_more_from_server: bool,
    pub next_offset: usize,
    pub main_tag_options: Vec<String>,
    pub video_tag_options: Vec<String>,
    pub sub_tag_options: Vec<String>,
    pub position_options: Vec<String>,
    /// Milliseconds since the Unix epoch.
    pub cached_at: i64,
}

/// Which paginated listing a controller and its cache entry belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewVariant {
    All,
    FavoritesOnly,
}

impl ViewVariant {
    pub fn from_favorites_only(favorites_only: bool) -> Self {
        if favorites_only {
            ViewVariant::FavoritesOnly
        } else {
            ViewVariant::All
        }
    }

    pub fn is_favorites_only(&self) -> bool {
        matches!(self, ViewVariant::FavoritesOnly)
    }

    pub fn cache_key(&self) -> &'static str {
        match self {
            ViewVariant::All => "clip-library:all",
            ViewVariant::FavoritesOnly => "clip-library:favorites",
        }
    }

    pub fn all_variants() -> [Self; 2] {
        [ViewVariant::All, ViewVariant::FavoritesOnly]
    }
}
