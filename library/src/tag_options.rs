use crate::models::{CachedLibraryState, Clip, LibraryMeta};
use std::collections::BTreeSet;

/// Sorted set of filter values that only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    values: BTreeSet<String>,
}

impl TagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.values.contains(value) {
            return false;
        }
        self.values.insert(value.to_string())
    }

    pub fn extend<'a>(&mut self, values: impl IntoIterator<Item = &'a String>) {
        for value in values {
            self.insert(value);
        }
    }

    /// Set union with `other`.
    pub fn merge(&mut self, other: &TagOptions) {
        self.values.extend(other.values.iter().cloned());
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.values.iter()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.values.iter().cloned().collect()
    }
}

impl<'a> FromIterator<&'a String> for TagOptions {
    fn from_iter<I: IntoIterator<Item = &'a String>>(iter: I) -> Self {
        let mut options = TagOptions::new();
        options.extend(iter);
        options
    }
}

/// The option sets behind every tag facet in the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    pub main_tags: TagOptions,
    pub video_tags: TagOptions,
    pub sub_tags: TagOptions,
    pub positions: TagOptions,
}

impl FacetOptions {
    pub fn from_meta(meta: &LibraryMeta) -> Self {
        let mut options = Self::default();
        options.merge_meta(meta);
        options
    }

    pub fn from_snapshot(snapshot: &CachedLibraryState) -> Self {
        Self {
            main_tags: snapshot.main_tag_options.iter().collect(),
            video_tags: snapshot.video_tag_options.iter().collect(),
            sub_tags: snapshot.sub_tag_options.iter().collect(),
            positions: snapshot.position_options.iter().collect(),
        }
    }

    pub fn merge_meta(&mut self, meta: &LibraryMeta) {
        self.main_tags.extend(&meta.main_tag_options);
        self.video_tags.extend(&meta.video_tag_options);
        self.sub_tags.extend(&meta.sub_tag_options);
        self.positions.extend(&meta.position_options);
    }

    pub fn extend_from_clip(&mut self, clip: &Clip) {
        self.main_tags.extend(&clip.main_tags);
        self.video_tags.extend(&clip.video_tags);
        self.sub_tags.extend(&clip.sub_tags);
        if let Some(position) = &clip.position {
            self.positions.insert(position);
        }
    }

    pub fn extend_from_clips<'a>(&mut self, clips: impl IntoIterator<Item = &'a Clip>) {
        for clip in clips {
            self.extend_from_clip(clip);
        }
    }

    pub fn merge(&mut self, other: &FacetOptions) {
        self.main_tags.merge(&other.main_tags);
        self.video_tags.merge(&other.video_tags);
        self.sub_tags.merge(&other.sub_tags);
        self.positions.merge(&other.positions);
    }
}
