//! Client-side filtering and sorting over the accumulated clips.
//!
//! A clip passes when every active facet accepts it. Within a facet any one
//! selected value is enough; a facet with nothing selected accepts all clips.

use crate::models::{Clip, ClipType};
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Default,
    DurationAsc,
    DurationDesc,
}

impl SortMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            SortMode::Default => "Default",
            SortMode::DurationAsc => "Shortest first",
            SortMode::DurationDesc => "Longest first",
        }
    }

    pub fn all_variants() -> Vec<Self> {
        vec![
            SortMode::Default,
            SortMode::DurationAsc,
            SortMode::DurationDesc,
        ]
    }

    // Keys used in <option value="..."> so we can map back and forth.
    pub fn key(&self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::DurationAsc => "duration_asc",
            SortMode::DurationDesc => "duration_desc",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "default" => Some(SortMode::Default),
            "duration_asc" => Some(SortMode::DurationAsc),
            "duration_desc" => Some(SortMode::DurationDesc),
            _ => None,
        }
    }
}

/// A filter dimension backed by a set of tag-like strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFacet {
    Main,
    Video,
    Sub,
    Position,
}

impl TagFacet {
    pub fn display_name(&self) -> &'static str {
        match self {
            TagFacet::Main => "Main tags",
            TagFacet::Video => "Video tags",
            TagFacet::Sub => "Sub tags",
            TagFacet::Position => "Position",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipFilter {
    pub search: String,
    pub types: BTreeSet<ClipType>,
    pub main_tags: BTreeSet<String>,
    pub video_tags: BTreeSet<String>,
    pub sub_tags: BTreeSet<String>,
    pub positions: BTreeSet<String>,
}

impl ClipFilter {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.types.is_empty()
            && self.main_tags.is_empty()
            && self.video_tags.is_empty()
            && self.sub_tags.is_empty()
            && self.positions.is_empty()
    }

    pub fn selected(&self, facet: TagFacet) -> &BTreeSet<String> {
        match facet {
            TagFacet::Main => &self.main_tags,
            TagFacet::Video => &self.video_tags,
            TagFacet::Sub => &self.sub_tags,
            TagFacet::Position => &self.positions,
        }
    }

    fn selected_mut(&mut self, facet: TagFacet) -> &mut BTreeSet<String> {
        match facet {
            TagFacet::Main => &mut self.main_tags,
            TagFacet::Video => &mut self.video_tags,
            TagFacet::Sub => &mut self.sub_tags,
            TagFacet::Position => &mut self.positions,
        }
    }

    pub fn toggle_tag(&mut self, facet: TagFacet, value: &str) {
        let selected = self.selected_mut(facet);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn toggle_type(&mut self, clip_type: ClipType) {
        if !self.types.remove(&clip_type) {
            self.types.insert(clip_type);
        }
    }

    pub fn matches(&self, clip: &Clip) -> bool {
        self.matches_search(clip)
            && (self.types.is_empty() || self.types.contains(&clip.clip_type))
            && any_selected(&self.main_tags, &clip.main_tags)
            && any_selected(&self.video_tags, &clip.video_tags)
            && any_selected(&self.sub_tags, &clip.sub_tags)
            && (self.positions.is_empty()
                || clip
                    .position
                    .as_ref()
                    .is_some_and(|p| self.positions.contains(p)))
    }

    fn matches_search(&self, clip: &Clip) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        clip.title.to_lowercase().contains(&needle)
            || clip.summary.to_lowercase().contains(&needle)
            || clip.all_tags().any(|tag| tag.to_lowercase().contains(&needle))
    }
}

fn any_selected(selected: &BTreeSet<String>, values: &[String]) -> bool {
    selected.is_empty() || values.iter().any(|v| selected.contains(v))
}

fn compare_duration(a: &Clip, b: &Clip, sort: SortMode) -> Ordering {
    match sort {
        SortMode::Default => Ordering::Equal,
        SortMode::DurationAsc => a.duration.cmp(&b.duration),
        SortMode::DurationDesc => b.duration.cmp(&a.duration),
    }
}

/// Clips that pass `filter`, ordered by `sort`. Ties keep insertion order.
pub fn filter_and_sort<'a>(clips: &'a [Clip], filter: &ClipFilter, sort: SortMode) -> Vec<&'a Clip> {
    let mut visible: Vec<&Clip> = clips.iter().filter(|clip| filter.matches(clip)).collect();
    if sort != SortMode::Default {
        visible.sort_by(|a, b| compare_duration(a, b, sort));
    }
    visible
}
