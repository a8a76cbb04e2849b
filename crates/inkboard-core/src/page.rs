//! Pages and the page-content cache.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::stroke::Stroke;

/// Default page background color.
pub const DEFAULT_BACKGROUND: &str = "#3b82f6";

/// Ruling pattern rendered behind the strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageStyle {
    #[default]
    Plain,
    Ruled,
    WideRuled,
    Graph,
    Dotted,
    Music,
}

/// One page of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    /// Position within the board's page list.
    pub order: i64,
}

/// Everything a page persists: its strokes plus page-level appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub page_style: PageStyle,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

impl Default for PageContent {
    fn default() -> Self {
        Self {
            strokes: Vec::new(),
            background_color: default_background(),
            page_style: PageStyle::default(),
        }
    }
}

/// In-memory cache of page contents keyed by page id.
///
/// The editor consults it on page switches for an optimistic first paint
/// and reconciles with store data when the background fetch lands.
#[derive(Debug, Default)]
pub struct PageCache {
    contents: HashMap<String, PageContent>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, page_id: &str) -> Option<&PageContent> {
        self.contents.get(page_id)
    }

    pub fn insert(&mut self, page_id: &str, content: PageContent) {
        self.contents.insert(page_id.to_string(), content);
    }

    pub fn remove(&mut self, page_id: &str) -> Option<PageContent> {
        self.contents.remove(page_id)
    }

    pub fn contains(&self, page_id: &str) -> bool {
        self.contents.contains_key(page_id)
    }

    pub fn clear(&mut self) {
        self.contents.clear();
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
