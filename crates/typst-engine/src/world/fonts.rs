//! Font loading and caching
//!
//! Fonts come from `typst-assets` only, so reports render identically on
//! every host. The cache is built once per process.

use std::sync::OnceLock;

use typst::foundations::Bytes;
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;

static FONT_CACHE: OnceLock<FontCache> = OnceLock::new();

/// Get the global font cache, initializing it if necessary
pub fn global_font_cache() -> &'static FontCache {
    FONT_CACHE.get_or_init(FontCache::new)
}

#[derive(Debug)]
pub struct FontCache {
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
}

impl FontCache {
    pub fn new() -> Self {
        let mut book = FontBook::new();
        let mut fonts = Vec::new();

        for data in typst_assets::fonts() {
            let buffer = Bytes::from_static(data);
            for font in Font::iter(buffer) {
                book.push(font.info().clone());
                fonts.push(font);
            }
        }

        tracing::info!("Font cache initialized with {} fonts", fonts.len());

        Self {
            book: LazyHash::new(book),
            fonts,
        }
    }

    pub fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    pub fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Whether a family is available, ignoring case
    pub fn has_family(&self, family: &str) -> bool {
        self.book
            .families()
            .any(|(name, _)| name.eq_ignore_ascii_case(family))
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new()
    }
}
