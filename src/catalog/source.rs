//! Page sources for the home feed.
//!
//! The feed loader only sees [`PageSource`]; which catalog backs it is decided
//! at startup from config.

use super::{CatalogError, CatalogItem, FeedSelection, PAGE_SIZE, PLACEHOLDER_IMAGE};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// A paginated catalog keyed by `(content type, genre, page index)`.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page (zero-based `page`) of items for `selection`.
    async fn fetch_page(
        &self,
        selection: FeedSelection,
        page: u32,
    ) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// Deterministic in-memory catalog with an artificial network delay.
///
/// Items are a pure function of `(selection, page)`, so ids never repeat
/// across pages and the same page always has the same ratings.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    delay: Duration,
}

impl SimulatedSource {
    /// Delay used by the interactive client.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Source that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Build a page without waiting.
    pub fn page(selection: FeedSelection, page: u32) -> Vec<CatalogItem> {
        let type_key = selection.content_type.key();
        let genre = selection.genre.label();
        let type_title = capitalize(type_key);

        (0..PAGE_SIZE)
            .map(|i| {
                let ordinal = page as usize * PAGE_SIZE + i + 1;
                let id = format!("{}-{}-{}-{}", type_key, genre, page, i);
                let rating = simulated_rating(&id);
                CatalogItem {
                    title: format!("{} {} {}", type_title, genre, ordinal),
                    genre: genre.to_string(),
                    rating,
                    image_ref: format!("{}?text={}{}", PLACEHOLDER_IMAGE, type_key, ordinal),
                    id,
                }
            })
            .collect()
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl PageSource for SimulatedSource {
    async fn fetch_page(
        &self,
        selection: FeedSelection,
        page: u32,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::page(selection, page))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Rating in `[3.0, 5.0)` with one decimal, derived from the item id.
fn simulated_rating(id: &str) -> f64 {
    let digest = Sha256::digest(id.as_bytes());
    let tenths = u16::from_be_bytes([digest[0], digest[1]]) % 20;
    3.0 + f64::from(tenths) / 10.0
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
