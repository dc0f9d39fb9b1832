//! Catalog data model and page sources.
//!
//! This module owns everything the screens know about movies and shows:
//!
//! - **Model**: [`CatalogItem`], [`ContentType`], [`Genre`], [`FeedSelection`]
//! - **Sources**: the [`PageSource`] seam with a deterministic
//!   [`SimulatedSource`] and the remote [`TmdbDiscoverSource`]
//! - **Remote client**: [`TmdbClient`] for the trending list and discover pages
//!
//! # Architecture
//!
//! - [`source`] - `PageSource` trait and the simulated implementation
//! - [`tmdb`] - HTTP client for The Movie Database API
//! - [`error`] - error taxonomy shared by all remote calls

mod error;
mod source;
mod tmdb;

pub use error::CatalogError;
pub use source::{PageSource, SimulatedSource};
pub use tmdb::{TmdbClient, TmdbDiscoverSource, DEFAULT_IMAGE_BASE_URL, DEFAULT_TMDB_BASE_URL};

use std::fmt;

/// Number of items returned by one page load.
pub const PAGE_SIZE: usize = 20;

/// Image reference used when a title has no poster.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// A movie or show record as displayed in any list.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Unique within a load session.
    pub id: String,
    pub title: String,
    /// Genre label, empty when the source does not provide one.
    pub genre: String,
    pub rating: f64,
    /// Absolute poster URL or [`PLACEHOLDER_IMAGE`]-based relative reference.
    pub image_ref: String,
}

impl CatalogItem {
    /// Poster URL suitable for opening in a browser, if the item has one.
    pub fn poster_url(&self) -> Option<&str> {
        if self.image_ref.starts_with("https://") || self.image_ref.starts_with("http://") {
            Some(&self.image_ref)
        } else {
            None
        }
    }
}

/// Content-type tab on the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[default]
    Movie,
    Show,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::Show];

    /// Lowercase key used in item ids and URLs.
    pub fn key(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }

    /// Tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Show => "TV Shows",
        }
    }

    /// TMDB media segment (`/discover/{segment}`).
    pub fn tmdb_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "tv",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Movie => Self::Show,
            Self::Show => Self::Movie,
        }
    }
}

/// The fixed genre set offered by the home feed, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    #[default]
    Action,
    Comedy,
    Drama,
    SciFi,
    Thriller,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::SciFi,
        Genre::Thriller,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
            Self::SciFi => "Sci-Fi",
            Self::Thriller => "Thriller",
        }
    }

    /// Position in [`Genre::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|g| *g == self).unwrap_or(0)
    }

    /// Genre at `index`, wrapping around the fixed set.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }

    /// TMDB genre id for discover queries.
    ///
    /// TV uses combined genres: "Action & Adventure", "Sci-Fi & Fantasy",
    /// and has no thriller genre, so "Mystery" stands in.
    pub fn tmdb_id(self, content_type: ContentType) -> u32 {
        match (content_type, self) {
            (ContentType::Movie, Self::Action) => 28,
            (ContentType::Movie, Self::Comedy) => 35,
            (ContentType::Movie, Self::Drama) => 18,
            (ContentType::Movie, Self::SciFi) => 878,
            (ContentType::Movie, Self::Thriller) => 53,
            (ContentType::Show, Self::Action) => 10759,
            (ContentType::Show, Self::Comedy) => 35,
            (ContentType::Show, Self::Drama) => 18,
            (ContentType::Show, Self::SciFi) => 10765,
            (ContentType::Show, Self::Thriller) => 9648,
        }
    }

    /// Reverse lookup used to label trending results.
    pub fn from_tmdb_id(id: u32) -> Option<Self> {
        match id {
            28 | 10759 => Some(Self::Action),
            35 => Some(Self::Comedy),
            18 => Some(Self::Drama),
            878 | 10765 => Some(Self::SciFi),
            53 | 9648 => Some(Self::Thriller),
            _ => None,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The `(content type, genre)` pair a feed is loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeedSelection {
    pub content_type: ContentType,
    pub genre: Genre,
}

impl FeedSelection {
    pub fn new(content_type: ContentType, genre: Genre) -> Self {
        Self {
            content_type,
            genre,
        }
    }
}

impl fmt::Display for FeedSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.content_type.key(), self.genre.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_cycles_in_both_directions() {
        assert_eq!(Genre::Action.next(), Genre::Comedy);
        assert_eq!(Genre::Thriller.next(), Genre::Action);
        assert_eq!(Genre::Action.prev(), Genre::Thriller);
        assert_eq!(Genre::SciFi.prev(), Genre::Drama);
    }

    #[test]
    fn genre_labels_match_display_order() {
        let labels: Vec<_> = Genre::ALL.iter().map(|g| g.label()).collect();
        assert_eq!(labels, ["Action", "Comedy", "Drama", "Sci-Fi", "Thriller"]);
    }

    #[test]
    fn tmdb_ids_round_trip_to_genre() {
        for ct in ContentType::ALL {
            for genre in Genre::ALL {
                assert_eq!(Genre::from_tmdb_id(genre.tmdb_id(ct)), Some(genre));
            }
        }
        assert_eq!(Genre::from_tmdb_id(16), None);
    }

    #[test]
    fn poster_url_only_for_absolute_refs() {
        let mut item = CatalogItem {
            id: "1".into(),
            title: "T".into(),
            genre: String::new(),
            rating: 4.0,
            image_ref: PLACEHOLDER_IMAGE.into(),
        };
        assert_eq!(item.poster_url(), None);
        item.image_ref = "https://image.tmdb.org/t/p/w500/a.jpg".into();
        assert_eq!(item.poster_url(), Some("https://image.tmdb.org/t/p/w500/a.jpg"));
    }

    #[test]
    fn content_type_toggles() {
        assert_eq!(ContentType::Movie.toggle(), ContentType::Show);
        assert_eq!(ContentType::Show.toggle(), ContentType::Movie);
        assert_eq!(ContentType::Show.tmdb_segment(), "tv");
    }
}
