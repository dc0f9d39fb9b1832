//! MovieRec: a terminal client for discovering movies and TV shows.
//!
//! - [`landing`] - trending list shown before sign-in
//! - [`login`] - simulated sign-in form
//! - [`feed`] - infinite-scroll home feed with stale-result protection
//! - [`catalog`] - item model, page sources and the TMDB client
//! - [`app`] / [`ui`] - application state and the ratatui front end

pub mod app;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod landing;
pub mod login;
pub mod theme;
pub mod ui;
pub mod util;
