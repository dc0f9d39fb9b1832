//! Infinite-scroll feed for the home screen.
//!
//! - [`state`] - pure accumulation logic: pages, loading flag, epoch
//! - [`loader`] - spawns page fetches and feeds completions back into the state
//!
//! All mutation happens on the UI task. A fetch runs on its own task and
//! reports through `AppEvent::PageLoaded`; only one is in flight at a time.

mod loader;
mod state;

pub use loader::FeedLoader;
pub use state::{FeedState, LoadOutcome, LoadRequest, Viewport};
