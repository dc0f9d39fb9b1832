use crate::catalog::{
    CatalogError, CatalogItem, ContentType, FeedSelection, Genre, PageSource, TmdbClient,
};
use crate::config::Config;
use crate::feed::{FeedLoader, LoadOutcome, LoadRequest, Viewport};
use crate::keybindings::KeybindingRegistry;
use crate::landing::LandingState;
use crate::login::{LoginError, LoginForm};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::{catch_task_panic, validate_url_for_open};
use ratatui::style::Style;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status bar message stays up.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev == url) {
            return attempt.error("Redirect loop detected");
        }
        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Shared HTTP client for catalog requests.
///
/// Per-request timeouts are applied by the catalog client; the overall
/// client timeout here is only a backstop.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(timeout + Duration::from_secs(5))
        .user_agent(concat!("movierec/", env!("CARGO_PKG_VERSION")))
        .build()
}

// ============================================================================
// Screens and Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Public entry with the trending list.
    Landing,
    Login,
    /// Signed-in feed with tabs and genres.
    Home,
}

/// Events from background tasks
pub enum AppEvent {
    /// Trending fetch for the landing screen finished.
    TrendingLoaded {
        result: Result<Vec<CatalogItem>, CatalogError>,
    },
    /// A feed page fetch finished. `request` is the ticket it was started with.
    PageLoaded {
        request: LoadRequest,
        result: Result<Vec<CatalogItem>, CatalogError>,
    },
    /// Simulated sign-in delay elapsed.
    LoginCompleted,
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub screen: Screen,

    pub tmdb: TmdbClient,
    pub landing: LandingState,
    pub landing_selected: usize,

    pub login: LoginForm,
    /// Pending sign-in delay, aborted when the form is abandoned.
    login_task: Option<JoinHandle<()>>,
    login_delay: Duration,

    pub feed: FeedLoader,
    pub home_selected: usize,
    /// First visible row of the home list.
    pub home_offset: usize,
    /// Visible rows of the home list, updated on every render.
    pub home_list_height: usize,
    scroll_margin: usize,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    /// Status message with the time it was set. Cow avoids allocating for literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag; frames are only drawn when set.
    pub needs_redraw: bool,

    /// Loading indicator animation frame, advanced on ticks while loading.
    pub spinner_frame: usize,

    pub show_help: bool,
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(config: &Config, tmdb: TmdbClient, source: Arc<dyn PageSource>) -> Self {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Keybinding override rejected");
        }

        let mut app = Self {
            screen: Screen::Landing,
            tmdb,
            landing: LandingState::new(),
            landing_selected: 0,
            login: LoginForm::new(),
            login_task: None,
            login_delay: config.login_delay(),
            feed: FeedLoader::new(source),
            home_selected: 0,
            home_offset: 0,
            home_list_height: 0,
            scroll_margin: config.scroll_margin,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
        };
        if let Some(first) = warnings.first() {
            app.set_status(first.clone());
        }
        app
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant, returning its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Set status message (expires after [`STATUS_TTL`])
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// True while any screen waits on a background task.
    pub fn is_busy(&self) -> bool {
        match self.screen {
            Screen::Landing => self.landing.is_loading(),
            Screen::Login => self.login.is_submitting(),
            Screen::Home => self.feed.state().is_loading(),
        }
    }

    // ========================================================================
    // Landing
    // ========================================================================

    /// Fetch the trending list. Returns false if a fetch is already running.
    pub fn request_trending(&mut self, tx: &mpsc::Sender<AppEvent>) -> bool {
        if !self.landing.begin_fetch() {
            return false;
        }
        let tmdb = self.tmdb.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = match catch_task_panic(tmdb.trending()).await {
                Ok(result) => result,
                Err(panic_msg) => {
                    tracing::error!(error = %panic_msg, "Trending fetch panicked");
                    Err(CatalogError::Internal(panic_msg))
                }
            };
            if let Err(e) = tx.send(AppEvent::TrendingLoaded { result }).await {
                tracing::warn!(error = %e, event = "TrendingLoaded", "Channel send failed (receiver dropped)");
            }
        });
        true
    }

    pub fn apply_trending(&mut self, result: Result<Vec<CatalogItem>, CatalogError>) {
        self.landing.complete_fetch(result);
        self.landing_selected = 0;
    }

    // ========================================================================
    // Login
    // ========================================================================

    pub fn go_to_login(&mut self) {
        self.screen = Screen::Login;
    }

    /// Validate the form and start the simulated sign-in delay.
    pub fn submit_login(&mut self, tx: &mpsc::Sender<AppEvent>) -> Result<(), LoginError> {
        self.login.submit()?;

        let delay = self.login_delay;
        let tx = tx.clone();
        self.login_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = tx.send(AppEvent::LoginCompleted).await {
                tracing::warn!(error = %e, event = "LoginCompleted", "Channel send failed (receiver dropped)");
            }
        }));
        Ok(())
    }

    /// Leave the login screen, abandoning any pending sign-in.
    pub fn cancel_login(&mut self) {
        if let Some(handle) = self.login_task.take() {
            handle.abort();
        }
        self.login.clear();
        self.screen = Screen::Landing;
    }

    /// Sign-in delay finished: enter the home feed. Ignored if the form was
    /// abandoned in the meantime.
    pub fn complete_login(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.login_task = None;
        if self.screen != Screen::Login || !self.login.complete() {
            tracing::debug!("Ignoring login completion for abandoned form");
            return;
        }
        tracing::info!("Signed in");
        self.screen = Screen::Home;
        self.select_feed(FeedSelection::default(), tx);
    }

    pub fn logout(&mut self) {
        tracing::info!("Signed out");
        self.login.clear();
        self.screen = Screen::Landing;
    }

    // ========================================================================
    // Home feed
    // ========================================================================

    /// Reset the feed to `selection` and load its first page.
    pub fn select_feed(&mut self, selection: FeedSelection, tx: &mpsc::Sender<AppEvent>) {
        self.home_selected = 0;
        self.home_offset = 0;
        self.feed.set_selection(selection, tx);
    }

    pub fn toggle_content_type(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let current = self.feed.state().selection();
        let next = FeedSelection::new(current.content_type.toggle(), current.genre);
        self.select_feed(next, tx);
    }

    /// Switch genre; a no-op when `genre` is already selected.
    pub fn select_genre(&mut self, genre: Genre, tx: &mpsc::Sender<AppEvent>) {
        let current = self.feed.state().selection();
        if current.genre == genre {
            return;
        }
        self.select_feed(FeedSelection::new(current.content_type, genre), tx);
    }

    pub fn content_type(&self) -> ContentType {
        self.feed.state().selection().content_type
    }

    pub fn home_viewport(&self) -> Viewport {
        Viewport {
            offset: self.home_offset,
            height: self.home_list_height,
        }
    }

    /// Move the home selection by `delta` rows, then load more if the
    /// viewport reached the end.
    pub fn move_home_selection(&mut self, delta: isize, tx: &mpsc::Sender<AppEvent>) {
        let len = self.feed.state().items().len();
        if len > 0 {
            let target = self.home_selected.saturating_add_signed(delta);
            self.home_selected = target.min(len - 1);
            self.follow_home_selection();
        }
        self.feed
            .load_more_if_at_bottom(self.home_viewport(), self.scroll_margin, tx);
    }

    /// Keep the selected row inside the visible window.
    pub fn follow_home_selection(&mut self) {
        let height = self.home_list_height.max(1);
        if self.home_selected < self.home_offset {
            self.home_offset = self.home_selected;
        } else if self.home_selected >= self.home_offset + height {
            self.home_offset = self.home_selected + 1 - height;
        }
    }

    pub fn apply_page(
        &mut self,
        request: LoadRequest,
        result: Result<Vec<CatalogItem>, CatalogError>,
    ) -> LoadOutcome {
        let outcome = self.feed.apply(request, result);
        if outcome == LoadOutcome::Failed {
            if let Some(msg) = self.feed.state().last_error() {
                self.set_status(msg.to_string());
            }
        }
        outcome
    }

    // ========================================================================
    // Lists shared by landing and home
    // ========================================================================

    /// Item under the cursor on the current screen.
    pub fn selected_item(&self) -> Option<&CatalogItem> {
        match self.screen {
            Screen::Landing => self.landing.items().get(self.landing_selected),
            Screen::Home => self.feed.state().items().get(self.home_selected),
            Screen::Login => None,
        }
    }

    pub fn move_landing_selection(&mut self, delta: isize) {
        let len = self.landing.items().len();
        if len > 0 {
            let target = self.landing_selected.saturating_add_signed(delta);
            self.landing_selected = target.min(len - 1);
        }
    }

    /// Open the selected item's poster in the system browser.
    pub fn open_selected_poster(&mut self) {
        let Some(url) = self
            .selected_item()
            .and_then(CatalogItem::poster_url)
            .map(str::to_string)
        else {
            self.set_status("No poster available for this title");
            return;
        };
        match validate_url_for_open(&url) {
            Err(e) => self.set_status(e.to_string()),
            Ok(url) => {
                if let Err(e) = open::that(url.as_str()) {
                    self.set_status(format!("Failed to open browser: {}", e));
                }
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.login_task.take() {
            handle.abort();
            tracing::debug!("Aborted login task on App drop");
        }
    }
}
