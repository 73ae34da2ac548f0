use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::api::{EpisodesPage, QueryClient, QueryError};
use crate::pager::PageState;
use crate::theme::Theme;
use crate::view::QueryState;

/// Seconds a status message stays in the info line
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// A finished fetch, tagged with the request that produced it
#[derive(Debug)]
struct FetchResponse {
    generation: u64,
    page: u32,
    result: Result<EpisodesPage, QueryError>,
}

pub struct App {
    pub popup: Popup,
    pub theme: Theme,

    pub pager: PageState,
    pub query: QueryState,

    // First visible card row in the grid
    pub scroll: usize,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    client: Arc<dyn QueryClient>,
    // Pages fetched successfully this session
    memo: HashMap<u32, EpisodesPage>,
    // Bumped for every request; only the latest may update `query`
    generation: u64,
    tx: mpsc::UnboundedSender<FetchResponse>,
    rx: mpsc::UnboundedReceiver<FetchResponse>,
}

impl App {
    /// Create the session and issue the fetch for the starting page
    pub fn new(client: Arc<dyn QueryClient>, start_page: u32, theme: Theme) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            popup: Popup::None,
            theme,

            pager: PageState::new(start_page),
            query: QueryState::Loading,

            scroll: 0,

            status_message: None,
            status_message_time: None,

            client,
            memo: HashMap::new(),
            generation: 0,
            tx,
            rx,
        };

        app.request_current_page();
        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Fetch the current page in the background.
    ///
    /// A memoized copy of the page is shown right away while the fetch runs.
    fn request_current_page(&mut self) {
        let page = self.pager.current();
        self.generation += 1;
        let generation = self.generation;

        self.query = match self.memo.get(&page) {
            Some(cached) => QueryState::Ready(cached.clone()),
            None => QueryState::Loading,
        };

        tracing::debug!("Requesting page {} (generation {})", page, generation);

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_episodes(page).await;
            // Receiver is gone only when the app is shutting down
            let _ = tx.send(FetchResponse {
                generation,
                page,
                result,
            });
        });
    }

    fn apply_response(&mut self, response: FetchResponse) {
        let FetchResponse {
            generation,
            page,
            result,
        } = response;
        let is_current = generation == self.generation;

        match result {
            Ok(episodes) => {
                if is_current {
                    self.query = QueryState::Ready(episodes.clone());
                } else {
                    tracing::debug!("Stale response for page {} (generation {})", page, generation);
                }
                self.memo.insert(page, episodes);
            }
            Err(e) => {
                tracing::warn!("Query for page {} failed: {}", page, e);
                if is_current {
                    self.query = QueryState::Failed;
                }
            }
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup == Popup::Help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => self.previous_page(),
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => self.next_page(),

            // Scroll the card grid (clamped while drawing)
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),

            KeyCode::Char('r') => {
                self.request_current_page();
                self.set_status(format!("Refreshing page {}", self.pager.current()));
            }

            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    pub fn previous_page(&mut self) {
        if self.pager.go_to_previous_page() {
            self.scroll = 0;
            self.request_current_page();
        } else {
            self.set_status("Already on the first page");
        }
    }

    pub fn next_page(&mut self) {
        if self.pager.go_to_next_page(self.query.info()) {
            self.scroll = 0;
            self.request_current_page();
        } else if self.query.info().is_some() {
            self.set_status("Already on the last page");
        }
    }

    pub async fn tick(&mut self) -> Result<()> {
        while let Ok(response) = self.rx.try_recv() {
            self.apply_response(response);
        }

        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Episode, PageInfo};
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use std::sync::Mutex;

    const PAGES: u32 = 3;

    fn episodes_page(page: u32) -> EpisodesPage {
        EpisodesPage {
            info: PageInfo {
                count: 51,
                pages: PAGES,
                next: (page < PAGES).then_some(page + 1),
                prev: (page > 1).then_some(page - 1),
            },
            results: vec![Episode {
                id: page.to_string(),
                name: format!("Episode on page {}", page),
                air_date: String::new(),
                episode: format!("S0{}E01", page),
            }],
        }
    }

    /// Serves pages 1..=PAGES, records every request, fails pages in `failing`
    #[derive(Default)]
    struct FakeClient {
        requests: Mutex<Vec<u32>>,
        failing: Vec<u32>,
    }

    #[async_trait]
    impl QueryClient for FakeClient {
        async fn fetch_episodes(&self, page: u32) -> Result<EpisodesPage, QueryError> {
            self.requests.lock().unwrap().push(page);
            if self.failing.contains(&page) {
                return Err(QueryError::Status(500));
            }
            Ok(episodes_page(page))
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn settle(app: &mut App) {
        let response = app.rx.recv().await.unwrap();
        app.apply_response(response);
    }

    fn requests(client: &FakeClient) -> Vec<u32> {
        client.requests.lock().unwrap().clone()
    }

    fn shown_page(app: &App) -> Option<u32> {
        match &app.query {
            QueryState::Ready(page) => page.results.first().and_then(|e| e.id.parse().ok()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_initial_fetch() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client.clone(), 1, Theme::default());
        assert_eq!(app.query, QueryState::Loading);

        settle(&mut app).await;
        assert_eq!(shown_page(&app), Some(1));
        assert_eq!(requests(&client), vec![1]);
    }

    #[tokio::test]
    async fn test_next_while_loading_is_noop() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client.clone(), 1, Theme::default());

        app.handle_key(key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.pager.current(), 1);

        settle(&mut app).await;
        assert_eq!(requests(&client), vec![1]);
    }

    #[tokio::test]
    async fn test_each_page_change_fetches_once() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client.clone(), 1, Theme::default());
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.pager.current(), 2);
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.pager.current(), 3);
        settle(&mut app).await;

        // Last page: no further fetch
        app.handle_key(key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.pager.current(), 3);

        app.handle_key(key(KeyCode::Left)).await.unwrap();
        assert_eq!(app.pager.current(), 2);
        settle(&mut app).await;

        assert_eq!(requests(&client), vec![1, 2, 3, 2]);
        assert_eq!(shown_page(&app), Some(2));
    }

    #[tokio::test]
    async fn test_previous_on_first_page_does_not_fetch() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client.clone(), 1, Theme::default());
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Left)).await.unwrap();
        assert_eq!(app.pager.current(), 1);
        assert_eq!(requests(&client), vec![1]);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_failure_shows_error_state() {
        let client = Arc::new(FakeClient {
            failing: vec![2],
            ..Default::default()
        });
        let mut app = App::new(client.clone(), 2, Theme::default());
        settle(&mut app).await;

        assert_eq!(app.query, QueryState::Failed);
        // No automatic retry
        assert_eq!(requests(&client), vec![2]);
    }

    #[tokio::test]
    async fn test_previous_works_from_error_state() {
        let client = Arc::new(FakeClient {
            failing: vec![2],
            ..Default::default()
        });
        let mut app = App::new(client.clone(), 2, Theme::default());
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Left)).await.unwrap();
        settle(&mut app).await;
        assert_eq!(shown_page(&app), Some(1));
    }

    #[tokio::test]
    async fn test_manual_refresh_refetches() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client.clone(), 1, Theme::default());
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
        // Memoized page stays visible while refreshing
        assert_eq!(shown_page(&app), Some(1));
        settle(&mut app).await;

        assert_eq!(requests(&client), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_memoized_page_shown_immediately() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client.clone(), 1, Theme::default());
        settle(&mut app).await;

        app.next_page();
        settle(&mut app).await;
        app.previous_page();

        // Page 1 is shown from the memo, its fetch still goes out
        assert_eq!(shown_page(&app), Some(1));
        settle(&mut app).await;
        assert_eq!(requests(&client), vec![1, 2, 1]);
    }

    #[tokio::test]
    async fn test_stale_response_does_not_replace_current() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client, 1, Theme::default());
        settle(&mut app).await;

        app.next_page();
        app.next_page(); // no-op: page 2 info not known yet
        assert_eq!(app.pager.current(), 2);

        app.previous_page();
        assert_eq!(app.pager.current(), 1);

        // Both responses arrive; the page 2 one is stale
        settle(&mut app).await;
        settle(&mut app).await;

        assert_eq!(shown_page(&app), Some(1));
        assert!(app.memo.contains_key(&2));
    }

    #[tokio::test]
    async fn test_stale_failure_is_ignored() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client, 1, Theme::default());
        settle(&mut app).await;

        // A newer request succeeded, then an older one reports failure
        app.generation += 1;
        let current = app.generation;
        app.apply_response(FetchResponse {
            generation: current,
            page: 1,
            result: Ok(episodes_page(1)),
        });
        app.apply_response(FetchResponse {
            generation: current - 1,
            page: 1,
            result: Err(QueryError::Status(503)),
        });

        assert_eq!(shown_page(&app), Some(1));
    }

    #[tokio::test]
    async fn test_help_popup_swallows_keys() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client.clone(), 1, Theme::default());
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Char('?'))).await.unwrap();
        assert_eq!(app.popup, Popup::Help);

        app.handle_key(key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.pager.current(), 1);

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.popup, Popup::None);
    }

    #[tokio::test]
    async fn test_tick_drains_responses() {
        let client = Arc::new(FakeClient::default());
        let mut app = App::new(client, 1, Theme::default());

        for _ in 0..100 {
            app.tick().await.unwrap();
            if shown_page(&app).is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(shown_page(&app), Some(1));
    }
}
