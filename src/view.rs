//! What the episode screen should show for the current query outcome

use crate::api::{Episode, EpisodesPage, PageInfo};
use crate::pager::PageState;

/// Outcome of the active request for the current page
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Loading,
    Failed,
    Ready(EpisodesPage),
}

impl QueryState {
    /// Page info, known only once a page has been fetched
    pub fn info(&self) -> Option<&PageInfo> {
        match self {
            QueryState::Ready(page) => Some(&page.info),
            _ => None,
        }
    }
}

/// Enabled state of the Previous/Next buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl Controls {
    pub fn evaluate(pager: &PageState, info: Option<&PageInfo>) -> Self {
        Self {
            previous_enabled: pager.can_go_previous(),
            next_enabled: pager.can_go_next(info),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ResultView<'a> {
    Loading,
    Errored,
    Ready {
        cards: &'a [Episode],
        controls: Controls,
    },
}

impl<'a> ResultView<'a> {
    pub fn derive(pager: &PageState, state: &'a QueryState) -> Self {
        match state {
            QueryState::Loading => ResultView::Loading,
            QueryState::Failed => ResultView::Errored,
            QueryState::Ready(page) => ResultView::Ready {
                cards: &page.results,
                controls: Controls::evaluate(pager, Some(&page.info)),
            },
        }
    }
}
