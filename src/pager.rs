//! Current page tracking for the episode list

use crate::api::PageInfo;

/// The page the session is looking at. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl PageState {
    pub fn new(start: u32) -> Self {
        Self {
            current: start.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 1
    }

    /// Next is only possible once the page count is known
    pub fn can_go_next(&self, info: Option<&PageInfo>) -> bool {
        info.is_some_and(|info| self.current < info.pages)
    }

    /// Step back one page. Returns true if the page changed.
    pub fn go_to_previous_page(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Step forward one page. Returns true if the page changed.
    pub fn go_to_next_page(&mut self, info: Option<&PageInfo>) -> bool {
        if !self.can_go_next(info) {
            return false;
        }
        self.current += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(pages: u32) -> PageInfo {
        PageInfo {
            count: pages * 20,
            pages,
            next: None,
            prev: None,
        }
    }

    #[test]
    fn test_new_clamps_to_first_page() {
        assert_eq!(PageState::new(0).current(), 1);
        assert_eq!(PageState::new(4).current(), 4);
        assert_eq!(PageState::default().current(), 1);
    }

    #[test]
    fn test_previous_never_goes_below_one() {
        for start in 1..=5 {
            let mut state = PageState::new(start);
            for _ in 0..10 {
                state.go_to_previous_page();
                assert!(state.current() >= 1);
            }
            assert_eq!(state.current(), 1);
        }
    }

    #[test]
    fn test_previous_on_first_page_is_noop() {
        let mut state = PageState::new(1);
        assert!(!state.go_to_previous_page());
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_next_never_passes_page_count() {
        for pages in 1..=4 {
            let info = info(pages);
            let mut state = PageState::new(1);
            for _ in 0..10 {
                state.go_to_next_page(Some(&info));
                assert!(state.current() <= pages);
            }
            assert_eq!(state.current(), pages);
        }
    }

    #[test]
    fn test_next_without_info_is_noop() {
        let mut state = PageState::new(2);
        assert!(!state.go_to_next_page(None));
        assert_eq!(state.current(), 2);
        assert!(!state.can_go_next(None));
    }

    #[test]
    fn test_first_of_three_pages() {
        let info = info(3);
        let mut state = PageState::new(1);
        assert!(!state.can_go_previous());
        assert!(state.can_go_next(Some(&info)));

        assert!(state.go_to_next_page(Some(&info)));
        assert_eq!(state.current(), 2);
    }

    #[test]
    fn test_last_of_three_pages() {
        let info = info(3);
        let mut state = PageState::new(3);
        assert!(!state.can_go_next(Some(&info)));

        assert!(!state.go_to_next_page(Some(&info)));
        assert_eq!(state.current(), 3);
    }

    #[test]
    fn test_zero_pages_blocks_next() {
        let info = info(0);
        let mut state = PageState::new(1);
        assert!(!state.go_to_next_page(Some(&info)));
        assert_eq!(state.current(), 1);
    }
}
