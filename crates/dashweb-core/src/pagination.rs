//! Pager window calculation
//!
//! Decides which page buttons a pagination control shows for a given
//! current page, page count and window width. Page 1 and the last page are
//! always reachable; an ellipsis replaces the gap between an endpoint and
//! the window only when at least two pages are hidden there.
//!
//! The window is recomputed from scratch on every call and holds no state.

use serde::{Deserialize, Serialize};

/// One element of a rendered pager, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageToken {
    /// "Previous" control; disabled on the first page
    Previous { enabled: bool },
    /// Shortcut to page 1, shown when the window starts after it
    First,
    /// Hidden pages between an endpoint and the window
    Ellipsis,
    /// A page inside the window
    Page { number: usize, current: bool },
    /// Shortcut to the last page, shown when the window ends before it
    Last { number: usize },
    /// "Next" control; disabled on the last page
    Next { enabled: bool },
}

/// Derived pager layout for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationWindow {
    pub current_page: usize,
    pub total_pages: usize,
    /// First page inside the window
    pub start_page: usize,
    /// Last page inside the window (inclusive)
    pub end_page: usize,
    pub show_first: bool,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    pub show_last: bool,
}

impl PaginationWindow {
    /// Compute the window, or `None` when there is nothing to paginate.
    ///
    /// `current_page` outside `[1, total_pages]` is clamped into range and a
    /// `max_visible` of zero is treated as one.
    pub fn compute(current_page: usize, total_pages: usize, max_visible: usize) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }

        let max_visible = max_visible.max(1);
        let current_page = current_page.clamp(1, total_pages);

        let mut start_page = current_page.saturating_sub(max_visible / 2).max(1);
        let end_page = total_pages.min(start_page + max_visible - 1);

        // Keep the window full width when it runs into the last page
        if end_page - start_page + 1 < max_visible {
            start_page = (end_page + 1).saturating_sub(max_visible).max(1);
        }

        Some(Self {
            current_page,
            total_pages,
            start_page,
            end_page,
            show_first: start_page > 1,
            leading_ellipsis: start_page > 2,
            trailing_ellipsis: end_page + 1 < total_pages,
            show_last: end_page < total_pages,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Pages inside the window
    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        self.start_page..=self.end_page
    }

    /// Render tokens in display order
    pub fn tokens(&self, show_previous_next: bool) -> Vec<PageToken> {
        let mut tokens = Vec::with_capacity(self.end_page - self.start_page + 7);

        if show_previous_next {
            tokens.push(PageToken::Previous {
                enabled: self.has_previous(),
            });
        }
        if self.show_first {
            tokens.push(PageToken::First);
        }
        if self.leading_ellipsis {
            tokens.push(PageToken::Ellipsis);
        }
        for number in self.pages() {
            tokens.push(PageToken::Page {
                number,
                current: number == self.current_page,
            });
        }
        if self.trailing_ellipsis {
            tokens.push(PageToken::Ellipsis);
        }
        if self.show_last {
            tokens.push(PageToken::Last {
                number: self.total_pages,
            });
        }
        if show_previous_next {
            tokens.push(PageToken::Next {
                enabled: self.has_next(),
            });
        }

        tokens
    }
}

impl std::fmt::Display for PaginationWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .tokens(false)
            .iter()
            .map(|token| match token {
                PageToken::First => "1".to_string(),
                PageToken::Ellipsis => "…".to_string(),
                PageToken::Page { number, current: true } => format!("[{}]", number),
                PageToken::Page { number, .. } => number.to_string(),
                PageToken::Last { number } => number.to_string(),
                PageToken::Previous { .. } | PageToken::Next { .. } => String::new(),
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Render tokens for a pager; empty when `total_pages <= 1`
pub fn page_tokens(
    current_page: usize,
    total_pages: usize,
    max_visible: usize,
    show_previous_next: bool,
) -> Vec<PageToken> {
    PaginationWindow::compute(current_page, total_pages, max_visible)
        .map(|window| window.tokens(show_previous_next))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(current: usize, total: usize, max: usize) -> PaginationWindow {
        PaginationWindow::compute(current, total, max).unwrap()
    }

    fn page_numbers(tokens: &[PageToken]) -> Vec<usize> {
        tokens
            .iter()
            .filter_map(|t| match t {
                PageToken::Page { number, .. } => Some(*number),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_or_no_page_renders_nothing() {
        assert!(PaginationWindow::compute(1, 0, 5).is_none());
        assert!(PaginationWindow::compute(1, 1, 5).is_none());
        assert!(page_tokens(1, 1, 5, true).is_empty());
        assert!(page_tokens(3, 0, 5, false).is_empty());
    }

    #[test]
    fn test_first_page_of_ten() {
        let w = window(1, 10, 5);
        assert_eq!(w.pages(), 1..=5);
        assert!(!w.show_first);
        assert!(!w.leading_ellipsis);
        assert!(w.trailing_ellipsis);
        assert!(w.show_last);

        assert_eq!(
            w.tokens(false),
            vec![
                PageToken::Page { number: 1, current: true },
                PageToken::Page { number: 2, current: false },
                PageToken::Page { number: 3, current: false },
                PageToken::Page { number: 4, current: false },
                PageToken::Page { number: 5, current: false },
                PageToken::Ellipsis,
                PageToken::Last { number: 10 },
            ]
        );
    }

    #[test]
    fn test_last_page_of_ten() {
        let w = window(10, 10, 5);
        assert_eq!(w.pages(), 6..=10);
        assert!(w.show_first);
        assert!(w.leading_ellipsis);
        assert!(!w.trailing_ellipsis);
        assert!(!w.show_last);

        let tokens = w.tokens(false);
        assert_eq!(tokens[0], PageToken::First);
        assert_eq!(tokens[1], PageToken::Ellipsis);
        assert_eq!(page_numbers(&tokens), vec![6, 7, 8, 9, 10]);
        assert_eq!(tokens.last(), Some(&PageToken::Page { number: 10, current: true }));
    }

    #[test]
    fn test_middle_page_has_both_ellipses() {
        let w = window(6, 20, 5);
        assert_eq!(w.pages(), 4..=8);
        assert_eq!(w.to_string(), "1 … 4 5 [6] 7 8 … 20");
    }

    #[test]
    fn test_single_hidden_page_is_not_an_ellipsis() {
        // Window 2..=6 only hides page 1, which is shown explicitly
        let w = window(4, 10, 5);
        assert_eq!(w.pages(), 2..=6);
        assert!(w.show_first);
        assert!(!w.leading_ellipsis);

        // Window 4..=8 of 9 only hides page 9
        let w = window(6, 9, 5);
        assert_eq!(w.pages(), 4..=8);
        assert!(w.show_last);
        assert!(!w.trailing_ellipsis);
    }

    #[test]
    fn test_wide_window_shows_full_range() {
        let w = window(2, 4, 5);
        assert_eq!(w.pages(), 1..=4);
        assert!(!w.show_first && !w.show_last);
        assert!(!w.leading_ellipsis && !w.trailing_ellipsis);

        let w = window(3, 5, 5);
        assert_eq!(w.pages(), 1..=5);
        assert!(!w.leading_ellipsis && !w.trailing_ellipsis);
    }

    #[test]
    fn test_full_width_whenever_pages_exceed_window() {
        for max_visible in 1..=8 {
            for total in (max_visible + 1)..=25 {
                for current in 1..=total {
                    let w = window(current, total, max_visible);
                    let width = w.end_page - w.start_page + 1;
                    assert_eq!(width, max_visible, "c={current} t={total} m={max_visible}");
                    assert!(w.pages().contains(&current));
                    assert_eq!(w.leading_ellipsis, w.start_page > 2);
                    assert_eq!(w.trailing_ellipsis, w.end_page + 1 < total);
                }
            }
        }
    }

    #[test]
    fn test_even_window_width() {
        let w = window(5, 10, 4);
        assert_eq!(w.pages(), 3..=6);
        let w = window(10, 10, 4);
        assert_eq!(w.pages(), 7..=10);
    }

    #[test]
    fn test_previous_next_controls() {
        let tokens = page_tokens(1, 3, 5, true);
        assert_eq!(tokens.first(), Some(&PageToken::Previous { enabled: false }));
        assert_eq!(tokens.last(), Some(&PageToken::Next { enabled: true }));

        let tokens = page_tokens(3, 3, 5, true);
        assert_eq!(tokens.first(), Some(&PageToken::Previous { enabled: true }));
        assert_eq!(tokens.last(), Some(&PageToken::Next { enabled: false }));
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let w = window(42, 10, 5);
        assert_eq!(w.current_page, 10);
        assert_eq!(w.pages(), 6..=10);

        let w = window(0, 10, 0);
        assert_eq!(w.current_page, 1);
        assert_eq!(w.pages(), 1..=1);
        assert!(w.trailing_ellipsis);
    }
}
