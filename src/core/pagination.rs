use crate::core::document::{AttrMatch, Node};
use crate::core::normalize::clean;
use scraper::Html;
use std::ops::RangeInclusive;

/// Catalog pages after the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSequence {
    last_page: u32,
}

impl PageSequence {
    /// `displayed_last` is the number in the pagination control; the site
    /// shows one page less than it serves.
    pub fn from_displayed_last(displayed_last: u32) -> Option<Self> {
        displayed_last.checked_add(1).map(|last_page| Self { last_page })
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    /// A fresh iterator starting at page 2 on every call.
    pub fn pages(&self) -> RangeInclusive<u32> {
        2..=self.last_page
    }
}

/// Reads the "right" link of the pagination control.
pub fn parse_page_numbers(body: &str) -> Option<PageSequence> {
    let page = Html::parse_document(body);
    let control = page
        .root_element()
        .find("div", AttrMatch::Class("pagination x"))?;
    let next = control.find("a", AttrMatch::Attr("data-page", "right"))?;
    let digits: String = clean(next.attr("href")?)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    PageSequence::from_displayed_last(digits.parse().ok()?)
}

/// Governs catalog pagination for one crawl.
#[derive(Debug, Default)]
pub enum PageCursor {
    /// No page count discovered yet.
    #[default]
    Unknown,
    Active(RangeInclusive<u32>),
}

impl PageCursor {
    /// Installs the sequence unless a cursor already exists.
    /// Returns whether this call created it.
    pub fn discover(&mut self, sequence: Option<PageSequence>) -> bool {
        if self.is_known() {
            return false;
        }
        match sequence {
            Some(sequence) => {
                *self = PageCursor::Active(sequence.pages());
                true
            }
            None => false,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, PageCursor::Active(_))
    }

    pub fn is_exhausted(&self) -> bool {
        match self {
            PageCursor::Unknown => false,
            PageCursor::Active(pages) => pages.is_empty(),
        }
    }

    pub fn next_page(&mut self) -> Option<u32> {
        match self {
            PageCursor::Unknown => None,
            PageCursor::Active(pages) => pages.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(href: &str) -> String {
        format!(
            r#"<html><body><div class="pagination x">
                <a data-page="left" href="?p=1">‹</a>
                <a data-page="right" href="{href}">›</a>
            </div></body></html>"#
        )
    }

    #[test]
    fn test_page_sequence_adds_one_to_displayed_last() {
        let sequence = parse_page_numbers(&control("catalog?p5")).unwrap();
        assert_eq!(sequence.last_page(), 6);

        let mut pages = sequence.pages();
        assert_eq!(pages.by_ref().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
        assert_eq!(pages.next(), None);

        // restartable
        assert_eq!(sequence.pages().next(), Some(2));
    }

    #[test]
    fn test_missing_pagination_parts() {
        assert_eq!(parse_page_numbers("<html><body></body></html>"), None);
        assert_eq!(parse_page_numbers(&control("#last")), None);
        assert_eq!(parse_page_numbers(&control("?p=99999999999")), None);

        let without_right = r#"<div class="pagination x"><a data-page="left" href="?p=1"></a></div>"#;
        assert_eq!(parse_page_numbers(without_right), None);

        let other_class = r#"<div class="pagination"><a data-page="right" href="?p=3"></a></div>"#;
        assert_eq!(parse_page_numbers(other_class), None);
    }

    #[test]
    fn test_cursor_states() {
        let mut cursor = PageCursor::default();
        assert!(!cursor.is_known());
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.next_page(), None);

        assert!(!cursor.discover(None));
        assert!(cursor.discover(PageSequence::from_displayed_last(2)));
        assert!(!cursor.discover(PageSequence::from_displayed_last(9)));

        assert_eq!(cursor.next_page(), Some(2));
        assert_eq!(cursor.next_page(), Some(3));
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next_page(), None);
        assert!(cursor.is_known());
    }
}
