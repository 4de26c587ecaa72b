use serde::{Deserialize, Serialize};

/// One page of an offset-paginated listing.
///
/// `next_cursor` is present exactly when `has_more` is true, and always
/// equals the requested offset plus the requested limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub has_more: bool,
    pub next_cursor: Option<usize>,
}

impl<T: Clone> Page<T> {
    /// Cut the page `[offset, offset + limit)` out of `items`.
    pub fn slice(items: &[T], offset: usize, limit: usize) -> Self {
        let end = offset.saturating_add(limit);
        let start = offset.min(items.len());
        let data = items[start..end.min(items.len())].to_vec();
        let has_more = end < items.len();

        Self {
            data,
            has_more,
            next_cursor: has_more.then_some(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit_has_no_cursor() {
        let items: Vec<u32> = (0..9).collect();
        let page = Page::slice(&items, 0, 9);
        assert_eq!(page.data.len(), 9);
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_short_final_page() {
        let items: Vec<u32> = (0..10).collect();
        let first = Page::slice(&items, 0, 9);
        assert!(first.has_more);
        assert_eq!(first.next_cursor, Some(9));

        let second = Page::slice(&items, 9, 9);
        assert_eq!(second.data, vec![9]);
        assert!(!second.has_more);
        assert_eq!(second.next_cursor, None);
    }

    #[test]
    fn test_cursor_tracks_requested_not_returned() {
        let items: Vec<u32> = (0..30).collect();
        let mut cursor = 0;
        while let Some(next) = Page::slice(&items, cursor, 7).next_cursor {
            assert_eq!(next, cursor + 7);
            cursor = next;
        }
    }

    #[test]
    fn test_concatenation_reproduces_store() {
        for n in [0usize, 1, 8, 9, 10, 17, 18, 19, 100] {
            let items: Vec<usize> = (0..n).collect();
            let mut collected = Vec::new();
            let mut cursor = 0;
            loop {
                let page = Page::slice(&items, cursor, 9);
                assert!(page.data.len() <= 9);
                assert_eq!(page.has_more, page.next_cursor.is_some());
                collected.extend(page.data);
                match page.next_cursor {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
            assert_eq!(collected, items, "store of {n}");
        }
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let items: Vec<u32> = (0..3).collect();
        let page = Page::slice(&items, 10, 5);
        assert!(page.data.is_empty());
        assert!(!page.has_more);
    }
}
