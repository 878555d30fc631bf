//! Cursor pagination (`edges / pageInfo`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }
}

/// `first` / `after` arguments of a list query
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageArgs {
    pub first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Accumulates pages of one list view
#[derive(Debug)]
pub struct Pager<T> {
    page_size: u32,
    items: Vec<T>,
    end_cursor: Option<String>,
    has_next_page: bool,
    loaded_once: bool,
    /// Items are kept but no longer trusted
    stale: bool,
}

impl<T> Pager<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            items: Vec::new(),
            end_cursor: None,
            has_next_page: false,
            loaded_once: false,
            stale: false,
        }
    }

    /// Arguments for the first page
    pub fn first_page(&self) -> PageArgs {
        PageArgs {
            first: self.page_size,
            after: None,
        }
    }

    /// Arguments for the page after what's loaded, if there is one
    pub fn next_page(&self) -> Option<PageArgs> {
        if !self.has_next_page {
            return None;
        }
        Some(PageArgs {
            first: self.page_size,
            after: self.end_cursor.clone(),
        })
    }

    /// Replace everything with a freshly fetched first page
    pub fn reset(&mut self, page: Connection<T>) {
        self.items.clear();
        self.stale = false;
        self.append(page);
    }

    pub fn append(&mut self, page: Connection<T>) {
        self.has_next_page = page.page_info.has_next_page;
        self.end_cursor = page.page_info.end_cursor;
        self.items.extend(page.edges.into_iter().map(|e| e.node));
        self.loaded_once = true;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Loaded and not marked stale since
    pub fn is_loaded(&self) -> bool {
        self.loaded_once && !self.stale
    }

    /// Ask for a refetch after the backing cache entry was evicted; rows
    /// stay visible until `reset` replaces them
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(ids: &[u32], next: Option<&str>) -> Connection<u32> {
        serde_json::from_value(json!({
            "edges": ids.iter().map(|i| json!({ "cursor": format!("c{}", i), "node": i })).collect::<Vec<_>>(),
            "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next }
        }))
        .unwrap()
    }

    #[test]
    fn pager_appends_and_tracks_cursor() {
        let mut pager = Pager::new(2);
        assert_eq!(pager.first_page(), PageArgs { first: 2, after: None });
        assert!(pager.next_page().is_none());

        pager.reset(page(&[1, 2], Some("c2")));
        assert_eq!(
            pager.next_page(),
            Some(PageArgs {
                first: 2,
                after: Some("c2".to_string())
            })
        );

        pager.append(page(&[3], None));
        assert_eq!(pager.items(), &[1, 2, 3]);
        assert!(pager.next_page().is_none());
    }

    #[test]
    fn reset_drops_previous_items() {
        let mut pager = Pager::new(10);
        pager.reset(page(&[1, 2], None));
        pager.reset(page(&[9], None));
        assert_eq!(pager.items(), &[9]);
    }

    #[test]
    fn stale_pages_keep_rows_until_replaced() {
        let mut pager = Pager::new(10);
        pager.reset(page(&[1, 2, 3], Some("c3")));
        pager.mark_stale();
        assert!(!pager.is_loaded());
        assert_eq!(pager.items(), &[1, 2, 3]);

        pager.reset(page(&[4], None));
        assert!(pager.is_loaded());
        assert_eq!(pager.items(), &[4]);
    }

    #[test]
    fn page_args_omit_missing_cursor() {
        let args = PageArgs { first: 5, after: None };
        assert_eq!(serde_json::to_value(&args).unwrap(), json!({ "first": 5 }));
    }
}
