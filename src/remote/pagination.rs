//! Pagination Cursor Walker

use crate::error::{Error, Result};
use std::future::Future;

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor to request the next page with
    pub next_cursor: Option<String>,
    /// No page follows this one
    pub last: bool,
}

impl<T> Page<T> {
    /// Page whose continuation is given by an API page token
    ///
    /// An absent or empty token marks the last page.
    pub fn from_token(items: Vec<T>, token: Option<String>) -> Self {
        let next_cursor = token.filter(|t| !t.is_empty());
        Self {
            last: next_cursor.is_none(),
            items,
            next_cursor,
        }
    }

    /// Final page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            last: true,
        }
    }
}

/// Drive a paged listing to exhaustion
///
/// `fetch` is called with `None` for the first page, then with the cursor
/// handed back by the previous page. Any failed fetch aborts the walk and
/// everything gathered so far is dropped.
pub async fn walk_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all_items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(cursor.take()).await?;
        pages += 1;
        all_items.extend(page.items);

        if page.last {
            break;
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(Error::Pagination(format!(
                    "page {} is not the last one but carries no cursor",
                    pages
                )))
            },
        }
    }

    tracing::debug!("Walked {} page(s), {} item(s)", pages, all_items.len());
    Ok(all_items)
}
