//! Cursor-based pagination accumulation.
//!
//! [`accumulate`] drives a page-fetch closure over a Relay-style connection
//! (`edges` + `pageInfo{hasNextPage, endCursor}` + `totalCount`) until the
//! upstream runs out of pages or the caller's item limit is reached.
//!
//! Edges are kept in the order they arrive. Edges with a null node are
//! dropped and never count toward the limit. A page that would overshoot the
//! limit is cut short rather than discarded, and the cursor to resume from
//! is reported according to a [`CursorPolicy`].

use std::future::Future;

use serde::Deserialize;

/// An edge of a paginated connection.
pub trait PagedEdge {
    /// The edge's own cursor, if the query selected it.
    fn cursor(&self) -> Option<&str>;

    /// Whether the edge carries a non-null node.
    fn has_node(&self) -> bool;
}

/// Relay `pageInfo`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether the upstream reports another page.
    #[serde(default)]
    pub has_next_page: bool,
    /// Cursor of the last edge of this page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of a connection as returned by the upstream.
///
/// Every member is optional; a missing `edges` list is an empty page and a
/// missing `pageInfo` means there are no further pages.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<E> {
    /// The page's edges.
    #[serde(default)]
    pub edges: Option<Vec<E>>,
    /// Pagination info.
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    /// Total number of items across all pages, if reported.
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<E> Default for Page<E> {
    fn default() -> Self {
        Self {
            edges: None,
            page_info: None,
            total_count: None,
        }
    }
}

/// Upper bound on the number of items to accumulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLimit {
    /// Fetch until the upstream is exhausted.
    Unbounded,
    /// Stop once this many items have been kept.
    AtMost(usize),
}

/// Which cursor is reported as the resume point after a truncation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorPolicy {
    /// The cursor of the last retained edge. Resuming from it yields exactly
    /// the items that were cut off.
    ///
    /// If the upstream sent that edge without a cursor, the result is
    /// truncated with no resume cursor and a warning is logged.
    LastRetainedEdge,
    /// The page's `endCursor`. Items cut from the final page are skipped on
    /// resume.
    EndCursor,
}

/// The outcome of an accumulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulation<E> {
    /// `totalCount` as reported by the last page that reported one.
    pub total_count: Option<u64>,
    /// Retained edges in arrival order.
    pub items: Vec<E>,
    /// `true` iff accumulation stopped because of the item limit while the
    /// upstream still had more items.
    pub truncated: bool,
    /// Where to resume from when `truncated` is set.
    pub next_cursor: Option<String>,
    /// Number of page fetches performed.
    pub pages_fetched: usize,
}

impl<E> Accumulation<E> {
    const fn empty() -> Self {
        Self {
            total_count: None,
            items: Vec::new(),
            truncated: false,
            next_cursor: None,
            pages_fetched: 0,
        }
    }
}

/// Accumulates edges across pages.
///
/// `fetch_page` is called with the cursor to continue after (`None` for the
/// first page unless `start` is given). Fetches are strictly sequential.
///
/// Termination is guaranteed even against a misbehaving upstream: a page
/// with `hasNextPage` but no edges, a missing `endCursor`, or an `endCursor`
/// equal to the one just requested all end the loop as if the upstream were
/// exhausted.
///
/// A limit of zero returns immediately without fetching, marked as
/// truncated with `start` as the resume cursor.
///
/// # Errors
///
/// The first error returned by `fetch_page` is propagated; nothing
/// accumulated so far is returned.
///
/// # Example
///
/// ```rust
/// use gql_gateway::aggregate::{accumulate, CursorPolicy, Page, PageInfo, PageLimit, PagedEdge};
///
/// struct Edge(Option<u32>);
///
/// impl PagedEdge for Edge {
///     fn cursor(&self) -> Option<&str> { None }
///     fn has_node(&self) -> bool { self.0.is_some() }
/// }
///
/// # tokio_test::block_on(async {
/// let result = accumulate(None, PageLimit::Unbounded, CursorPolicy::EndCursor, |_cursor| async {
///     Ok::<_, std::convert::Infallible>(Page {
///         edges: Some(vec![Edge(Some(1)), Edge(None), Edge(Some(3))]),
///         page_info: Some(PageInfo { has_next_page: false, end_cursor: None }),
///         total_count: Some(2),
///     })
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(result.items.len(), 2);
/// assert!(!result.truncated);
/// # });
/// ```
pub async fn accumulate<E, Err, F, Fut>(
    start: Option<String>,
    limit: PageLimit,
    policy: CursorPolicy,
    mut fetch_page: F,
) -> Result<Accumulation<E>, Err>
where
    E: PagedEdge,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<E>, Err>>,
{
    let mut acc = Accumulation::empty();

    if limit == PageLimit::AtMost(0) {
        acc.truncated = true;
        acc.next_cursor = start;
        return Ok(acc);
    }

    let mut cursor = start;
    loop {
        let page = fetch_page(cursor.clone()).await?;
        acc.pages_fetched += 1;

        if page.total_count.is_some() {
            acc.total_count = page.total_count;
        }
        let page_info = page.page_info.unwrap_or_default();
        let edges = page.edges.unwrap_or_default();
        let received = edges.len();

        let mut kept = edges.into_iter().filter(|edge| edge.has_node());
        let mut cut_short = false;
        match limit {
            PageLimit::Unbounded => acc.items.extend(kept),
            PageLimit::AtMost(max) => {
                let remaining = max.saturating_sub(acc.items.len());
                acc.items.extend(kept.by_ref().take(remaining));
                cut_short = kept.next().is_some();
            }
        }

        tracing::debug!(
            page = acc.pages_fetched,
            received,
            retained = acc.items.len(),
            has_next_page = page_info.has_next_page,
            "Accumulated page"
        );

        let limit_reached = matches!(limit, PageLimit::AtMost(max) if acc.items.len() >= max);
        if limit_reached && (cut_short || page_info.has_next_page) {
            acc.truncated = true;
            acc.next_cursor = match policy {
                CursorPolicy::LastRetainedEdge => acc
                    .items
                    .last()
                    .and_then(|edge| edge.cursor())
                    .map(str::to_owned),
                CursorPolicy::EndCursor => page_info.end_cursor,
            };
            if acc.next_cursor.is_none() {
                tracing::warn!(
                    page = acc.pages_fetched,
                    ?policy,
                    "Truncated without a resume cursor"
                );
            }
            return Ok(acc);
        }

        if !page_info.has_next_page {
            return Ok(acc);
        }

        if received == 0 {
            tracing::warn!(
                page = acc.pages_fetched,
                "Upstream reported more pages but returned no edges; stopping"
            );
            return Ok(acc);
        }

        let Some(end_cursor) = page_info.end_cursor else {
            tracing::warn!(
                page = acc.pages_fetched,
                "Upstream reported more pages without an end cursor; stopping"
            );
            return Ok(acc);
        };

        if cursor.as_deref() == Some(end_cursor.as_str()) {
            tracing::warn!(
                page = acc.pages_fetched,
                cursor = %end_cursor,
                "Upstream end cursor did not advance; stopping"
            );
            return Ok(acc);
        }

        cursor = Some(end_cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct TestEdge {
        cursor: Option<String>,
        node: Option<u32>,
    }

    impl PagedEdge for TestEdge {
        fn cursor(&self) -> Option<&str> {
            self.cursor.as_deref()
        }

        fn has_node(&self) -> bool {
            self.node.is_some()
        }
    }

    fn edge(n: u32) -> TestEdge {
        TestEdge {
            cursor: Some(format!("c{n}")),
            node: Some(n),
        }
    }

    fn null_edge(n: u32) -> TestEdge {
        TestEdge {
            cursor: Some(format!("c{n}")),
            node: None,
        }
    }

    fn page(edges: Vec<TestEdge>, has_next_page: bool, end_cursor: Option<&str>) -> Page<TestEdge> {
        Page {
            edges: Some(edges),
            page_info: Some(PageInfo {
                has_next_page,
                end_cursor: end_cursor.map(str::to_owned),
            }),
            total_count: Some(1000),
        }
    }

    /// A fake upstream serving `total` items, `page_size` per page. The
    /// cursor of item `n` is `c{n}`; `after = c{n}` continues at `n + 1`.
    fn serve(total: u32, page_size: u32, after: Option<&str>) -> Page<TestEdge> {
        let start = after
            .and_then(|c| c.strip_prefix('c'))
            .and_then(|n| n.parse::<u32>().ok())
            .map_or(0, |n| n + 1);
        let end = (start + page_size).min(total);
        let edges: Vec<TestEdge> = (start..end).map(edge).collect();
        let end_cursor = edges.last().and_then(|e| e.cursor.clone());
        Page {
            edges: Some(edges),
            page_info: Some(PageInfo {
                has_next_page: end < total,
                end_cursor,
            }),
            total_count: Some(u64::from(total)),
        }
    }

    #[tokio::test]
    async fn test_truncation_at_cursorless_edge_reports_no_resume_cursor() {
        let mut edges: Vec<TestEdge> = (0..5).map(edge).collect();
        edges[2].cursor = None;

        let result = accumulate(
            None,
            PageLimit::AtMost(3),
            CursorPolicy::LastRetainedEdge,
            |_| {
                let next = page(edges.clone(), true, Some("c4"));
                async move { Ok::<_, Infallible>(next) }
            },
        )
        .await
        .unwrap();

        assert_eq!(result.items.len(), 3);
        assert!(result.truncated);
        assert_eq!(result.next_cursor, None);
    }

    #[tokio::test]
    async fn test_limit_above_available_returns_everything_untruncated() {
        let mut pages = vec![
            page((0..100).map(edge).collect(), true, Some("c99")),
            page((100..120).map(edge).collect(), false, Some("c119")),
        ]
        .into_iter();

        let result = accumulate(
            None,
            PageLimit::AtMost(150),
            CursorPolicy::LastRetainedEdge,
            |_| {
                let next = pages.next().unwrap_or_default();
                async move { Ok::<_, Infallible>(next) }
            },
        )
        .await
        .unwrap();

        assert_eq!(result.items.len(), 120);
        assert!(!result.truncated);
        assert_eq!(result.next_cursor, None);
        assert_eq!(result.pages_fetched, 2);
    }

    #[tokio::test]
    async fn test_limit_within_first_page_truncates_at_last_retained_edge() {
        let result = accumulate(
            None,
            PageLimit::AtMost(50),
            CursorPolicy::LastRetainedEdge,
            |after| {
                let next = serve(500, 100, after.as_deref());
                async move { Ok::<_, Infallible>(next) }
            },
        )
        .await
        .unwrap();

        assert_eq!(result.items.len(), 50);
        assert!(result.truncated);
        assert_eq!(result.next_cursor.as_deref(), Some("c49"));
        assert_eq!(result.pages_fetched, 1);
        assert_eq!(result.total_count, Some(500));
    }

    #[tokio::test]
    async fn test_end_cursor_policy_reports_page_end_cursor() {
        let result = accumulate(None, PageLimit::AtMost(50), CursorPolicy::EndCursor, |after| {
            let next = serve(500, 100, after.as_deref());
            async move { Ok::<_, Infallible>(next) }
        })
        .await
        .unwrap();

        assert!(result.truncated);
        assert_eq!(result.next_cursor.as_deref(), Some("c99"));
    }

    #[tokio::test]
    async fn test_resuming_from_truncation_neither_duplicates_nor_loses_items() {
        let fetch = |after: Option<String>| {
            let next = serve(250, 100, after.as_deref());
            async move { Ok::<_, Infallible>(next) }
        };

        let first = accumulate(None, PageLimit::AtMost(120), CursorPolicy::LastRetainedEdge, fetch)
            .await
            .unwrap();
        let second = accumulate(
            first.next_cursor.clone(),
            PageLimit::AtMost(120),
            CursorPolicy::LastRetainedEdge,
            fetch,
        )
        .await
        .unwrap();
        let whole = accumulate(None, PageLimit::AtMost(240), CursorPolicy::LastRetainedEdge, fetch)
            .await
            .unwrap();

        let stitched: Vec<_> = first.items.into_iter().chain(second.items).collect();
        assert_eq!(stitched, whole.items);
    }

    #[tokio::test]
    async fn test_unbounded_follows_pages_until_exhausted() {
        let result = accumulate(None, PageLimit::Unbounded, CursorPolicy::EndCursor, |after| {
            let next = serve(250, 100, after.as_deref());
            async move { Ok::<_, Infallible>(next) }
        })
        .await
        .unwrap();

        assert_eq!(result.items.len(), 250);
        assert_eq!(result.pages_fetched, 3);
        assert!(!result.truncated);
        assert_eq!(result.items.first().unwrap().node, Some(0));
        assert_eq!(result.items.last().unwrap().node, Some(249));
    }

    #[tokio::test]
    async fn test_null_nodes_are_dropped_and_not_counted() {
        let mut pages = vec![
            page(vec![edge(1), null_edge(2), edge(3)], true, Some("c3")),
            page(vec![null_edge(4), edge(5), edge(6)], false, Some("c6")),
        ]
        .into_iter();

        let result = accumulate(
            None,
            PageLimit::AtMost(3),
            CursorPolicy::LastRetainedEdge,
            |_| {
                let next = pages.next().unwrap_or_default();
                async move { Ok::<_, Infallible>(next) }
            },
        )
        .await
        .unwrap();

        let nodes: Vec<_> = result.items.iter().map(|e| e.node).collect();
        assert_eq!(nodes, vec![Some(1), Some(3), Some(5)]);
        assert!(result.truncated);
        assert_eq!(result.next_cursor.as_deref(), Some("c5"));
    }

    #[tokio::test]
    async fn test_empty_page_claiming_more_terminates() {
        let mut calls = 0;
        let result = accumulate(
            None,
            PageLimit::AtMost(10_000),
            CursorPolicy::LastRetainedEdge,
            |_| {
                calls += 1;
                async { Ok::<_, Infallible>(page(vec![], true, Some("same"))) }
            },
        )
        .await
        .unwrap();

        assert_eq!(calls, 1);
        assert!(result.items.is_empty());
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn test_non_advancing_end_cursor_terminates() {
        let result = accumulate(
            None,
            PageLimit::Unbounded,
            CursorPolicy::EndCursor,
            |_| async { Ok::<_, Infallible>(page(vec![edge(1)], true, Some("stuck"))) },
        )
        .await
        .unwrap();

        // First call uses no cursor, second repeats "stuck" and is detected
        assert_eq!(result.pages_fetched, 2);
        assert_eq!(result.items.len(), 2);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn test_missing_end_cursor_terminates() {
        let result = accumulate(
            None,
            PageLimit::Unbounded,
            CursorPolicy::EndCursor,
            |_| async { Ok::<_, Infallible>(page(vec![edge(1)], true, None)) },
        )
        .await
        .unwrap();

        assert_eq!(result.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_fetch_count_is_bounded_by_limit() {
        let result = accumulate(
            None,
            PageLimit::AtMost(250),
            CursorPolicy::LastRetainedEdge,
            |after| {
                let next = serve(100_000, 100, after.as_deref());
                async move { Ok::<_, Infallible>(next) }
            },
        )
        .await
        .unwrap();

        assert_eq!(result.items.len(), 250);
        assert!(result.pages_fetched <= 250_usize.div_ceil(100) + 1);
    }

    #[tokio::test]
    async fn test_zero_limit_does_not_fetch() {
        let mut calls = 0;
        let result = accumulate(
            Some("c9".to_string()),
            PageLimit::AtMost(0),
            CursorPolicy::LastRetainedEdge,
            |_| {
                calls += 1;
                async { Ok::<_, Infallible>(Page::<TestEdge>::default()) }
            },
        )
        .await
        .unwrap();

        assert_eq!(calls, 0);
        assert!(result.items.is_empty());
        assert!(result.truncated);
        assert_eq!(result.next_cursor.as_deref(), Some("c9"));
    }

    #[tokio::test]
    async fn test_exact_limit_at_exhaustion_is_not_truncated() {
        let result = accumulate(
            None,
            PageLimit::AtMost(100),
            CursorPolicy::LastRetainedEdge,
            |after| {
                let next = serve(100, 100, after.as_deref());
                async move { Ok::<_, Infallible>(next) }
            },
        )
        .await
        .unwrap();

        assert_eq!(result.items.len(), 100);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let result: Result<Accumulation<TestEdge>, &str> = accumulate(
            None,
            PageLimit::Unbounded,
            CursorPolicy::EndCursor,
            |after| async move {
                if after.is_some() {
                    Err("boom")
                } else {
                    Ok(page(vec![edge(1)], true, Some("c1")))
                }
            },
        )
        .await;

        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn test_page_deserializes_relay_connection() {
        let page: Page<serde_json::Value> = serde_json::from_value(serde_json::json!({
            "totalCount": 3,
            "edges": [{ "cursor": "a" }],
            "pageInfo": { "hasNextPage": true, "endCursor": "a" }
        }))
        .unwrap();

        assert_eq!(page.total_count, Some(3));
        assert_eq!(page.edges.unwrap().len(), 1);
        assert!(page.page_info.unwrap().has_next_page);
    }

    #[test]
    fn test_page_tolerates_nulls() {
        let page: Page<serde_json::Value> = serde_json::from_value(serde_json::json!({
            "edges": null,
            "pageInfo": null
        }))
        .unwrap();

        assert!(page.edges.is_none());
        assert!(page.page_info.is_none());
        assert!(page.total_count.is_none());
    }
}
