//! Selection manager
//!
//! Owns the selection state for a browsing session and is the only component
//! allowed to change it. The presentation layer talks to it with ids and
//! events, never with references to the underlying sets:
//!
//! - `on_page_loaded` tells the manager which records are visible
//! - `on_selection_toggled` hands over the widget's selection for that page
//! - `request_bulk_select` grows the selection to the first N records
//! - `is_selected` answers rendering queries
//!
//! Mutating methods take `&mut self`, so navigation or toggling cannot happen
//! while a bulk-select is awaiting a page.

use super::bulk::{self, BulkSelectReport, Interruption};
use super::error::SelectionError;
use super::state::{Decision, PageDelta, SelectionState};
use crate::source::{Page, PageSource, Record, RecordId, page_count};
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};

/// Result type for selection operations
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Page-independent selection over a paginated source
pub struct SelectionManager<S> {
    source: S,
    page_size: u32,
    state: SelectionState,
    current: Option<Page>,
    total_count: u64,
}

impl<S: PageSource> SelectionManager<S> {
    /// Create a manager with empty selection state
    #[must_use]
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            state: SelectionState::new(),
            current: None,
            total_count: 0,
        }
    }

    /// Record which page is now visible
    ///
    /// Only remembers the page; the selection itself is untouched.
    pub fn on_page_loaded(&mut self, page: Page) {
        self.store_page(page);
    }

    fn store_page(&mut self, page: Page) -> &Page {
        debug!(
            page = page.page_number,
            records = page.len(),
            total = page.total_count,
            "Page loaded"
        );
        self.total_count = page.total_count;
        self.current.insert(page)
    }

    /// Merge the widget's selection for the visible page
    ///
    /// `visible_selected_ids` is the complete set of rows the widget shows as
    /// checked. Every visible row not in it becomes explicitly deselected.
    /// Ids that are not on the visible page are ignored. Without a loaded
    /// page this is a no-op.
    pub fn on_selection_toggled(&mut self, visible_selected_ids: &HashSet<RecordId>) -> PageDelta {
        let Some(page) = &self.current else {
            return PageDelta::default();
        };

        let delta = self.state.reconcile_page(&page.ids(), visible_selected_ids);
        debug!(
            page = page.page_number,
            selected = delta.selected.len(),
            deselected = delta.deselected.len(),
            "Selection toggled"
        );
        delta
    }

    /// Fetch page `page_number` and make it the visible page
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::PageLoad` if the source fails. The previously
    /// visible page stays visible in that case.
    pub async fn load_page(&mut self, page_number: u32) -> Result<&Page> {
        let page = self
            .source
            .fetch_page(page_number, self.page_size)
            .await
            .map_err(|source| SelectionError::PageLoad {
                page: page_number,
                source,
            })?;

        Ok(self.store_page(page))
    }

    /// Re-fetch the visible page (page 1 if none was loaded yet)
    ///
    /// Call after a bulk-select so the view reflects records it selected.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::PageLoad` if the source fails.
    pub async fn refresh(&mut self) -> Result<&Page> {
        let page_number = self.current_page_number().unwrap_or(1);
        self.load_page(page_number).await
    }

    /// Grow the selection to the first `n` records of the collection
    ///
    /// Ids the user explicitly deselected are skipped. `n` larger than the
    /// collection is allowed and selects everything selectable; `n == 0` does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Source` if a page fetch fails. Whatever was
    /// selected before the failure stays selected.
    pub async fn request_bulk_select(&mut self, n: u64) -> Result<BulkSelectReport> {
        self.request_bulk_select_with_cancel(n, &CancellationToken::new())
            .await
    }

    /// Like [`request_bulk_select`](Self::request_bulk_select), stopping
    /// before the next page fetch once `cancel` is triggered
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Source` on fetch failure and
    /// `SelectionError::Cancelled` on cancellation; partial progress is kept
    /// in both cases.
    pub async fn request_bulk_select_with_cancel(
        &mut self,
        n: u64,
        cancel: &CancellationToken,
    ) -> Result<BulkSelectReport> {
        let span = info_span!("selection.bulk_select", target = n, page_size = self.page_size);

        async {
            info!(selected = self.state.selected_count(), "Starting bulk select");

            let scan =
                bulk::scan_first_n(&self.source, self.page_size, n, &self.state, cancel).await;

            self.state.apply_bulk(scan.selected);
            if let Some(total) = scan.total_count {
                self.total_count = total;
            }

            let report = scan.report;
            match scan.interrupted {
                None => {
                    info!(
                        added = report.added,
                        selected = report.selected_after,
                        pages = report.pages_scanned,
                        "Bulk select finished"
                    );
                    Ok(report)
                }
                Some(Interruption::Source { page, error }) => Err(SelectionError::Source {
                    page,
                    source: error,
                    report,
                }),
                Some(Interruption::Cancelled) => Err(SelectionError::Cancelled { report }),
            }
        }
        .instrument(span)
        .await
    }

    /// Whether `id` renders as selected
    #[must_use]
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.state.is_selected(id)
    }

    /// Decision recorded for `id`
    #[must_use]
    pub fn decision(&self, id: RecordId) -> Decision {
        self.state.decision(id)
    }

    /// Total records in the collection, as last reported by the source
    ///
    /// `0` until the first page has been fetched.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages in the collection at the configured page size
    #[must_use]
    pub fn page_count(&self) -> u32 {
        page_count(self.total_count, self.page_size)
    }

    /// Visible page, if any
    #[must_use]
    pub const fn current_page(&self) -> Option<&Page> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn current_page_number(&self) -> Option<u32> {
        self.current.as_ref().map(|p| p.page_number)
    }

    /// Records of the visible page
    #[must_use]
    pub fn visible_records(&self) -> &[Record] {
        match &self.current {
            Some(page) => page.records.as_slice(),
            None => &[],
        }
    }

    /// Selected ids among the visible records, in page order
    #[must_use]
    pub fn visible_selection(&self) -> Vec<RecordId> {
        self.visible_records()
            .iter()
            .map(|r| r.id)
            .filter(|&id| self.state.is_selected(id))
            .collect()
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.state.selected_count()
    }

    /// Selected ids in ascending order
    #[must_use]
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.state.selected_ids()
    }

    /// Read-only view of the selection state
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Access the underlying page source
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use crate::testing::ScriptedSource;

    fn ids(values: &[RecordId]) -> HashSet<RecordId> {
        values.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_toggle_without_page_is_noop() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9), 3);
        let delta = manager.on_selection_toggled(&ids(&[1, 2]));
        assert!(delta.is_empty());
        assert_eq!(manager.selected_count(), 0);
    }

    #[tokio::test]
    async fn test_externally_loaded_page_drives_reconciliation() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9), 3);
        let page = Page {
            page_number: 2,
            records: vec![Record::new(4), Record::new(5), Record::new(6)],
            total_count: 42,
        };

        manager.on_page_loaded(page);
        let delta = manager.on_selection_toggled(&ids(&[5, 1]));

        assert_eq!(delta.selected, vec![5]);
        assert_eq!(delta.deselected, vec![4, 6]);
        assert_eq!(manager.selected_ids(), vec![5]);
        assert_eq!(manager.state().deselected_ids(), vec![4, 6]);
        assert_eq!(manager.decision(1), Decision::Undecided);
        assert_eq!(manager.total_count(), 42);
        assert_eq!(manager.current_page_number(), Some(2));
        assert!(manager.source().requested_pages().is_empty());
    }

    #[tokio::test]
    async fn test_load_page_updates_total_and_visible() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(10), 3);
        let page = manager.load_page(2).await.unwrap();
        assert_eq!(page.ids(), vec![4, 5, 6]);

        assert_eq!(manager.total_count(), 10);
        assert_eq!(manager.page_count(), 4);
        assert_eq!(manager.current_page_number(), Some(2));
        assert_eq!(manager.visible_records().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_page() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9).fail_on_page(2), 3);
        manager.load_page(1).await.unwrap();

        let err = manager.load_page(2).await.unwrap_err();
        assert!(matches!(err, SelectionError::PageLoad { page: 2, .. }));
        assert_eq!(manager.current_page_number(), Some(1));
    }

    #[tokio::test]
    async fn test_visible_selection_in_page_order() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9), 3);
        manager.load_page(1).await.unwrap();
        manager.on_selection_toggled(&ids(&[3, 1]));

        assert_eq!(manager.visible_selection(), vec![1, 3]);
        assert_eq!(manager.decision(2), Decision::Deselected);
    }

    #[tokio::test]
    async fn test_bulk_select_applies_partial_progress_on_failure() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9).fail_on_page(2), 3);

        let err = manager.request_bulk_select(6).await.unwrap_err();

        match &err {
            SelectionError::Source { page, source, report } => {
                assert_eq!(*page, 2);
                assert!(matches!(source, SourceError::Unavailable(_)));
                assert_eq!(report.added, 3);
            }
            other => panic!("Expected Source error, got {other:?}"),
        }
        assert_eq!(manager.selected_ids(), vec![1, 2, 3]);
        assert_eq!(manager.total_count(), 9);
    }

    #[tokio::test]
    async fn test_bulk_select_zero_is_noop() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9), 3);
        let report = manager.request_bulk_select(0).await.unwrap();
        assert_eq!(report.added, 0);
        assert!(manager.source().requested_pages().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_bulk_select_keeps_progress() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::numbered(9).cancel_after_page(2, cancel.clone());
        let mut manager = SelectionManager::new(source, 3);

        let err = manager
            .request_bulk_select_with_cancel(9, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, SelectionError::Cancelled { .. }));
        assert_eq!(manager.selected_ids(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_refresh_reloads_visible_page() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9), 3);
        manager.load_page(2).await.unwrap();
        manager.request_bulk_select(5).await.unwrap();
        manager.refresh().await.unwrap();

        assert_eq!(manager.source().requested_pages(), vec![2, 1, 2, 2]);
        assert_eq!(manager.visible_selection(), vec![4, 5]);
    }

    #[tokio::test]
    async fn test_refresh_without_page_loads_first() {
        let mut manager = SelectionManager::new(ScriptedSource::numbered(9), 3);
        let page = manager.refresh().await.unwrap();
        assert_eq!(page.page_number, 1);
    }
}
