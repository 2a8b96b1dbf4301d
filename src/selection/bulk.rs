//! Bulk "select the first N records" scan
//!
//! Grows the selected set until it holds N ids by walking the collection from
//! page 1 forward, one page at a time:
//!
//! ```text
//! selected ← copy(selected set); page ← 1
//! while |selected| < N:
//!     fetch page          (stop if empty)
//!     take ← min(N − |selected|, |page|)
//!     add the first `take` ids of the page that are not deselected
//!     page ← page + 1
//! ```
//!
//! `take` is computed before deselected ids are filtered out, so a page that
//! contains deselected ids contributes fewer than `take` ids and the scan
//! moves on to the next page. The selection never grows by more than N.
//!
//! The scan awaits each fetch before deciding whether to issue the next one.
//! A cancellation token is checked at the top of every iteration; an
//! in-flight fetch is never aborted.

use super::state::SelectionState;
use crate::source::{PageSource, RecordId, SourceError};
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What a bulk-select achieved, complete or not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSelectReport {
    /// Requested selection size
    pub target: u64,

    /// Ids newly added to the selected set
    pub added: usize,

    /// Selected set size after the scan
    pub selected_after: usize,

    /// Pages fetched successfully
    pub pages_scanned: u32,

    /// Ids inside the scanned window that were skipped because the user
    /// deselected them
    pub skipped_deselected: usize,

    /// Whether the scan ran out of records before reaching the target
    pub exhausted: bool,
}

impl BulkSelectReport {
    /// Whether the selected set reached the requested size
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.selected_after as u64 >= self.target
    }
}

/// Why a scan stopped before reaching its target or exhausting the source
#[derive(Debug)]
pub(crate) enum Interruption {
    Source { page: u32, error: SourceError },
    Cancelled,
}

/// Outcome of a scan, to be applied by the owner of the selection state
#[derive(Debug)]
pub(crate) struct BulkScan {
    pub selected: HashSet<RecordId>,
    pub report: BulkSelectReport,
    pub total_count: Option<u64>,
    pub interrupted: Option<Interruption>,
}

/// Run the scan against `source` without touching `state`
///
/// Everything accumulated before an interruption is returned in
/// `BulkScan::selected`, so a failed or cancelled scan still makes progress.
pub(crate) async fn scan_first_n<S>(
    source: &S,
    page_size: u32,
    target: u64,
    state: &SelectionState,
    cancel: &CancellationToken,
) -> BulkScan
where
    S: PageSource + ?Sized,
{
    let mut selected = state.selected_set();
    let initial = selected.len();
    let mut report = BulkSelectReport {
        target,
        ..BulkSelectReport::default()
    };
    let mut total_count = None;
    let mut interrupted = None;
    let mut page_number: u32 = 1;

    while (selected.len() as u64) < target {
        if cancel.is_cancelled() {
            warn!(page = page_number, "Bulk select cancelled");
            interrupted = Some(Interruption::Cancelled);
            break;
        }

        let page = match source.fetch_page(page_number, page_size).await {
            Ok(page) => page,
            Err(error) => {
                warn!(page = page_number, error = %error, "Bulk select stopped by fetch failure");
                interrupted = Some(Interruption::Source {
                    page: page_number,
                    error,
                });
                break;
            }
        };

        report.pages_scanned += 1;
        total_count = Some(page.total_count);

        if page.is_empty() {
            report.exhausted = true;
            break;
        }

        let remaining = target - selected.len() as u64;
        let take = usize::try_from(remaining).map_or(page.len(), |r| r.min(page.len()));

        for record in &page.records[..take] {
            if state.is_deselected(record.id) {
                report.skipped_deselected += 1;
            } else {
                selected.insert(record.id);
            }
        }

        debug!(
            page = page_number,
            take,
            selected = selected.len(),
            target,
            "Bulk select scanned page"
        );

        page_number += 1;
    }

    report.added = selected.len() - initial;
    report.selected_after = selected.len();

    BulkScan {
        selected,
        report,
        total_count,
        interrupted,
    }
}
