//! Global selection state
//!
//! Two id sets recording every explicit decision made during the session:
//!
//! - **selected**: ids marked selected by a row toggle or a bulk-select
//! - **deselected**: ids marked deselected by a row toggle; bulk-select must
//!   never re-select them
//!
//! The sets are disjoint at all times and never pruned: an id only moves from
//! one set to the other. Outside this crate the state is read-only; it is
//! written by page reconciliation and by bulk-select.

use crate::source::RecordId;
use std::collections::HashSet;

/// Decision recorded for a single id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Never touched; rendered as unselected
    Undecided,
    Selected,
    Deselected,
}

/// Ids whose decision changed during one page reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDelta {
    /// Ids that were not selected before and are now
    pub selected: Vec<RecordId>,

    /// Ids that were not deselected before and are now
    pub deselected: Vec<RecordId>,
}

impl PageDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.deselected.is_empty()
    }
}

/// Session-lifetime selection decisions
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<RecordId>,
    deselected: HashSet<RecordId>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decision recorded for `id`
    #[must_use]
    pub fn decision(&self, id: RecordId) -> Decision {
        if self.selected.contains(&id) {
            Decision::Selected
        } else if self.deselected.contains(&id) {
            Decision::Deselected
        } else {
            Decision::Undecided
        }
    }

    /// Whether `id` renders as selected
    ///
    /// Only the selected set is consulted; an explicit deselection and "never
    /// decided" look the same on screen.
    #[must_use]
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn is_deselected(&self, id: RecordId) -> bool {
        self.deselected.contains(&id)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn deselected_count(&self) -> usize {
        self.deselected.len()
    }

    /// Selected ids in ascending order
    #[must_use]
    pub fn selected_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<_> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Deselected ids in ascending order
    #[must_use]
    pub fn deselected_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<_> = self.deselected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Copy of the selected set, used as the starting point of a bulk scan
    #[must_use]
    pub(crate) fn selected_set(&self) -> HashSet<RecordId> {
        self.selected.clone()
    }

    /// Mark `id` selected, moving it out of the deselected set
    ///
    /// Returns `true` if the decision changed.
    pub(crate) fn select(&mut self, id: RecordId) -> bool {
        self.deselected.remove(&id);
        let changed = self.selected.insert(id);
        self.debug_check_disjoint();
        changed
    }

    /// Mark `id` deselected, moving it out of the selected set
    ///
    /// Returns `true` if the decision changed.
    pub(crate) fn deselect(&mut self, id: RecordId) -> bool {
        self.selected.remove(&id);
        let changed = self.deselected.insert(id);
        self.debug_check_disjoint();
        changed
    }

    /// Merge the widget's reported selection for one page
    ///
    /// Every id in `page_ids` ends up either selected (if it is in
    /// `widget_selected`) or deselected (otherwise). That includes rows the
    /// user never clicked: leaving a visible row unchecked records it as
    /// deselected, which later bulk-selects will honor.
    ///
    /// Ids not in `page_ids` are never touched, whether or not they appear in
    /// `widget_selected`.
    pub fn reconcile_page(
        &mut self,
        page_ids: &[RecordId],
        widget_selected: &HashSet<RecordId>,
    ) -> PageDelta {
        let mut delta = PageDelta::default();

        for &id in page_ids {
            if widget_selected.contains(&id) {
                if self.select(id) {
                    delta.selected.push(id);
                }
            } else if self.deselect(id) {
                delta.deselected.push(id);
            }
        }

        delta
    }

    /// Replace the selected set with the result of a bulk scan
    ///
    /// `selected` must be a superset of the current selected set built without
    /// any deselected id; both hold by construction of the scan.
    pub(crate) fn apply_bulk(&mut self, selected: HashSet<RecordId>) {
        debug_assert!(self.selected.is_subset(&selected));
        self.selected = selected;
        self.debug_check_disjoint();
    }

    fn debug_check_disjoint(&self) {
        debug_assert!(
            self.selected.is_disjoint(&self.deselected),
            "selected and deselected sets overlap"
        );
    }
}
