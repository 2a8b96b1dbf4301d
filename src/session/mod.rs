//! Interactive browse session
//!
//! The text front end over a [`SelectionManager`]: it plays the part of the
//! table widget. It draws the visible page, turns row commands into the
//! widget's "currently checked rows" set, and forwards bulk-select requests.
//!
//! # Workflow
//!
//! ```text
//! Session started → load page 1 → draw
//!     ↓
//! ┌─→ read line → parse command
//! │   ├─ navigation   → load page → draw
//! │   ├─ row toggle   → on_selection_toggled → draw
//! │   ├─ first N      → request_bulk_select → refresh page → draw
//! │   └─ quit         → print selected ids, done
//! └── loop
//! ```

pub mod command;
pub mod error;
pub mod input;
pub mod interrupt;

pub use command::{HELP, SessionCommand};
pub use error::SessionError;
pub use input::{DialoguerReader, LineReader, StdinReader};
pub use interrupt::InterruptRoute;

use crate::config::DisplayConfig;
use crate::output::{OutputWriter, format_page, format_status};
use crate::selection::SelectionManager;
use crate::source::{PageSource, RecordId};
use std::collections::HashSet;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Whether the session loop should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Browse session - drives a `SelectionManager` from text commands
pub struct BrowseSession<'a, S> {
    manager: SelectionManager<S>,
    output: &'a dyn OutputWriter,
    display: DisplayConfig,
    color: bool,
    interrupt_on_ctrl_c: bool,
    interrupts: InterruptRoute,
    ctrl_c_watcher: Option<JoinHandle<()>>,
}

impl<'a, S: PageSource> BrowseSession<'a, S> {
    /// Create a session over `manager`, writing to `output`
    #[must_use]
    pub fn new(
        manager: SelectionManager<S>,
        output: &'a dyn OutputWriter,
        display: DisplayConfig,
    ) -> Self {
        Self {
            manager,
            output,
            display,
            color: false,
            interrupt_on_ctrl_c: false,
            interrupts: InterruptRoute::new(),
            ctrl_c_watcher: None,
        }
    }

    /// Highlight selected rows with terminal colors
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Let Ctrl-C stop a running bulk-select after the current page
    ///
    /// The Ctrl-C watcher is installed on the first `first N` and stays for
    /// the rest of the session; outside a bulk-select Ctrl-C ends the process.
    #[must_use]
    pub fn with_ctrl_c_cancel(mut self, enabled: bool) -> Self {
        self.interrupt_on_ctrl_c = enabled;
        self
    }

    #[must_use]
    pub const fn manager(&self) -> &SelectionManager<S> {
        &self.manager
    }

    /// Run the read-execute loop until `quit` or end of input
    ///
    /// Returns the ids selected when the session ended, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if reading input fails. Unknown commands and
    /// bad arguments are reported and the loop continues.
    pub async fn run<R: LineReader + ?Sized>(
        &mut self,
        reader: &mut R,
    ) -> Result<Vec<RecordId>, SessionError> {
        self.goto(1).await;

        loop {
            let Some(line) = reader.read_line(&self.prompt())? else {
                break;
            };

            match SessionCommand::parse(&line) {
                Ok(command) => {
                    if self.execute(command).await == Flow::Quit {
                        break;
                    }
                }
                Err(e) if e.is_recoverable() => self.output.error(&e.to_string()),
                Err(e) => return Err(e),
            }
        }

        let ids = self.manager.selected_ids();
        self.output.success(&format!("{} record(s) selected", ids.len()));
        if !ids.is_empty() {
            let list: Vec<String> = ids.iter().map(ToString::to_string).collect();
            self.output.write(&list.join(","));
        }
        Ok(ids)
    }

    /// Execute a single command
    pub async fn execute(&mut self, command: SessionCommand) -> Flow {
        debug!(?command, "Executing session command");

        match command {
            SessionCommand::Next => {
                let next = self.manager.current_page_number().map_or(1, |p| p + 1);
                self.goto(next).await;
            }
            SessionCommand::Prev => match self.manager.current_page_number() {
                Some(p) if p > 1 => self.goto(p - 1).await,
                _ => self.output.warning("Already on the first page"),
            },
            SessionCommand::Goto(page) => self.goto(page).await,
            SessionCommand::Select(_)
            | SessionCommand::Unselect(_)
            | SessionCommand::Only(_)
            | SessionCommand::All
            | SessionCommand::Clear => self.toggle(&command),
            SessionCommand::First(n) => self.bulk_select(n).await,
            SessionCommand::Show => self.render(),
            SessionCommand::Status => self.status(),
            SessionCommand::Help => {
                for (usage, description) in HELP {
                    self.output.write(&format!("  {usage:<18} {description}"));
                }
            }
            SessionCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn prompt(&self) -> String {
        match self.manager.current_page_number() {
            Some(page) => format!("page {page}/{}", self.manager.page_count()),
            None => "no page".to_string(),
        }
    }

    /// Load and draw `page`, refusing pages past the known end
    async fn goto(&mut self, page: u32) {
        let page_count = self.manager.page_count();
        if self.manager.current_page().is_some() && page > page_count.max(1) {
            self.output
                .warning(&format!("Page {page} is past the last page ({page_count})"));
            return;
        }

        match self.manager.load_page(page).await {
            Ok(_) => self.render(),
            Err(e) => self.output.error(&e.to_string()),
        }
    }

    /// Compute the widget's new checked set and hand it to the manager
    fn toggle(&mut self, command: &SessionCommand) {
        let Some(page) = self.manager.current_page() else {
            self.output.warning("No page loaded");
            return;
        };
        let page_ids: HashSet<RecordId> = page.ids().into_iter().collect();
        let mut checked: HashSet<RecordId> = self.manager.visible_selection().into_iter().collect();

        let requested: &[RecordId] = match command {
            SessionCommand::Select(ids)
            | SessionCommand::Unselect(ids)
            | SessionCommand::Only(ids) => ids,
            _ => &[],
        };
        let off_page: Vec<String> = requested
            .iter()
            .filter(|id| !page_ids.contains(id))
            .map(ToString::to_string)
            .collect();
        let on_page = requested.iter().copied().filter(|id| page_ids.contains(id));

        match command {
            SessionCommand::Select(_) => checked.extend(on_page),
            SessionCommand::Unselect(_) => {
                for id in on_page {
                    checked.remove(&id);
                }
            }
            SessionCommand::Only(_) => checked = on_page.collect(),
            SessionCommand::All => checked.clone_from(&page_ids),
            SessionCommand::Clear => checked.clear(),
            _ => return,
        }

        if !off_page.is_empty() {
            self.output
                .warning(&format!("Not on this page, ignored: {}", off_page.join(", ")));
        }

        let delta = self.manager.on_selection_toggled(&checked);
        self.render();
        if !delta.is_empty() {
            self.output.success(&format!(
                "{} selected, {} deselected",
                delta.selected.len(),
                delta.deselected.len()
            ));
        }
    }

    /// Bulk-select the first `n` records, then refresh the visible page
    async fn bulk_select(&mut self, n: u64) {
        let total = self.manager.total_count();
        let n = if total > 0 && n > total {
            self.output
                .warning(&format!("Only {total} records exist; selecting up to {total}"));
            total
        } else {
            n
        };

        if self.interrupt_on_ctrl_c && self.ctrl_c_watcher.is_none() {
            self.ctrl_c_watcher = Some(self.interrupts.spawn_watcher());
        }

        let cancel = CancellationToken::new();
        self.interrupts.arm(&cancel);
        self.output.info(&format!("Selecting the first {n} records..."));
        let result = self.manager.request_bulk_select_with_cancel(n, &cancel).await;
        self.interrupts.disarm();

        match result {
            Ok(report) if report.reached_target() => {
                self.output.success(&format!(
                    "{} record(s) added, {} selected in total",
                    report.added, report.selected_after
                ));
            }
            Ok(report) => {
                self.output.warning(&format!(
                    "Collection exhausted: {} selected of {} requested ({} skipped as deselected)",
                    report.selected_after, report.target, report.skipped_deselected
                ));
            }
            Err(e) => {
                self.output.error(&e.to_string());
                if let Some(report) = e.partial_report() {
                    self.output.warning(&format!(
                        "Kept partial selection: {} record(s) added, {} selected in total",
                        report.added, report.selected_after
                    ));
                }
            }
        }

        match self.manager.refresh().await {
            Ok(_) => self.render(),
            Err(e) => self.output.error(&e.to_string()),
        }
    }

    fn render(&self) {
        let Some(page) = self.manager.current_page() else {
            self.output.info("No page loaded");
            return;
        };

        let is_selected = |id| self.manager.is_selected(id);
        for line in format_page(page, is_selected, &self.display, self.color) {
            self.output.write(&line);
        }
        self.status();
    }

    fn status(&self) {
        let page_number = self.manager.current_page_number().unwrap_or(0);
        self.output.info(&format_status(
            page_number,
            self.manager.page_count(),
            self.manager.total_count(),
            self.manager.visible_selection().len(),
            self.manager.selected_count(),
        ));
    }
}

impl<S> Drop for BrowseSession<'_, S> {
    fn drop(&mut self) {
        if let Some(watcher) = self.ctrl_c_watcher.take() {
            watcher.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{BufferedWriter, MessageLevel};
    use crate::selection::Decision;
    use crate::source::MemorySource;
    use crate::testing::ScriptedSource;
    use std::collections::VecDeque;

    struct ScriptedReader {
        lines: VecDeque<String>,
    }

    impl ScriptedReader {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(ToString::to_string).collect(),
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, SessionError> {
            Ok(self.lines.pop_front())
        }
    }

    fn display() -> DisplayConfig {
        DisplayConfig {
            columns: vec!["title".to_string()],
            max_width: 20,
        }
    }

    #[tokio::test]
    async fn test_run_reproduces_deselect_then_bulk_scenario() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=12), 3);
        let mut session = BrowseSession::new(manager, &output, display());
        let mut reader = ScriptedReader::new(&["s 1 3", "n", "none", "first 5", "q"]);

        let ids = session.run(&mut reader).await.unwrap();

        assert_eq!(ids, vec![1, 3, 7, 8, 9]);
        assert_eq!(session.manager().decision(2), Decision::Deselected);
        assert_eq!(
            output.messages().last().unwrap(),
            &(MessageLevel::Normal, "1,3,7,8,9".to_string())
        );
    }

    #[tokio::test]
    async fn test_navigation_alone_does_not_deselect() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=9), 3);
        let mut session = BrowseSession::new(manager, &output, display());
        let mut reader = ScriptedReader::new(&["n", "n", "p", "first 4"]);

        let ids = session.run(&mut reader).await.unwrap();

        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(session.manager().state().deselected_count(), 0);
    }

    #[tokio::test]
    async fn test_unselect_and_only() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=6), 3);
        let mut session = BrowseSession::new(manager, &output, display());

        session.execute(SessionCommand::Goto(1)).await;
        session.execute(SessionCommand::All).await;
        session.execute(SessionCommand::Unselect(vec![2])).await;
        assert_eq!(session.manager().visible_selection(), vec![1, 3]);

        session.execute(SessionCommand::Only(vec![2, 5])).await;
        assert_eq!(session.manager().visible_selection(), vec![2]);
        assert!(
            output
                .messages_at(MessageLevel::Warning)
                .iter()
                .any(|m| m.contains("Not on this page, ignored: 5"))
        );
    }

    #[tokio::test]
    async fn test_bad_commands_are_reported_and_loop_continues() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=6), 3);
        let mut session = BrowseSession::new(manager, &output, display());
        let mut reader = ScriptedReader::new(&["bogus", "s x", "s 2"]);

        let ids = session.run(&mut reader).await.unwrap();

        assert_eq!(ids, vec![2]);
        assert_eq!(output.messages_at(MessageLevel::Error).len(), 2);
    }

    #[tokio::test]
    async fn test_goto_past_end_is_refused() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(ScriptedSource::numbered(6), 3);
        let mut session = BrowseSession::new(manager, &output, display());

        session.execute(SessionCommand::Goto(1)).await;
        session.execute(SessionCommand::Goto(3)).await;

        assert_eq!(session.manager().current_page_number(), Some(1));
        assert_eq!(session.manager().source().requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn test_prev_on_first_page_warns() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=6), 3);
        let mut session = BrowseSession::new(manager, &output, display());

        session.execute(SessionCommand::Goto(1)).await;
        session.execute(SessionCommand::Prev).await;

        assert_eq!(
            output.messages_at(MessageLevel::Warning),
            vec!["Already on the first page"]
        );
    }

    #[tokio::test]
    async fn test_bulk_select_is_clamped_to_total() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=5), 3);
        let mut session = BrowseSession::new(manager, &output, display());

        session.execute(SessionCommand::Goto(1)).await;
        session.execute(SessionCommand::First(50)).await;

        assert_eq!(session.manager().selected_count(), 5);
        assert!(
            output
                .messages_at(MessageLevel::Warning)
                .iter()
                .any(|m| m.contains("Only 5 records exist"))
        );
    }

    #[tokio::test]
    async fn test_ctrl_c_route_is_disarmed_after_bulk_select() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=6), 3);
        let mut session = BrowseSession::new(manager, &output, display());

        session.execute(SessionCommand::First(4)).await;

        assert_eq!(session.manager().selected_count(), 4);
        assert!(session.ctrl_c_watcher.is_none());
        assert!(!session.interrupts.interrupt());
    }

    #[tokio::test]
    async fn test_bulk_failure_keeps_partial_and_refreshes() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(ScriptedSource::numbered(9).fail_on_page(2), 3);
        let mut session = BrowseSession::new(manager, &output, display());

        session.execute(SessionCommand::Goto(1)).await;
        session.execute(SessionCommand::First(6)).await;

        assert_eq!(session.manager().selected_ids(), vec![1, 2, 3]);
        assert_eq!(session.manager().visible_selection(), vec![1, 2, 3]);
        assert!(
            output
                .messages_at(MessageLevel::Warning)
                .iter()
                .any(|m| m.contains("Kept partial selection: 3 record(s) added"))
        );
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let output = BufferedWriter::new();
        let manager = SelectionManager::new(MemorySource::from_ids(1..=3), 3);
        let mut session = BrowseSession::new(manager, &output, display());

        assert_eq!(session.execute(SessionCommand::Help).await, Flow::Continue);
        assert_eq!(output.messages_at(MessageLevel::Normal).len(), HELP.len());
        assert_eq!(session.execute(SessionCommand::Quit).await, Flow::Quit);
    }
}
