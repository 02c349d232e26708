//! Progress reporting for search runs.

use std::ops::ControlFlow;

use tracing::info;

use crate::domain::DateWindow;

use super::collector::PageSummary;

/// Observer of a search run's progress.
///
/// Returning `ControlFlow::Break` from either notification stops the run with
/// [`FinderError::Cancelled`](super::FinderError::Cancelled) before the next
/// request is made.
pub trait Progress {
    /// A window is about to be fetched. `index` is 1-based.
    fn window_started(&mut self, index: usize, total: usize, window: &DateWindow) -> ControlFlow<()>;

    /// A page was fetched and absorbed.
    fn page_fetched(&mut self, _page: u32, _total_pages: u32, _summary: &PageSummary) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Ignores all progress.
impl Progress for () {
    fn window_started(&mut self, _: usize, _: usize, _: &DateWindow) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Logs each window at info level.
#[derive(Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn window_started(&mut self, index: usize, total: usize, window: &DateWindow) -> ControlFlow<()> {
        info!("Date window {index}/{total} ({window})");
        ControlFlow::Continue(())
    }
}

/// Percentage of windows started before window `index` (1-based).
pub fn percent_complete(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = index.saturating_sub(1).min(total);
    (done * 100 / total) as u8
}
