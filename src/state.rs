use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use crate::data::{load_dataset, Dataset, FetchOptions};
use crate::export::export_to_file;
use crate::selection::{LogObserver, PreviewObserver, SharedPreview, TableView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where the dataset came from; used again on reload.
    pub location: String,

    pub fetch_options: FetchOptions,

    /// The table and its selection.
    pub view: TableView,

    /// Rendered text of the current selection, kept fresh by the view.
    pub preview: SharedPreview,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the status message is an error.
    pub status_is_error: bool,
}

impl AppState {
    /// Wrap an already loaded dataset.
    pub fn new(location: String, fetch_options: FetchOptions, dataset: Dataset) -> Self {
        let preview = SharedPreview::default();
        let mut view = TableView::new(Arc::new(dataset));
        view.subscribe(Box::new(LogObserver));
        view.subscribe(Box::new(PreviewObserver::new(Rc::clone(&preview))));

        Self {
            location,
            fetch_options,
            view,
            preview,
            status_message: None,
            status_is_error: false,
        }
    }

    /// Apply a click on a grid row.
    pub fn click_row(&mut self, row: usize) {
        self.view.click_row(row);
    }

    /// Run the loader again. On success the view restarts with an empty
    /// selection; on failure the current view is kept. Either outcome is
    /// reported through the status line.
    pub fn reload(&mut self) {
        match load_dataset(&self.location, &self.fetch_options) {
            Ok(dataset) => {
                let rows = dataset.len();
                self.view.reset(Arc::new(dataset));
                self.set_status(format!("Reloaded {rows} rows"), false);
            }
            Err(e) => {
                log::error!("Reload failed: {e}");
                self.set_status(format!("{}: {e}", e.kind()), true);
            }
        }
    }

    /// Export the current selection to `path`.
    pub fn export_selection(&mut self, path: &Path) {
        match export_to_file(self.view.subset(), path) {
            Ok(_) => {
                let msg = format!(
                    "Exported {} rows to {}",
                    self.view.subset().len(),
                    path.display()
                );
                self.set_status(msg, false);
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.set_status(format!("Export failed: {e:#}"), true);
            }
        }
    }

    fn set_status(&mut self, message: String, is_error: bool) {
        self.status_message = Some(message);
        self.status_is_error = is_error;
    }
}
