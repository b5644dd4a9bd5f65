use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::data::{Dataset, Value};

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// Set of selected row indices, always within `[0, row_count)`.
/// Indices are positions in the original dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    rows: BTreeSet<usize>,
    row_count: usize,
}

impl SelectionState {
    pub fn new(row_count: usize) -> Self {
        Self {
            rows: BTreeSet::new(),
            row_count,
        }
    }

    /// Flip membership of `row`. Returns `false` (and changes nothing) when
    /// `row` is out of range.
    pub fn toggle(&mut self, row: usize) -> bool {
        if row >= self.row_count {
            log::warn!("Ignoring toggle of row {row}, dataset has {} rows", self.row_count);
            return false;
        }
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
        true
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

// ---------------------------------------------------------------------------
// Selected subset
// ---------------------------------------------------------------------------

/// One selected row: its dataset index and its cells in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRow {
    pub index: usize,
    pub cells: Vec<Value>,
}

/// The rows of a dataset whose indices are selected, in dataset order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectedSubset {
    pub columns: Vec<String>,
    pub rows: Vec<SelectedRow>,
}

impl SelectedSubset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.index).collect()
    }
}

/// Pure projection of `dataset` onto `selection`.
pub fn selected_subset(dataset: &Dataset, selection: &SelectionState) -> SelectedSubset {
    let columns = dataset
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let rows = selection
        .indices()
        .filter_map(|index| {
            let cells = dataset.row(index)?.into_iter().cloned().collect();
            Some(SelectedRow { index, cells })
        })
        .collect();
    SelectedSubset { columns, rows }
}

/// Aligned plain-text table; the first column is the dataset row index.
impl fmt::Display for SelectedSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "(no rows selected)");
        }

        let mut header = vec!["#".to_string()];
        header.extend(self.columns.iter().cloned());
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| {
                let mut line = vec![r.index.to_string()];
                line.extend(r.cells.iter().map(|v| v.to_string()));
                line
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for line in &body {
            for (w, cell) in widths.iter_mut().zip(line) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, line: &[String]| -> fmt::Result {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:<w$}"))
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())
        };

        write_line(f, &header)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for line in &body {
            write_line(f, line)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

/// Receives the freshly computed subset after every selection change.
pub trait SelectionObserver {
    fn selection_changed(&mut self, subset: &SelectedSubset);
}

impl<F: FnMut(&SelectedSubset)> SelectionObserver for F {
    fn selection_changed(&mut self, subset: &SelectedSubset) {
        self(subset)
    }
}

/// Logs every subset at debug level.
#[derive(Debug, Default)]
pub struct LogObserver;

impl SelectionObserver for LogObserver {
    fn selection_changed(&mut self, subset: &SelectedSubset) {
        log::debug!(
            "Selection now {:?} ({} rows)\n{subset}",
            subset.indices(),
            subset.len()
        );
    }
}

/// Text buffer shared between the view and whoever displays the preview.
pub type SharedPreview = Rc<RefCell<String>>;

/// Keeps a rendered copy of the latest subset in a [`SharedPreview`].
#[derive(Debug, Clone)]
pub struct PreviewObserver {
    target: SharedPreview,
}

impl PreviewObserver {
    pub fn new(target: SharedPreview) -> Self {
        Self { target }
    }
}

impl SelectionObserver for PreviewObserver {
    fn selection_changed(&mut self, subset: &SelectedSubset) {
        *self.target.borrow_mut() = subset.to_string();
    }
}

// ---------------------------------------------------------------------------
// Table view
// ---------------------------------------------------------------------------

/// An immutable dataset plus its mutable selection.
///
/// `click_row` is the only way to change the selection; every accepted
/// click recomputes the subset and notifies all observers before it
/// returns.
pub struct TableView {
    dataset: Arc<Dataset>,
    selection: SelectionState,
    subset: SelectedSubset,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl TableView {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let selection = SelectionState::new(dataset.len());
        let subset = selected_subset(&dataset, &selection);
        Self {
            dataset,
            selection,
            subset,
            observers: Vec::new(),
        }
    }

    /// Register an observer. It receives the current subset right away.
    pub fn subscribe(&mut self, mut observer: Box<dyn SelectionObserver>) {
        observer.selection_changed(&self.subset);
        self.observers.push(observer);
    }

    /// Toggle `row`. Returns `false` for out-of-range rows, which leave
    /// the view untouched.
    pub fn click_row(&mut self, row: usize) -> bool {
        if !self.selection.toggle(row) {
            return false;
        }
        self.publish();
        true
    }

    /// Swap in a new dataset and start over with an empty selection.
    pub fn reset(&mut self, dataset: Arc<Dataset>) {
        self.selection = SelectionState::new(dataset.len());
        self.dataset = dataset;
        self.publish();
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selection.contains(row)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn subset(&self) -> &SelectedSubset {
        &self.subset
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn publish(&mut self) {
        self.subset = selected_subset(&self.dataset, &self.selection);
        for observer in &mut self.observers {
            observer.selection_changed(&self.subset);
        }
    }
}
