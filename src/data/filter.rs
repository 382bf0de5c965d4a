use std::collections::BTreeSet;

use super::dimension::Dimension;
use super::model::{Dataset, FieldValue, Record};

// ---------------------------------------------------------------------------
// Selection state: which values are chosen per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection. An empty set means "no filter" (show all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: [BTreeSet<FieldValue>; 7],
}

impl SelectionState {
    pub fn get(&self, dimension: Dimension) -> &BTreeSet<FieldValue> {
        &self.selected[dimension.rank()]
    }

    pub fn set(&mut self, dimension: Dimension, values: BTreeSet<FieldValue>) {
        self.selected[dimension.rank()] = values;
    }

    /// Builder-style [`set`](Self::set), handy when preparing a state.
    pub fn with(mut self, dimension: Dimension, values: impl IntoIterator<Item = FieldValue>) -> Self {
        self.set(dimension, values.into_iter().collect());
        self
    }

    /// Add `value` if absent, remove it if present.
    pub fn toggle(&mut self, dimension: Dimension, value: &FieldValue) {
        let selected = &mut self.selected[dimension.rank()];
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.selected[dimension.rank()].clear();
    }

    /// Whether no dimension restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.selected.iter().all(BTreeSet::is_empty)
    }
}

/// Whether a record passes one dimension's selection.
pub(crate) fn passes(record: &Record, dimension: Dimension, selected: &BTreeSet<FieldValue>) -> bool {
    selected.is_empty() || selected.contains(record.field(dimension))
}

/// Return indices of listings that pass every active selection, in dataset order.
///
/// A listing passes a dimension when:
/// * the dimension's selection is empty → passes (no constraint)
/// * the listing's value for that dimension is in the selected set → passes
///
/// A missing cell never matches a non-empty selection.
pub fn apply(dataset: &Dataset, selection: &SelectionState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            Dimension::ALL
                .iter()
                .all(|&dim| passes(rec, dim, selection.get(dim)))
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – the working subset handed to summaries and charts
// ---------------------------------------------------------------------------

/// A borrowed subset of the dataset, in dataset order.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: &'a [usize],
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, indices: &'a [usize]) -> Self {
        Self { dataset, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// The `pos`-th listing of the subset.
    pub fn get(&self, pos: usize) -> Option<&'a Record> {
        let dataset = self.dataset;
        self.indices.get(pos).map(|&i| &dataset.records[i])
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + Clone + 'a {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }
}
