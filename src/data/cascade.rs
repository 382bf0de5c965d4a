//! Cascading filters.
//!
//! Each dimension only offers the values that survive every dimension ranked
//! before it. Stored selections that fall outside the freshly computed
//! candidates are dropped on the spot, so a stale value can never narrow the
//! subset. Dropped values are forgotten: widening an upstream filter again
//! does not bring them back.

use std::collections::BTreeSet;

use super::dimension::Dimension;
use super::filter::{passes, SelectionState};
use super::model::{Dataset, FieldValue};

/// What one filter widget shows: the values it may offer and the ones ticked.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionOptions {
    pub dimension: Dimension,
    /// Distinct non-missing values left by the upstream filters, sorted.
    pub candidates: Vec<FieldValue>,
    /// Reconciled selection, always a subset of `candidates`.
    pub selected: BTreeSet<FieldValue>,
}

impl DimensionOptions {
    pub fn is_selected(&self, value: &FieldValue) -> bool {
        self.selected.contains(value)
    }
}

/// Result of one full pass over the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    /// One entry per dimension, in cascade order.
    pub options: Vec<DimensionOptions>,
    /// The selection after reconciliation. Feed this back into the next pass.
    pub selection: SelectionState,
    /// Indices of the listings left after the last dimension, in dataset order.
    pub visible: Vec<usize>,
}

impl CascadeOutcome {
    pub fn options(&self, dimension: Dimension) -> &DimensionOptions {
        &self.options[dimension.rank()]
    }
}

/// Run every dimension in order against the running upstream view.
///
/// For each dimension:
/// 1. collect the distinct non-missing values of the rows still in view;
/// 2. drop stored selections not among those values;
/// 3. narrow the view by what remains (an empty selection narrows nothing).
///
/// Running it again on the returned selection reproduces the same outcome.
pub fn cascade(dataset: &Dataset, mut selection: SelectionState) -> CascadeOutcome {
    let mut view: Vec<usize> = (0..dataset.len()).collect();
    let mut options = Vec::with_capacity(Dimension::ALL.len());

    for dim in Dimension::ALL {
        let candidates: BTreeSet<FieldValue> = view
            .iter()
            .map(|&i| dataset.records[i].field(dim))
            .filter(|v| !v.is_missing())
            .cloned()
            .collect();

        let stored = selection.get(dim);
        let reconciled: BTreeSet<FieldValue> = stored
            .iter()
            .filter(|v| candidates.contains(*v))
            .cloned()
            .collect();
        if reconciled.len() != stored.len() {
            log::debug!(
                "{dim}: dropped {} stale selection(s) no longer offered",
                stored.len() - reconciled.len()
            );
        }

        if !reconciled.is_empty() {
            view.retain(|&i| passes(&dataset.records[i], dim, &reconciled));
        }

        selection.set(dim, reconciled.clone());
        options.push(DimensionOptions {
            dimension: dim,
            candidates: candidates.into_iter().collect(),
            selected: reconciled,
        });
    }

    CascadeOutcome {
        options,
        selection,
        visible: view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::apply;
    use crate::data::model::fixtures::{five_listings, listing};

    fn text(values: &[&str]) -> Vec<FieldValue> {
        values.iter().map(|&v| v.into()).collect()
    }

    fn years(values: &[i64]) -> Vec<FieldValue> {
        values.iter().map(|&v| FieldValue::Integer(v)).collect()
    }

    /// Every subset of `values`, including the empty one.
    fn subsets(values: &[FieldValue]) -> Vec<Vec<FieldValue>> {
        (0..1u32 << values.len())
            .map(|mask| {
                values
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, v)| v.clone())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn no_selection_offers_every_value() {
        let ds = five_listings();
        let out = cascade(&ds, SelectionState::default());
        assert_eq!(out.options(Dimension::Brand).candidates, text(&["A", "B"]));
        assert_eq!(out.options(Dimension::Model).candidates, text(&["X", "Y", "Z"]));
        assert_eq!(out.options(Dimension::Year).candidates, years(&[2019, 2020, 2021]));
        assert_eq!(out.visible, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn narrowing_brand_then_model() {
        let ds = five_listings();

        let out = cascade(&ds, SelectionState::default().with(Dimension::Brand, text(&["A"])));
        assert_eq!(out.options(Dimension::Model).candidates, text(&["X", "Y"]));

        let selection = out.selection.with(Dimension::Model, text(&["Y"]));
        let out = cascade(&ds, selection);
        assert_eq!(out.options(Dimension::Year).candidates, years(&[2021]));
        assert_eq!(out.visible, vec![1]);
    }

    #[test]
    fn stale_downstream_selection_is_dropped() {
        let ds = five_listings();
        let selection = SelectionState::default()
            .with(Dimension::Brand, text(&["A"]))
            .with(Dimension::Year, years(&[2019]));
        let out = cascade(&ds, selection);
        assert_eq!(out.visible, vec![3]);

        // Narrowing Model to Y leaves only 2021; the stored 2019 must go quietly.
        let out = cascade(&ds, out.selection.with(Dimension::Model, text(&["Y"])));
        assert!(out.selection.get(Dimension::Year).is_empty());
        assert!(out.options(Dimension::Year).selected.is_empty());
        assert_eq!(out.visible, vec![1]);
    }

    #[test]
    fn dropped_values_do_not_come_back() {
        let ds = five_listings();
        let selection = SelectionState::default().with(Dimension::Model, text(&["Z"]));
        let out = cascade(&ds, selection.with(Dimension::Brand, text(&["A"])));
        assert!(out.selection.get(Dimension::Model).is_empty());

        let mut selection = out.selection;
        selection.clear(Dimension::Brand);
        let out = cascade(&ds, selection);
        assert!(out.selection.get(Dimension::Model).is_empty());
        assert_eq!(out.visible.len(), ds.len());
    }

    #[test]
    fn empty_view_forces_every_selection_empty() {
        let ds = Dataset::default();
        let selection = SelectionState::default()
            .with(Dimension::Brand, text(&["A"]))
            .with(Dimension::Year, years(&[2020]));
        let out = cascade(&ds, selection);
        assert!(out.options.iter().all(|o| o.candidates.is_empty()));
        assert!(out.selection.is_unrestricted());
        assert!(out.visible.is_empty());
    }

    #[test]
    fn dimension_with_only_missing_cells_offers_nothing() {
        let mut ds = five_listings();
        ds.records.push(listing("C", "W", 2018, 1.0));
        ds.records[5].transmission = FieldValue::Missing;

        let selection = SelectionState::default()
            .with(Dimension::Brand, text(&["C"]))
            .with(Dimension::Condition, text(&["Used"]))
            .with(Dimension::FuelType, text(&["Petrol"]));
        let out = cascade(&ds, selection);
        assert!(out.options(Dimension::Transmission).candidates.is_empty());
        assert_eq!(out.options(Dimension::Model).candidates, text(&["W"]));
        assert_eq!(out.selection.get(Dimension::FuelType).len(), 1);
        assert_eq!(out.visible, vec![5]);
    }

    #[test]
    fn missing_values_are_never_candidates() {
        let mut ds = five_listings();
        ds.records[0].brand = FieldValue::Missing;
        let out = cascade(&ds, SelectionState::default());
        assert_eq!(out.options(Dimension::Brand).candidates, text(&["A", "B"]));
        assert!(!out
            .options(Dimension::Brand)
            .candidates
            .contains(&FieldValue::Missing));
    }

    #[test]
    fn cascade_is_idempotent() {
        let ds = five_listings();
        let selection = SelectionState::default()
            .with(Dimension::Brand, text(&["A", "B"]))
            .with(Dimension::Model, text(&["Z", "Q"]))
            .with(Dimension::Year, years(&[2019, 2021]));
        let first = cascade(&ds, selection);
        let second = cascade(&ds, first.selection.clone());
        assert_eq!(first, second);
    }

    #[test]
    fn reconciled_selection_is_within_candidates() {
        let ds = five_listings();
        let all_brands = text(&["A", "B", "C"]);
        let all_models = text(&["X", "Y", "Z"]);
        for brands in subsets(&all_brands) {
            for models in subsets(&all_models) {
                let selection = SelectionState::default()
                    .with(Dimension::Brand, brands.clone())
                    .with(Dimension::Model, models)
                    .with(Dimension::Year, years(&[2019, 2020, 2021]));
                let out = cascade(&ds, selection);
                for opts in &out.options {
                    assert!(opts.selected.iter().all(|v| opts.candidates.contains(v)));
                    assert_eq!(&opts.selected, out.selection.get(opts.dimension));
                }
                // The final view is exactly the filtered subset of the reconciled state.
                assert_eq!(out.visible, apply(&ds, &out.selection));
            }
        }
    }

    #[test]
    fn narrowing_upstream_never_grows_downstream_candidates() {
        let ds = five_listings();
        let brand_values = text(&["A", "B"]);
        let base = cascade(&ds, SelectionState::default());

        for brands in subsets(&brand_values).into_iter().filter(|s| !s.is_empty()) {
            let narrowed = cascade(&ds, SelectionState::default().with(Dimension::Brand, brands));
            for dim in &Dimension::ALL[1..] {
                let wide = &base.options(*dim).candidates;
                let narrow = &narrowed.options(*dim).candidates;
                assert!(narrow.iter().all(|v| wide.contains(v)), "{dim} grew");
            }
        }

        // Same for a downstream pair: Model narrowing never grows Year.
        let wide = cascade(&ds, SelectionState::default().with(Dimension::Brand, text(&["A"])));
        let narrow = cascade(&ds, wide.selection.clone().with(Dimension::Model, text(&["X"])));
        let wide_years = &wide.options(Dimension::Year).candidates;
        assert!(narrow
            .options(Dimension::Year)
            .candidates
            .iter()
            .all(|v| wide_years.contains(v)));
    }
}
