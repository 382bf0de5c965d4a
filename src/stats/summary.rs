use crate::data::model::Record;

use super::{median, sorted};

/// Headline numbers for the current subset.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceSummary {
    /// No listing matched the filters. Nothing is computed.
    Empty,
    Populated {
        count: usize,
        /// `None` when every listing in the subset lacks a price.
        min: Option<f64>,
        median: Option<f64>,
        max: Option<f64>,
    },
}

impl PriceSummary {
    pub fn count(&self) -> usize {
        match self {
            PriceSummary::Empty => 0,
            PriceSummary::Populated { count, .. } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PriceSummary::Empty)
    }
}

pub fn summarize<'a>(records: impl IntoIterator<Item = &'a Record>) -> PriceSummary {
    let mut count = 0;
    let mut prices = Vec::new();
    for rec in records {
        count += 1;
        prices.extend(rec.price);
    }
    if count == 0 {
        return PriceSummary::Empty;
    }

    let prices = sorted(prices);
    PriceSummary::Populated {
        count,
        min: prices.first().copied(),
        median: median(&prices),
        max: prices.last().copied(),
    }
}

/// `$12,345` style, or an em dash when there is no value.
pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", group_thousands(v.round() as i64)),
        None => "—".to_string(),
    }
}

pub fn format_count(n: usize) -> String {
    group_thousands(n as i64)
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cascade::cascade;
    use crate::data::dimension::Dimension;
    use crate::data::filter::{FilteredView, SelectionState};
    use crate::data::model::fixtures::five_listings;
    use crate::data::model::FieldValue;

    #[test]
    fn empty_subset_is_a_distinct_state() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary, PriceSummary::Empty);
        assert_eq!(summary.count(), 0);
    }

    #[test]
    fn five_listing_scenario() {
        let ds = five_listings();
        let selection = SelectionState::default()
            .with(Dimension::Brand, [FieldValue::from("A")])
            .with(Dimension::Model, [FieldValue::from("Y")]);
        let out = cascade(&ds, selection);
        let view = FilteredView::new(&ds, &out.visible);

        assert_eq!(
            summarize(view.records()),
            PriceSummary::Populated {
                count: 1,
                min: Some(20_000.0),
                median: Some(20_000.0),
                max: Some(20_000.0),
            }
        );
    }

    #[test]
    fn median_of_even_count_averages_the_middle() {
        let ds = five_listings();
        let summary = summarize(&ds.records[..4]);
        assert_eq!(
            summary,
            PriceSummary::Populated {
                count: 4,
                min: Some(9_000.0),
                median: Some(12_500.0),
                max: Some(20_000.0),
            }
        );
    }

    #[test]
    fn listings_without_price_still_count() {
        let mut ds = five_listings();
        for rec in &mut ds.records {
            rec.price = None;
        }
        let summary = summarize(&ds.records);
        assert_eq!(summary.count(), 5);
        assert!(matches!(summary, PriceSummary::Populated { median: None, .. }));
    }

    #[test]
    fn formatting() {
        assert_eq!(format_price(Some(1_234_567.4)), "$1,234,567");
        assert_eq!(format_price(Some(999.0)), "$999");
        assert_eq!(format_price(None), "—");
        assert_eq!(format_count(2500), "2,500");
    }
}
