//! Datasets behind the three overview charts.

use std::collections::BTreeMap;

use crate::data::model::{FieldValue, Record};

use super::{median, percentile, sorted};

/// Listings per (year, brand).
#[derive(Debug, Clone, PartialEq)]
pub struct YearBrandCount {
    pub year: FieldValue,
    pub brand: FieldValue,
    pub count: usize,
}

/// Sorted by year, then brand. Listings missing either value are left out.
pub fn year_brand_counts<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<YearBrandCount> {
    let mut counts: BTreeMap<(&FieldValue, &FieldValue), usize> = BTreeMap::new();
    for rec in records {
        if rec.year.is_missing() || rec.brand.is_missing() {
            continue;
        }
        *counts.entry((&rec.year, &rec.brand)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((year, brand), count)| YearBrandCount {
            year: year.clone(),
            brand: brand.clone(),
            count,
        })
        .collect()
}

/// Box-and-whisker summary of one model's prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBox {
    pub model: FieldValue,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub count: usize,
}

/// One box per model, sorted by model. Whiskers reach the most extreme
/// prices within 1.5 × IQR of the quartiles.
pub fn model_price_boxes<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<PriceBox> {
    let mut by_model: BTreeMap<&FieldValue, Vec<f64>> = BTreeMap::new();
    for rec in records {
        if let (false, Some(price)) = (rec.model.is_missing(), rec.price) {
            by_model.entry(&rec.model).or_default().push(price);
        }
    }

    by_model
        .into_iter()
        .filter_map(|(model, prices)| {
            let prices = sorted(prices);
            let q1 = percentile(&prices, 0.25)?;
            let q3 = percentile(&prices, 0.75)?;
            let iqr = q3 - q1;
            let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
            Some(PriceBox {
                model: model.clone(),
                lower_whisker: prices.iter().copied().find(|&p| p >= lo_fence).unwrap_or(q1),
                q1,
                median: median(&prices)?,
                q3,
                upper_whisker: prices.iter().rev().copied().find(|&p| p <= hi_fence).unwrap_or(q3),
                count: prices.len(),
            })
        })
        .collect()
}

/// Median price of one model year against the oldest year in the subset.
#[derive(Debug, Clone, PartialEq)]
pub struct YearUplift {
    pub year: FieldValue,
    pub median_price: f64,
    /// Percent difference from the oldest year's median; 0 when that median is 0.
    pub pct_vs_baseline: f64,
}

pub fn yearly_uplift<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<YearUplift> {
    let mut by_year: BTreeMap<&FieldValue, Vec<f64>> = BTreeMap::new();
    for rec in records {
        if let (false, Some(price)) = (rec.year.is_missing(), rec.price) {
            by_year.entry(&rec.year).or_default().push(price);
        }
    }

    let medians: Vec<(&FieldValue, f64)> = by_year
        .into_iter()
        .filter_map(|(year, prices)| Some((year, median(&sorted(prices))?)))
        .collect();
    let Some(&(_, baseline)) = medians.first() else {
        return Vec::new();
    };

    medians
        .into_iter()
        .map(|(year, median_price)| YearUplift {
            year: year.clone(),
            median_price,
            pct_vs_baseline: if baseline == 0.0 {
                0.0
            } else {
                (median_price - baseline) / baseline * 100.0
            },
        })
        .collect()
}
