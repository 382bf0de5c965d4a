//! Mileage buckets: average price per mileage band.

use serde::{Deserialize, Serialize};

use crate::data::model::Record;

use super::{mean, median, percentile, sorted};

/// Edges of the fixed bands, in miles. Intervals are right-closed and the
/// first one also takes 0.
pub const FIXED_EDGES: [f64; 9] = [
    0.0,
    25_000.0,
    50_000.0,
    75_000.0,
    100_000.0,
    150_000.0,
    200_000.0,
    300_000.0,
    f64::INFINITY,
];

pub const FIXED_LABELS: [&str; 8] = [
    "0–25k", "25–50k", "50–75k", "75–100k", "100–150k", "150–200k", "200–300k", "300k+",
];

/// Number of equal-population bands in quantile mode.
pub const QUANTILE_BUCKETS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketMode {
    #[default]
    Fixed,
    Quantile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceStat {
    #[default]
    Median,
    Mean,
}

impl PriceStat {
    pub fn label(self) -> &'static str {
        match self {
            PriceStat::Median => "Median",
            PriceStat::Mean => "Mean",
        }
    }
}

/// User controls for the mileage chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketConfig {
    /// Listings with more miles than this are left out.
    pub cap: f64,
    pub mode: BucketMode,
    pub stat: PriceStat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MileageBucket {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    /// Mean or median price, per [`BucketConfig::stat`].
    pub price: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketReport {
    /// The mode the buckets were actually built with.
    pub mode_used: BucketMode,
    /// Quantile mode was asked for but the data could not support it.
    pub degraded: bool,
    /// Non-empty buckets in ascending mileage order.
    pub buckets: Vec<MileageBucket>,
}

/// Slider bounds for the mileage cap, derived from the subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapBounds {
    pub max: f64,
    pub default: f64,
}

/// Mileage/price pairs that can be charted at all.
fn priced_mileages<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<(f64, f64)> {
    records
        .into_iter()
        .filter_map(|r| Some((r.mileage?, r.price?)))
        .collect()
}

/// `None` when no listing has both mileage and price.
pub fn cap_bounds<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    default_percentile: f64,
    max_percentile: f64,
) -> Option<CapBounds> {
    let miles = sorted(priced_mileages(records).into_iter().map(|(m, _)| m).collect());
    let max = percentile(&miles, max_percentile)?;
    let default = percentile(&miles, default_percentile)?.min(max);
    Some(CapBounds { max, default })
}

/// Edges to bucket `miles` with, plus the mode they belong to.
///
/// Quantile mode needs ten strictly increasing decile edges. With fewer than
/// ten distinct mileages, or with repeated deciles, it falls back to the
/// fixed edges.
pub fn bucket_edges(miles: &[f64], mode: BucketMode) -> (BucketMode, Vec<f64>) {
    if mode == BucketMode::Quantile {
        let miles = sorted(miles.to_vec());
        let mut distinct = miles.clone();
        distinct.dedup();

        if distinct.len() >= QUANTILE_BUCKETS {
            let edges: Vec<f64> = (0..=QUANTILE_BUCKETS)
                .filter_map(|i| percentile(&miles, i as f64 / QUANTILE_BUCKETS as f64))
                .collect();
            if edges.windows(2).all(|w| w[0] < w[1]) {
                return (BucketMode::Quantile, edges);
            }
        }
        log::debug!(
            "quantile buckets infeasible for {} distinct mileage(s), using fixed bands",
            distinct.len()
        );
    }
    (BucketMode::Fixed, FIXED_EDGES.to_vec())
}

/// Index of the band holding `miles`; the first band includes its lower edge.
pub fn bucket_index(edges: &[f64], miles: f64) -> Option<usize> {
    let first = *edges.first()?;
    if miles < first {
        return None;
    }
    if miles == first {
        return Some(0);
    }
    edges.windows(2).position(|w| w[0] < miles && miles <= w[1])
}

pub fn bucketize<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    config: &BucketConfig,
) -> BucketReport {
    let pairs: Vec<(f64, f64)> = priced_mileages(records)
        .into_iter()
        .filter(|&(m, _)| m <= config.cap)
        .collect();
    let miles: Vec<f64> = pairs.iter().map(|&(m, _)| m).collect();

    let (mode_used, edges) = bucket_edges(&miles, config.mode);

    let mut prices: Vec<Vec<f64>> = vec![Vec::new(); edges.len() - 1];
    for &(m, p) in &pairs {
        if let Some(i) = bucket_index(&edges, m) {
            prices[i].push(p);
        }
    }

    let buckets = prices
        .into_iter()
        .enumerate()
        .filter(|(_, p)| !p.is_empty())
        .map(|(i, p)| {
            let price = match config.stat {
                PriceStat::Median => median(&sorted(p.clone())),
                PriceStat::Mean => mean(&p),
            };
            MileageBucket {
                label: bucket_label(mode_used, &edges, i),
                lower: edges[i],
                upper: edges[i + 1],
                price: price.unwrap_or_default(),
                count: p.len(),
            }
        })
        .collect();

    BucketReport {
        mode_used,
        degraded: config.mode != mode_used,
        buckets,
    }
}

fn bucket_label(mode: BucketMode, edges: &[f64], i: usize) -> String {
    match mode {
        BucketMode::Fixed => FIXED_LABELS[i].to_string(),
        BucketMode::Quantile => format!("{}–{}", short_miles(edges[i]), short_miles(edges[i + 1])),
    }
}

/// `12.5k`, `40k`, `850`.
fn short_miles(miles: f64) -> String {
    if miles >= 1_000.0 {
        let k = (miles / 100.0).round() / 10.0;
        if k.fract() == 0.0 {
            format!("{k:.0}k")
        } else {
            format!("{k:.1}k")
        }
    } else {
        format!("{miles:.0}")
    }
}
