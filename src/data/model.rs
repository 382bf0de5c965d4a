use std::cmp::Ordering;
use std::fmt;

use super::dimension::Dimension;

// ---------------------------------------------------------------------------
// FieldValue – a single categorical cell
// ---------------------------------------------------------------------------

/// The value of one categorical cell of a listing.
/// Selections are kept in `BTreeSet`s downstream, so `FieldValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    /// Empty cell. Never offered as a filter candidate.
    Missing,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Text(a), Text(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Decimal(a), Decimal(b)) => a.total_cmp(b),
            // A column is normally homogeneous; mixed numbers still sort by value.
            (Integer(a), Decimal(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Decimal(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

fn discriminant(v: &FieldValue) -> u8 {
    match v {
        FieldValue::Missing => 0,
        FieldValue::Integer(_) | FieldValue::Decimal(_) => 1,
        FieldValue::Text(_) => 2,
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Text(s) => s.hash(state),
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Decimal(f) => f.to_bits().hash(state),
            FieldValue::Missing => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            // Engine sizes read better as "2.0" than "2".
            FieldValue::Decimal(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            FieldValue::Decimal(v) => write!(f, "{v}"),
            FieldValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Decimal(v)
    }
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Record – one vehicle listing
// ---------------------------------------------------------------------------

/// One row of the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// `Car ID` column, when the file has one.
    pub car_id: Option<i64>,
    pub brand: FieldValue,
    pub model: FieldValue,
    pub year: FieldValue,
    pub transmission: FieldValue,
    pub condition: FieldValue,
    pub engine_size: FieldValue,
    pub fuel_type: FieldValue,
    pub price: Option<f64>,
    pub mileage: Option<f64>,
}

impl Record {
    /// The cell this record holds for a filter dimension.
    pub fn field(&self, dimension: Dimension) -> &FieldValue {
        match dimension {
            Dimension::Brand => &self.brand,
            Dimension::Model => &self.model,
            Dimension::Year => &self.year,
            Dimension::Transmission => &self.transmission,
            Dimension::Condition => &self.condition,
            Dimension::EngineSize => &self.engine_size,
            Dimension::FuelType => &self.fuel_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All listings in file order. Never mutated after loading.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn text_sorts_lexicographically_and_numbers_ascending() {
        let text: BTreeSet<FieldValue> = ["b", "A", "a"].into_iter().map(FieldValue::from).collect();
        let text: Vec<_> = text.into_iter().map(|v| v.to_string()).collect();
        assert_eq!(text, ["A", "a", "b"]);

        let sizes: BTreeSet<FieldValue> =
            [2.5_f64, 1.0, 10.0].into_iter().map(FieldValue::from).collect();
        let sizes: Vec<_> = sizes.into_iter().map(|v| v.to_string()).collect();
        assert_eq!(sizes, ["1.0", "2.5", "10.0"]);
    }

    #[test]
    fn mixed_numbers_order_by_value() {
        assert!(FieldValue::Integer(2) < FieldValue::Decimal(2.5));
        assert!(FieldValue::Decimal(1.5) < FieldValue::Integer(2));
        assert_ne!(FieldValue::Integer(2), FieldValue::Decimal(2.0));
    }

    #[test]
    fn record_field_lookup() {
        let rec = fixtures::listing("A", "X", 2020, 1.0);
        assert_eq!(rec.field(Dimension::Brand), &FieldValue::from("A"));
        assert_eq!(rec.field(Dimension::Year), &FieldValue::Integer(2020));
        assert_eq!(rec.field(Dimension::EngineSize).to_string(), "2.0");
    }
}
