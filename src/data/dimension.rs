use std::fmt;

// ---------------------------------------------------------------------------
// Dimension – one categorical column that can be filtered
// ---------------------------------------------------------------------------

/// How the raw text of a column is interpreted when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    /// Kept verbatim, sorted lexicographically.
    Text,
    /// Whole numbers such as model years. An integral `2020.0` loads as
    /// `2020`, so one year never shows up twice.
    Integer,
    /// Measurements such as engine size. `2` and `2.0` both load as `2.0`.
    Decimal,
}

impl DimensionKind {
    /// Numeric columns sort ascending and are still filtered as discrete
    /// values, never as ranges.
    pub fn is_numeric(self) -> bool {
        self != DimensionKind::Text
    }
}

/// The seven filterable columns, declared in cascade order.
///
/// The derived `Ord` follows declaration order, so `Brand < Model < … <
/// FuelType` is also the precedence of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Brand,
    Model,
    Year,
    Transmission,
    Condition,
    EngineSize,
    FuelType,
}

impl Dimension {
    /// All dimensions in cascade order.
    pub const ALL: [Dimension; 7] = [
        Dimension::Brand,
        Dimension::Model,
        Dimension::Year,
        Dimension::Transmission,
        Dimension::Condition,
        Dimension::EngineSize,
        Dimension::FuelType,
    ];

    /// Position in the cascade (0 = first).
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Header of the column in the source file.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Brand => "Brand",
            Dimension::Model => "Model",
            Dimension::Year => "Year",
            Dimension::Transmission => "Transmission",
            Dimension::Condition => "Condition",
            Dimension::EngineSize => "Engine Size",
            Dimension::FuelType => "Fuel Type",
        }
    }

    /// Label for the filter widget.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Brand => "Brand(s)",
            Dimension::Model => "Model(s)",
            Dimension::Year => "Year(s)",
            Dimension::Transmission => "Transmission(s)",
            Dimension::Condition => "Condition(s)",
            Dimension::EngineSize => "Engine Size(s)",
            Dimension::FuelType => "Fuel Type(s)",
        }
    }

    pub fn kind(self) -> DimensionKind {
        match self {
            Dimension::Year => DimensionKind::Integer,
            Dimension::EngineSize => DimensionKind::Decimal,
            _ => DimensionKind::Text,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
