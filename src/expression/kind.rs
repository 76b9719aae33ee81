//! Expression and operator kinds, with their declared attributes.

use crate::value::{Coords, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Leaf expressions and operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// A constant value
    BaseValue(Value),
    /// The NULL value
    Null,
    MathConstant(MathConstant),
    /// Random integer in `[min, max]`, restricted to `min + k * step`
    RandomInteger { min: i32, max: i32, step: i32 },
    /// Random float in `[min, max]`
    RandomFloat { min: f64, max: f64 },
    Operator(Operator),
}

impl ExpressionKind {
    /// QTI class name of this expression
    pub fn name(&self) -> &'static str {
        match self {
            ExpressionKind::BaseValue(_) => "baseValue",
            ExpressionKind::Null => "null",
            ExpressionKind::MathConstant(_) => "mathConstant",
            ExpressionKind::RandomInteger { .. } => "randomInteger",
            ExpressionKind::RandomFloat { .. } => "randomFloat",
            ExpressionKind::Operator(op) => op.name(),
        }
    }
}

impl From<Operator> for ExpressionKind {
    fn from(op: Operator) -> Self {
        ExpressionKind::Operator(op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MathConstant {
    Pi,
    E,
}

impl MathConstant {
    pub fn value(&self) -> f64 {
        match self {
            MathConstant::Pi => std::f64::consts::PI,
            MathConstant::E => std::f64::consts::E,
        }
    }
}

/// How `equal` compares its operands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToleranceMode {
    #[default]
    Exact,
    Absolute,
    Relative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundingMode {
    #[default]
    SignificantFigures,
    DecimalPlaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Atan2,
    Asec,
    Acsc,
    Acot,
    Sinh,
    Cosh,
    Tanh,
    Sech,
    Csch,
    Coth,
    Log,
    Ln,
    Exp,
    Abs,
    Signum,
    Floor,
    Ceil,
    ToDegrees,
    ToRadians,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatsFunction {
    Mean,
    SampleVariance,
    #[serde(rename = "sampleSD")]
    SampleSd,
    PopVariance,
    #[serde(rename = "popSD")]
    PopSd,
}

/// Attributes of a `customOperator`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttributes {
    /// Reference to the implementation, resolved through the host registry
    pub class: Option<String>,
    pub definition: Option<String>,
    /// Extension attributes, keyed by qualified name
    pub attributes: BTreeMap<String, String>,
}

impl CustomAttributes {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Built-in operators, each carrying its declared attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    // Logic
    And,
    Or,
    Not,
    AnyN {
        min: i32,
        max: i32,
    },

    // Arithmetic
    Sum,
    Product,
    Subtract,
    Divide,
    Power,
    IntegerDivide,
    IntegerModulus,
    Truncate,
    Round,
    IntegerToFloat,
    RoundTo {
        rounding_mode: RoundingMode,
        figures: i32,
    },
    Max,
    Min,
    Gcd,
    Lcm,
    MathOperator {
        name: MathFunction,
    },
    StatsOperator {
        name: StatsFunction,
    },

    // Comparison
    Gt,
    Lt,
    Gte,
    Lte,
    Equal {
        tolerance_mode: ToleranceMode,
        tolerance: Vec<f64>,
        include_lower_bound: bool,
        include_upper_bound: bool,
    },
    EqualRounded {
        rounding_mode: RoundingMode,
        figures: i32,
    },
    Match,
    DurationLt,
    DurationGte,

    // Strings
    StringMatch {
        case_sensitive: bool,
        substring: bool,
    },
    Substring {
        case_sensitive: bool,
    },
    PatternMatch {
        pattern: String,
    },

    // Containers
    Multiple,
    Ordered,
    ContainerSize,
    IsNull,
    Index {
        n: i32,
    },
    FieldValue {
        field_identifier: String,
    },
    Member,
    Delete,
    Contains,
    Random,
    Repeat {
        number_repeats: i32,
    },

    // Geometry
    Inside {
        coords: Coords,
    },

    Custom(CustomAttributes),
}

impl Operator {
    /// `equal` with exact comparison and inclusive bounds
    pub fn equal_exact() -> Self {
        Operator::Equal {
            tolerance_mode: ToleranceMode::Exact,
            tolerance: Vec::new(),
            include_lower_bound: true,
            include_upper_bound: true,
        }
    }

    /// `equal` with a tolerance window and inclusive bounds
    pub fn equal_within(tolerance_mode: ToleranceMode, tolerance: Vec<f64>) -> Self {
        Operator::Equal {
            tolerance_mode,
            tolerance,
            include_lower_bound: true,
            include_upper_bound: true,
        }
    }

    pub fn string_match(case_sensitive: bool) -> Self {
        Operator::StringMatch {
            case_sensitive,
            substring: false,
        }
    }

    /// QTI class name of this operator
    pub fn name(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::AnyN { .. } => "anyN",
            Operator::Sum => "sum",
            Operator::Product => "product",
            Operator::Subtract => "subtract",
            Operator::Divide => "divide",
            Operator::Power => "power",
            Operator::IntegerDivide => "integerDivide",
            Operator::IntegerModulus => "integerModulus",
            Operator::Truncate => "truncate",
            Operator::Round => "round",
            Operator::IntegerToFloat => "integerToFloat",
            Operator::RoundTo { .. } => "roundTo",
            Operator::Max => "max",
            Operator::Min => "min",
            Operator::Gcd => "gcd",
            Operator::Lcm => "lcm",
            Operator::MathOperator { .. } => "mathOperator",
            Operator::StatsOperator { .. } => "statsOperator",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Equal { .. } => "equal",
            Operator::EqualRounded { .. } => "equalRounded",
            Operator::Match => "match",
            Operator::DurationLt => "durationLT",
            Operator::DurationGte => "durationGTE",
            Operator::StringMatch { .. } => "stringMatch",
            Operator::Substring { .. } => "substring",
            Operator::PatternMatch { .. } => "patternMatch",
            Operator::Multiple => "multiple",
            Operator::Ordered => "ordered",
            Operator::ContainerSize => "containerSize",
            Operator::IsNull => "isNull",
            Operator::Index { .. } => "index",
            Operator::FieldValue { .. } => "fieldValue",
            Operator::Member => "member",
            Operator::Delete => "delete",
            Operator::Contains => "contains",
            Operator::Random => "random",
            Operator::Repeat { .. } => "repeat",
            Operator::Inside { .. } => "inside",
            Operator::Custom(_) => "customOperator",
        }
    }
}
