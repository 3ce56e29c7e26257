//! Filter expressions for queries, search, summaries and aggregations.
//!
//! ```rust
//! use xata_api::{FilterExpression, FilterPredicate};
//!
//! let filter = FilterExpression::new()
//!     .column("user-name", "alice")
//!     .column("age", FilterPredicate::ge(18.0))
//!     .exists("email");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::values::{exact_double, IntegerOutOfRange};

/// A scalar compared against a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Double(f64),
    String(String),
    Bool(bool),
}

xata_client::impl_polymorphic!(
    FilterValue,
    "FilterValue",
    [Double(f64), String(String), Bool(bool)]
);

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Double(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Double(f64::from(value))
    }
}

impl TryFrom<i64> for FilterValue {
    type Error = IntegerOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        exact_double(value).map(FilterValue::Double)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// Bound of a range comparison: a number or an RFC 3339 date string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterRangeValue {
    Double(f64),
    String(String),
}

xata_client::impl_polymorphic!(
    FilterRangeValue,
    "FilterRangeValue",
    [Double(f64), String(String)]
);

impl From<f64> for FilterRangeValue {
    fn from(value: f64) -> Self {
        FilterRangeValue::Double(value)
    }
}

impl From<&str> for FilterRangeValue {
    fn from(value: &str) -> Self {
        FilterRangeValue::String(value.to_string())
    }
}

impl From<String> for FilterRangeValue {
    fn from(value: String) -> Self {
        FilterRangeValue::String(value)
    }
}

/// `$lt` / `$le` / `$gt` / `$ge` comparisons.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterRangeOp {
    #[serde(rename = "$lt", default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<FilterRangeValue>,
    #[serde(rename = "$le", default, skip_serializing_if = "Option::is_none")]
    pub le: Option<FilterRangeValue>,
    #[serde(rename = "$gt", default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<FilterRangeValue>,
    #[serde(rename = "$ge", default, skip_serializing_if = "Option::is_none")]
    pub ge: Option<FilterRangeValue>,
}

/// Operator form of a predicate, e.g. `{"$contains": "foo"}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterPredicateOp {
    #[serde(rename = "$any", default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<FilterPredicate>>,
    #[serde(rename = "$all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<FilterPredicate>>,
    #[serde(rename = "$none", default, skip_serializing_if = "Option::is_none")]
    pub none: Option<Box<FilterPredicate>>,
    #[serde(rename = "$not", default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<FilterPredicate>>,
    #[serde(rename = "$is", default, skip_serializing_if = "Option::is_none")]
    pub is: Option<FilterValue>,
    #[serde(rename = "$isNot", default, skip_serializing_if = "Option::is_none")]
    pub is_not: Option<FilterValue>,
    #[serde(rename = "$contains", default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(rename = "$iContains", default, skip_serializing_if = "Option::is_none")]
    pub i_contains: Option<String>,
    #[serde(rename = "$includes", default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<FilterValue>,
    #[serde(rename = "$startsWith", default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(rename = "$endsWith", default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(rename = "$pattern", default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "$iPattern", default, skip_serializing_if = "Option::is_none")]
    pub i_pattern: Option<String>,
}

/// Condition on one column.
///
/// A bare value means equality and a list means "any of". Range operators
/// are tried before the general operator form, so an operator map with no
/// operators set encodes as `{}` and decodes back as an empty `Range`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterPredicate {
    Value(FilterValue),
    List(Vec<FilterPredicate>),
    Range(FilterRangeOp),
    Op(FilterPredicateOp),
}

xata_client::impl_polymorphic!(
    FilterPredicate,
    "FilterPredicate",
    [
        Value(FilterValue),
        List(Vec<FilterPredicate>),
        Range(FilterRangeOp),
        Op(FilterPredicateOp),
    ]
);

impl FilterPredicate {
    pub fn is(value: impl Into<FilterValue>) -> Self {
        Self::Op(FilterPredicateOp {
            is: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn is_not(value: impl Into<FilterValue>) -> Self {
        Self::Op(FilterPredicateOp {
            is_not: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self::Op(FilterPredicateOp {
            contains: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn starts_with(value: impl Into<String>) -> Self {
        Self::Op(FilterPredicateOp {
            starts_with: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn any_of(predicates: Vec<FilterPredicate>) -> Self {
        Self::Op(FilterPredicateOp {
            any: Some(predicates),
            ..Default::default()
        })
    }

    pub fn not(predicate: FilterPredicate) -> Self {
        Self::Op(FilterPredicateOp {
            not: Some(Box::new(predicate)),
            ..Default::default()
        })
    }

    pub fn lt(value: impl Into<FilterRangeValue>) -> Self {
        Self::Range(FilterRangeOp {
            lt: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn le(value: impl Into<FilterRangeValue>) -> Self {
        Self::Range(FilterRangeOp {
            le: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn gt(value: impl Into<FilterRangeValue>) -> Self {
        Self::Range(FilterRangeOp {
            gt: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn ge(value: impl Into<FilterRangeValue>) -> Self {
        Self::Range(FilterRangeOp {
            ge: Some(value.into()),
            ..Default::default()
        })
    }

    /// Inclusive range `[low, high]`.
    pub fn between(low: impl Into<FilterRangeValue>, high: impl Into<FilterRangeValue>) -> Self {
        Self::Range(FilterRangeOp {
            ge: Some(low.into()),
            le: Some(high.into()),
            ..Default::default()
        })
    }
}

impl From<FilterValue> for FilterPredicate {
    fn from(value: FilterValue) -> Self {
        FilterPredicate::Value(value)
    }
}

macro_rules! predicate_from_value {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for FilterPredicate {
                fn from(value: $ty) -> Self {
                    FilterPredicate::Value(value.into())
                }
            }
        )+
    };
}

predicate_from_value!(&str, String, f64, i32, bool);

/// Boolean combination of column predicates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterExpression {
    #[serde(rename = "$exists", default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<String>,
    #[serde(rename = "$existsNot", default, skip_serializing_if = "Option::is_none")]
    pub exists_not: Option<String>,
    #[serde(rename = "$any", default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<FilterExpression>>,
    #[serde(rename = "$all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<FilterExpression>>,
    #[serde(rename = "$none", default, skip_serializing_if = "Option::is_none")]
    pub none: Option<Vec<FilterExpression>>,
    #[serde(rename = "$not", default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<FilterExpression>>,
    /// Column name (dotted for nested objects) to predicate.
    #[serde(flatten)]
    pub columns: BTreeMap<String, FilterPredicate>,
}

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>, predicate: impl Into<FilterPredicate>) -> Self {
        self.columns.insert(name.into(), predicate.into());
        self
    }

    pub fn exists(mut self, column: impl Into<String>) -> Self {
        self.exists = Some(column.into());
        self
    }

    pub fn exists_not(mut self, column: impl Into<String>) -> Self {
        self.exists_not = Some(column.into());
        self
    }

    /// Matches when any sub-expression matches.
    pub fn any(expressions: Vec<FilterExpression>) -> Self {
        Self {
            any: Some(expressions),
            ..Default::default()
        }
    }

    /// Matches when every sub-expression matches.
    pub fn all(expressions: Vec<FilterExpression>) -> Self {
        Self {
            all: Some(expressions),
            ..Default::default()
        }
    }

    pub fn negate(expression: FilterExpression) -> Self {
        Self {
            not: Some(Box::new(expression)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xata_client::Polymorphic;

    #[test]
    fn test_expression_encoding() {
        let filter = FilterExpression::new()
            .column("user-name", "alice")
            .column("age", FilterPredicate::between(18.0, 65.0))
            .column("tags", FilterPredicate::any_of(vec!["a".into(), "b".into()]))
            .exists("email");

        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "$exists": "email",
                "user-name": "alice",
                "age": {"$ge": 18.0, "$le": 65.0},
                "tags": {"$any": ["a", "b"]}
            })
        );
    }

    #[test]
    fn test_predicate_trial_order() {
        assert_eq!(FilterPredicate::TRIAL_ORDER, &["Value", "List", "Range", "Op"]);
        assert_eq!(FilterValue::TRIAL_ORDER, &["Double", "String", "Bool"]);
    }

    #[test]
    fn test_predicate_decoding() {
        let decode = |v: serde_json::Value| serde_json::from_value::<FilterPredicate>(v).unwrap();

        assert_eq!(decode(json!("x")), FilterPredicate::Value("x".into()));
        assert_eq!(decode(json!(3)), FilterPredicate::Value(FilterValue::Double(3.0)));
        assert_eq!(decode(json!({"$gt": 5})), FilterPredicate::gt(5.0));
        assert_eq!(decode(json!({"$contains": "ab"})), FilterPredicate::contains("ab"));
        assert_eq!(decode(json!(["a", 1])).variant(), "List");
    }

    #[test]
    fn test_empty_operator_map_decodes_as_range() {
        let empty = FilterPredicate::Op(FilterPredicateOp::default());
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));

        let decoded: FilterPredicate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(decoded, FilterPredicate::Range(FilterRangeOp::default()));
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(FilterPredicate::from(18), FilterPredicate::Value(FilterValue::Double(18.0)));
        assert_eq!(
            FilterValue::try_from(1_i64 << 53).unwrap_err(),
            IntegerOutOfRange(1 << 53)
        );
        assert_eq!(
            FilterValue::try_from(-42_i64).unwrap(),
            FilterValue::Double(-42.0)
        );
    }

    #[test]
    fn test_arrays_are_lists_not_operators() {
        let decoded: FilterPredicate = serde_json::from_value(json!([5, 6])).unwrap();
        assert_eq!(
            decoded,
            FilterPredicate::List(vec![
                FilterPredicate::Value(FilterValue::Double(5.0)),
                FilterPredicate::Value(FilterValue::Double(6.0)),
            ])
        );
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let err = serde_json::from_value::<FilterPredicate>(json!({"$near": 1})).unwrap_err();
        assert!(err.to_string().contains("FilterPredicate"));
    }

    #[test]
    fn test_expression_decoding() {
        let filter: FilterExpression = serde_json::from_value(json!({
            "$any": [{"name": "a"}, {"name": {"$startsWith": "b"}}],
            "active": true
        }))
        .unwrap();

        assert_eq!(filter.any.as_ref().unwrap().len(), 2);
        assert_eq!(filter.columns["active"], FilterPredicate::Value(true.into()));
    }
}
