//! Scheduling directives.
//!
//! A directive is the structured form of one free-text scheduling request.
//! It exists in two shapes:
//!
//! - [`RawDirective`]: loosely typed, exactly as the NLU collaborator
//!   returns it. Days may be words (`"周一"`), numbers may be strings,
//!   and day parts (`time_period`) have not been expanded yet.
//! - [`Directive`]: typed, produced from a normalized raw directive by
//!   [`Directive::from_normalized`]. Days are `1..=7`, periods are
//!   positive integers, and `time_period` no longer exists.
//!
//! Normalization itself lives in [`crate::temporal`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, LookupKind, Result};

/// A scalar token that may arrive as a JSON integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Int(i64),
    Text(String),
}

impl Token {
    /// Integer value, parsing numeric text.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Token::Int(n) => Some(*n),
            Token::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{n}"),
            Token::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Token {
    fn from(n: i64) -> Self {
        Token::Int(n)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Text(s.to_string())
    }
}

/// Directive as returned by the extraction step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDirective {
    /// Classification echoed by the extractor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default)]
    pub details: Vec<RawDetail>,
}

/// One detail block of a raw directive. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Vec<Token>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Vec<Token>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_period: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<Vec<Token>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_classes: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_classes: Option<Token>,
}

/// Normalized, typed directive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directive {
    pub details: Vec<DirectiveDetail>,
}

/// One normalized detail block.
///
/// Absent list fields are empty; absent limits are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveDetail {
    pub grade: Vec<String>,
    pub subject: Vec<String>,
    /// Canonical day numbers, 1 (Monday) to 7 (Sunday).
    pub day: Vec<u8>,
    /// Canonical period numbers, each within `1..=i32::MAX`.
    pub period: Vec<u32>,
    pub teacher: Vec<String>,
    /// Class numbers as written, e.g. `"6"`.
    pub class: Vec<String>,
    pub min_classes: Option<i64>,
    pub max_classes: Option<i64>,
}

impl Directive {
    /// Creates a directive from detail blocks.
    pub fn new(details: Vec<DirectiveDetail>) -> Self {
        Self { details }
    }

    /// Converts a normalized raw directive into its typed form.
    ///
    /// Fails with a lookup error if a day or period token is not canonical
    /// (i.e. [`crate::temporal::normalize_directive`] has not been applied),
    /// and with a validation error if a limit is not an integer.
    pub fn from_normalized(raw: &RawDirective) -> Result<Self> {
        let details = raw
            .details
            .iter()
            .map(DirectiveDetail::from_normalized)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { details })
    }

    /// The first detail block, which single-detail scenarios read.
    pub fn primary(&self) -> Result<&DirectiveDetail> {
        self.details
            .first()
            .ok_or_else(|| Error::validation("directive has no details"))
    }
}

impl DirectiveDetail {
    fn from_normalized(raw: &RawDetail) -> Result<Self> {
        let day = raw
            .day
            .iter()
            .flatten()
            .map(|t| match t {
                Token::Int(n @ 1..=7) => Ok(*n as u8),
                other => Err(Error::lookup(LookupKind::Day, other.to_string())),
            })
            .collect::<Result<Vec<_>>>()?;

        let period = raw
            .period
            .iter()
            .flatten()
            .map(|t| match t.as_int() {
                Some(n) if (1..=i32::MAX as i64).contains(&n) => Ok(n as u32),
                _ => Err(Error::lookup(LookupKind::Period, t.to_string())),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            grade: trimmed(raw.grade.as_deref()),
            subject: trimmed(raw.subject.as_deref()),
            day,
            period,
            teacher: trimmed(raw.teacher.as_deref()),
            class: raw
                .class
                .iter()
                .flatten()
                .map(|t| t.to_string().trim().to_string())
                .collect(),
            min_classes: limit("min_classes", raw.min_classes.as_ref())?,
            max_classes: limit("max_classes", raw.max_classes.as_ref())?,
        })
    }
}

fn trimmed(values: Option<&[String]>) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .map(|s| s.trim().to_string())
        .collect()
}

fn limit(field: &str, token: Option<&Token>) -> Result<Option<i64>> {
    match token {
        None => Ok(None),
        Some(t) => t
            .as_int()
            .map(Some)
            .ok_or_else(|| Error::validation(format!("{field} '{t}' is not an integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use serde_json::json;

    #[test]
    fn test_raw_accepts_mixed_tokens() {
        let raw = testing::raw(json!({
            "classification": "课程课时条件",
            "details": [{"grade": ["初一"], "day": ["周一", 2], "period": ["9", 9]}]
        }));
        let d = &raw.details[0];
        assert_eq!(d.day.as_ref().unwrap()[0], Token::Text("周一".into()));
        assert_eq!(d.day.as_ref().unwrap()[1], Token::Int(2));
        assert_eq!(d.period.as_ref().unwrap()[0].as_int(), Some(9));
        assert!(d.subject.is_none());
    }

    #[test]
    fn test_from_normalized() {
        let raw = testing::raw(json!({
            "details": [{
                "grade": [" 初一 "],
                "day": [1, 2],
                "period": ["9", 9],
                "class": [6, "7"],
                "max_classes": "2"
            }]
        }));
        let directive = Directive::from_normalized(&raw).unwrap();
        let d = directive.primary().unwrap();
        assert_eq!(d.grade, vec!["初一"]);
        assert_eq!(d.day, vec![1, 2]);
        assert_eq!(d.period, vec![9, 9]);
        assert_eq!(d.class, vec!["6", "7"]);
        assert_eq!(d.max_classes, Some(2));
        assert_eq!(d.min_classes, None);
    }

    #[test]
    fn test_unnormalized_day_is_rejected() {
        let raw = testing::raw(json!({"details": [{"day": ["周一"]}]}));
        let err = Directive::from_normalized(&raw).unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: LookupKind::Day, .. }));
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let raw = testing::raw(json!({"details": [{"period": [0]}]}));
        let err = Directive::from_normalized(&raw).unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: LookupKind::Period, .. }));
    }

    #[test]
    fn test_out_of_range_period_is_rejected() {
        for period in [4_294_967_295_i64, 2_147_483_648, -1] {
            let raw = testing::raw(json!({"details": [{"period": [period]}]}));
            let err = Directive::from_normalized(&raw).unwrap_err();
            assert!(
                matches!(err, Error::Lookup { kind: LookupKind::Period, .. }),
                "period {period}"
            );
        }
        let raw = testing::raw(json!({"details": [{"period": [2_147_483_647_i64]}]}));
        let d = Directive::from_normalized(&raw).unwrap();
        assert_eq!(d.details[0].period, vec![i32::MAX as u32]);
    }

    #[test]
    fn test_non_integer_limit() {
        let raw = testing::raw(json!({"details": [{"min_classes": "一"}]}));
        let err = Directive::from_normalized(&raw).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_primary_requires_details() {
        let err = Directive::default().primary().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
