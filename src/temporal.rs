//! Temporal vocabulary normalization.
//!
//! Maps the day and day-part words that appear in scheduling requests onto
//! canonical numbers:
//!
//! | Input | Output |
//! |-------|--------|
//! | `周一` / `星期一` / `一` / `1` | day `1` |
//! | ... | ... |
//! | `周日` / `星期日` / `日` / `天` / `7` | day `7` |
//! | `上午` / `早上` | periods `1..=4` |
//! | `下午` | periods `6..=9` |
//! | `晚上` | periods `10..=12` |
//! | `全天` / `整天` / `一整天` | periods `1..=12` |
//!
//! Period 5 (midday) belongs to no day part.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::{Error, LookupKind, Result};
use crate::models::{RawDetail, RawDirective, Token};

const MORNING: &[u32] = &[1, 2, 3, 4];
const AFTERNOON: &[u32] = &[6, 7, 8, 9];
const EVENING: &[u32] = &[10, 11, 12];
const FULL_DAY: &[u32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// Canonical day number (1 = Monday .. 7 = Sunday) of a day token.
///
/// Surrounding whitespace is ignored; anything else must match exactly.
pub fn day_of(token: &str) -> Result<u8> {
    let day = match token.trim() {
        "周一" | "星期一" | "1" | "一" => 1,
        "周二" | "星期二" | "2" | "二" => 2,
        "周三" | "星期三" | "3" | "三" => 3,
        "周四" | "星期四" | "4" | "四" => 4,
        "周五" | "星期五" | "5" | "五" => 5,
        "周六" | "星期六" | "6" | "六" => 6,
        "周日" | "星期日" | "7" | "日" | "天" => 7,
        _ => return Err(Error::lookup(LookupKind::Day, token)),
    };
    Ok(day)
}

/// Period numbers covered by a day-part token, in ascending order.
pub fn periods_of(token: &str) -> Result<&'static [u32]> {
    match token.trim() {
        "上午" | "早上" => Ok(MORNING),
        "下午" => Ok(AFTERNOON),
        "晚上" => Ok(EVENING),
        "全天" | "整天" | "一整天" => Ok(FULL_DAY),
        _ => Err(Error::lookup(LookupKind::Period, token)),
    }
}

/// Union of the periods of several day-part tokens, deduplicated.
///
/// The result is sorted ascending; callers must not rely on any other order.
pub fn expand_day_parts<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u32>> {
    let mut periods = BTreeSet::new();
    for token in tokens {
        periods.extend(periods_of(token.as_ref())?.iter().copied());
    }
    Ok(periods.into_iter().collect())
}

/// Normalizes every detail block of a raw directive in place.
///
/// - `day` tokens become canonical day numbers.
/// - If `period` is absent or empty, `time_period` tokens are expanded into
///   `period`. `time_period` is always removed.
/// - Period tokens that are day-part words are expanded in place; numeric
///   tokens are kept in order, duplicates included (they pair with days).
///
/// Idempotent: a normalized directive is left unchanged.
pub fn normalize_directive(directive: &mut RawDirective) -> Result<()> {
    for detail in &mut directive.details {
        normalize_detail(detail)?;
    }
    Ok(())
}

fn normalize_detail(detail: &mut RawDetail) -> Result<()> {
    if let Some(days) = detail.day.as_mut() {
        for token in days.iter_mut() {
            let day = day_of(&token.to_string())?;
            *token = Token::Int(day as i64);
        }
    }

    let time_period = detail.time_period.take();
    let period_missing = detail.period.as_ref().map_or(true, |p| p.is_empty());
    if period_missing {
        if let Some(parts) = time_period {
            let periods = expand_day_parts(&parts)?;
            trace!(?parts, ?periods, "expanded day parts");
            detail.period = Some(periods.into_iter().map(|p| Token::Int(p as i64)).collect());
        }
    }

    if let Some(periods) = detail.period.as_mut() {
        let mut canonical = Vec::with_capacity(periods.len());
        for token in periods.iter() {
            match token.as_int() {
                Some(n) => canonical.push(Token::Int(n)),
                None => canonical.extend(
                    periods_of(&token.to_string())?
                        .iter()
                        .map(|&p| Token::Int(p as i64)),
                ),
            }
        }
        *periods = canonical;
    }

    Ok(())
}
