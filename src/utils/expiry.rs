//! Expiry computation for creation requests.
//!
//! A request expresses expiry intent one of three ways: an absolute local
//! timestamp plus an IANA timezone, a relative `{count, unit}` duration, or
//! nothing at all. This module resolves the intent to an absolute UTC
//! instant and enforces the permitted window.
//!
//! The window floor is one hour from now; the ceiling is three *calendar*
//! months from now (`now + Months(3)`), so "3 months" is accepted on any
//! creation date regardless of the month lengths it spans. Both bounds are
//! inclusive.

use crate::error::AppError;
use chrono::{DateTime, Duration, LocalResult, Months, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Units accepted for relative expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryUnit {
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

/// A duration from creation time, e.g. `{count: 2, unit: "days"}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RelativeExpiry {
    pub count: u32,
    pub unit: ExpiryUnit,
}

/// A creation request's expiry intent.
#[derive(Debug, Clone, Default)]
pub enum ExpirySpec {
    /// The link never expires.
    #[default]
    None,
    /// Naive wall-clock timestamp interpreted in the named IANA zone.
    Absolute { local: String, timezone: String },
    /// Duration from now, with calendar semantics for months and years.
    Relative(RelativeExpiry),
}

impl ExpirySpec {
    /// Assembles the spec from the request's optional fields.
    ///
    /// A missing timezone defaults to UTC. Supplying both an absolute
    /// timestamp and a relative duration is ambiguous and rejected.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidExpiry`] when both forms are present.
    pub fn from_parts(
        expires_at: Option<String>,
        timezone: Option<String>,
        relative: Option<RelativeExpiry>,
    ) -> Result<Self, AppError> {
        match (expires_at, relative) {
            (Some(_), Some(_)) => Err(AppError::InvalidExpiry {
                reason: "provide either an absolute expiry or a relative one, not both"
                    .to_string(),
            }),
            (Some(local), None) => Ok(Self::Absolute {
                local,
                timezone: timezone.unwrap_or_else(|| "UTC".to_string()),
            }),
            (None, Some(rel)) => Ok(Self::Relative(rel)),
            (None, None) => Ok(Self::None),
        }
    }
}

/// Resolves an expiry spec against `now`.
///
/// Returns `Ok(None)` when no expiry was requested.
///
/// # Errors
///
/// - [`AppError::InvalidExpiry`] — unparseable timestamp, unknown timezone,
///   or an instant outside the representable range.
/// - [`AppError::ExpiryNotFuture`] — resolved instant not strictly after
///   `now`.
/// - [`AppError::ExpiryOutOfBounds`] — resolved instant outside
///   `[now + 1h, now + 3 months]`.
pub fn compute_expiry(
    spec: &ExpirySpec,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let target = match spec {
        ExpirySpec::None => return Ok(None),
        ExpirySpec::Absolute { local, timezone } => {
            let tz: Tz = timezone.parse().map_err(|_| AppError::InvalidExpiry {
                reason: format!("unknown timezone '{timezone}'"),
            })?;
            let naive = parse_local_timestamp(local)?;
            resolve_in_zone(tz, naive).ok_or_else(|| AppError::InvalidExpiry {
                reason: format!("'{local}' cannot be resolved in '{timezone}'"),
            })?
        }
        ExpirySpec::Relative(rel) => add_relative(now, rel)?,
    };

    if target <= now {
        return Err(AppError::ExpiryNotFuture);
    }

    let floor = now + Duration::hours(1);
    let ceiling = now
        .checked_add_months(Months::new(3))
        .ok_or_else(overflow_error)?;
    if target < floor || target > ceiling {
        return Err(AppError::ExpiryOutOfBounds);
    }

    Ok(Some(target))
}

/// Parses a naive wall-clock timestamp in the accepted formats.
fn parse_local_timestamp(input: &str) -> Result<NaiveDateTime, AppError> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input.trim(), fmt).ok())
        .ok_or_else(|| AppError::InvalidExpiry {
            reason: format!("'{input}' is not a valid timestamp"),
        })
}

/// Maps a naive wall-clock time in `tz` to a UTC instant.
///
/// The offset is resolved at the target instant, not the current one, so a
/// DST transition between now and the target is accounted for. Times that
/// fall in a forward-transition gap are shifted through the gap and
/// compensated, which applies the post-transition offset; ambiguous
/// (fall-back) times resolve to the earlier instant.
fn resolve_in_zone(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()?;
            Some(shifted.with_timezone(&Utc) - Duration::hours(1))
        }
    }
}

/// Calendar-aware addition: `now + 1 month` from Jan 31 lands on the last
/// valid day of February, never an invalid date.
fn add_relative(now: DateTime<Utc>, rel: &RelativeExpiry) -> Result<DateTime<Utc>, AppError> {
    let count = rel.count;
    let target = match rel.unit {
        ExpiryUnit::Minutes => now.checked_add_signed(Duration::minutes(i64::from(count))),
        ExpiryUnit::Hours => now.checked_add_signed(Duration::hours(i64::from(count))),
        ExpiryUnit::Days => now.checked_add_signed(Duration::days(i64::from(count))),
        ExpiryUnit::Months => now.checked_add_months(Months::new(count)),
        ExpiryUnit::Years => count
            .checked_mul(12)
            .and_then(|months| now.checked_add_months(Months::new(months))),
    };

    target.ok_or_else(overflow_error)
}

fn overflow_error() -> AppError {
    AppError::InvalidExpiry {
        reason: "expiry is outside the representable time range".to_string(),
    }
}
