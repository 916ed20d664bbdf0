//! Calendar-driven lifecycle model.
//!
//! A version stream moves through a fixed sequence of phases: Full Support,
//! Maintenance, zero or more extended-update phases, End of Life. Before its
//! first date it is Pre-GA. Phases are totally ordered by "better": Full
//! Support is best, Pre-GA is worst (unreleased artifacts must never be
//! automatically reached).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use super::error::{CoreError, DatesOutOfOrder, InvalidDate};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date, `YYYY-MM-DD`, interpreted at UTC midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(time::Date);

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CoreError> {
        let month = time::Month::try_from(month).map_err(|e| InvalidDate {
            raw: format!("{year:04}-{month:02}-{day:02}"),
            reason: e.to_string(),
        })?;
        let date = time::Date::from_calendar_date(year, month, day).map_err(|e| InvalidDate {
            raw: format!("{year:04}-{month:02}-{day:02}", month = month as u8),
            reason: e.to_string(),
        })?;
        Ok(Self(date))
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let date = time::Date::parse(s, DATE_FORMAT).map_err(|_| InvalidDate {
            raw: s.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        })?;
        Ok(Self(date))
    }

    /// The instant this date begins, UTC.
    pub fn midnight_utc(self) -> OffsetDateTime {
        self.0.midnight().assume_utc()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(DATE_FORMAT) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Lifecycle phase of a version stream at some instant.
///
/// Declaration order is "better" order: earlier variants are better. The
/// derived `Ord` therefore ranks best-first; [`LifecyclePhase::compare`]
/// exposes the better-is-greater convention used by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecyclePhase {
    FullSupport,
    Maintenance,
    /// The i-th extended-update phase, 1-based.
    Extension(u32),
    EndOfLife,
    PreGA,
}

impl LifecyclePhase {
    /// The i-th extended-update phase.
    ///
    /// Panics for `i == 0`: there is no zeroth extension, and asking for one
    /// is a programmer error, not a recoverable condition.
    pub fn extension(i: u32) -> Self {
        assert!(i >= 1, "invalid lifecycle extension phase: {i}");
        LifecyclePhase::Extension(i)
    }

    /// `Greater` when `self` is strictly better than `other`.
    pub fn compare(self, other: Self) -> Ordering {
        other.cmp(&self)
    }

    /// Strictly better than `other`.
    pub fn is_better_than(self, other: Self) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Full Support" => Some(LifecyclePhase::FullSupport),
            "Maintenance" => Some(LifecyclePhase::Maintenance),
            "End of Life" => Some(LifecyclePhase::EndOfLife),
            "Pre-GA" => Some(LifecyclePhase::PreGA),
            _ => {
                let i: u32 = s.strip_prefix("EUS-")?.parse().ok()?;
                (i >= 1).then_some(LifecyclePhase::Extension(i))
            }
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::FullSupport => f.write_str("Full Support"),
            LifecyclePhase::Maintenance => f.write_str("Maintenance"),
            LifecyclePhase::Extension(i) => write!(f, "EUS-{i}"),
            LifecyclePhase::EndOfLife => f.write_str("End of Life"),
            LifecyclePhase::PreGA => f.write_str("Pre-GA"),
        }
    }
}

impl Serialize for LifecyclePhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LifecyclePhase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LifecyclePhase::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown lifecycle phase `{raw}`")))
    }
}

/// The dated phase boundaries of one version stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleDates {
    pub full_support: Date,
    pub maintenance: Date,
    #[serde(default)]
    pub extensions: Vec<Date>,
    pub eol: Date,
}

impl LifecycleDates {
    /// The sequence full support, maintenance, extensions, eol must be
    /// non-decreasing.
    pub fn validate_order(&self) -> Result<(), CoreError> {
        let mut prev: Option<Date> = None;
        for date in self.ordered() {
            if prev.is_some_and(|p| date < p) {
                return Err(DatesOutOfOrder.into());
            }
            prev = Some(date);
        }
        Ok(())
    }

    /// The phase containing `as_of`.
    pub fn phase(&self, as_of: OffsetDateTime) -> LifecyclePhase {
        if as_of < self.full_support.midnight_utc() {
            return LifecyclePhase::PreGA;
        }
        if as_of < self.maintenance.midnight_utc() {
            return LifecyclePhase::FullSupport;
        }
        if as_of > self.eol.midnight_utc() {
            return LifecyclePhase::EndOfLife;
        }
        if self.extensions.is_empty() || as_of < self.extensions[0].midnight_utc() {
            return LifecyclePhase::Maintenance;
        }
        for i in 1..self.extensions.len() {
            if as_of < self.extensions[i].midnight_utc() {
                return LifecyclePhase::extension(i as u32);
            }
        }
        LifecyclePhase::extension(self.extensions.len() as u32)
    }

    fn ordered(&self) -> impl Iterator<Item = Date> + '_ {
        [self.full_support, self.maintenance]
            .into_iter()
            .chain(self.extensions.iter().copied())
            .chain([self.eol])
    }
}
