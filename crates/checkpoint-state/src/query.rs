//! # Crossing Queries
//!
//! [`CrossingFilter`] narrows the crossing listing; [`TrafficQuery`] answers
//! "which road crossings went from country A to country B in this window".
//! Both are pure predicates over [`CrossingRecord`]; the registry supplies
//! the records and the toll countries.

use checkpoint_core::{CountryCode, PassengerKind, TollOfficeId};
use chrono::{DateTime, Duration, Utc};

use crate::crossing::CrossingRecord;
use crate::error::WorkflowError;

/// Conjunctive filter over registered crossings. Omitted bounds impose no
/// constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossingFilter {
    /// Only crossings whose exit was authorized.
    pub validated_only: bool,
    /// Inclusive lower bound on entry time.
    pub entry_time_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on entry time.
    pub entry_time_to: Option<DateTime<Utc>>,
    /// Passenger type discriminant.
    pub passenger_kind: Option<PassengerKind>,
    /// Entry or exit toll.
    pub toll_id: Option<TollOfficeId>,
    /// Inclusive lower bound on passenger count.
    pub passenger_count_min: Option<u32>,
    /// Inclusive upper bound on passenger count.
    pub passenger_count_max: Option<u32>,
}

impl Default for CrossingFilter {
    fn default() -> Self {
        Self {
            validated_only: true,
            entry_time_from: None,
            entry_time_to: None,
            passenger_kind: None,
            toll_id: None,
            passenger_count_min: None,
            passenger_count_max: None,
        }
    }
}

impl CrossingFilter {
    /// Whether `record` passes every provided constraint. Unregistered
    /// crossings never match.
    pub fn matches(&self, record: &CrossingRecord) -> bool {
        let Some(entry_time) = record.entry_time.filter(|_| record.is_registered()) else {
            return false;
        };
        if self.validated_only && !record.is_valid() {
            return false;
        }
        if self.entry_time_from.is_some_and(|from| entry_time < from) {
            return false;
        }
        if self.entry_time_to.is_some_and(|to| entry_time > to) {
            return false;
        }
        if self
            .passenger_kind
            .is_some_and(|kind| record.passenger_type.kind() != kind)
        {
            return false;
        }
        if self.toll_id.is_some_and(|toll| !record.touches_toll(toll)) {
            return false;
        }
        if self
            .passenger_count_min
            .is_some_and(|min| record.passenger_count < min)
        {
            return false;
        }
        if self
            .passenger_count_max
            .is_some_and(|max| record.passenger_count > max)
        {
            return false;
        }
        true
    }
}

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Inclusive end.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Whether `t` lies inside the window.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

/// How far back, in seconds, the traffic window reaches when no start is given.
pub const DEFAULT_LOOKBACK_SECS: i64 = 60;

/// Validated request for road traffic between two countries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficQuery {
    /// Country of the entry toll.
    pub from: CountryCode,
    /// Country of the exit toll.
    pub to: CountryCode,
    /// Window start.
    pub start: Option<DateTime<Utc>>,
    /// Window end.
    pub end: Option<DateTime<Utc>>,
}

impl TrafficQuery {
    /// Validate raw query parameters.
    ///
    /// Both countries are required two-letter codes; an end requires a
    /// start; the end may not precede the start.
    pub fn new(
        from: Option<&str>,
        to: Option<&str>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, WorkflowError> {
        let from = from
            .ok_or_else(|| WorkflowError::InvalidRequest("`from` country is required".into()))?;
        let to =
            to.ok_or_else(|| WorkflowError::InvalidRequest("`to` country is required".into()))?;
        let from = CountryCode::new(from)?;
        let to = CountryCode::new(to)?;
        match (start, end) {
            (None, Some(_)) => {
                return Err(WorkflowError::InvalidRequest(
                    "`end` requires `start`".into(),
                ))
            }
            (Some(s), Some(e)) if e < s => {
                return Err(WorkflowError::InvalidRequest(
                    "`end` precedes `start`".into(),
                ))
            }
            _ => {}
        }
        Ok(Self {
            from,
            to,
            start,
            end,
        })
    }

    /// Resolve the window against `now`: `[start or now - 1min, end or now]`.
    pub fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow {
            start: self
                .start
                .unwrap_or(now - Duration::seconds(DEFAULT_LOOKBACK_SECS)),
            end: self.end.unwrap_or(now),
        }
    }

    /// Whether `record`, whose tolls lie in `entry_country` and
    /// `exit_country`, is road traffic in this direction with entry or exit
    /// inside `window`.
    pub fn matches(
        &self,
        record: &CrossingRecord,
        entry_country: Option<&CountryCode>,
        exit_country: Option<&CountryCode>,
        window: &TimeWindow,
    ) -> bool {
        if !record.transport.is_road() || !record.is_registered() {
            return false;
        }
        if entry_country != Some(&self.from) || exit_country != Some(&self.to) {
            return false;
        }
        record.entry_time.is_some_and(|t| window.contains(t))
            || record.exit_time.is_some_and(|t| window.contains(t))
    }
}
