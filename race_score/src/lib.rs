//! Race performance scoring engine.
//!
//! Converts a race result (distance label, elapsed time, gender, venue) into
//! a standardized points score, via either a closed-form coefficient model or
//! piecewise-linear interpolation over empirical breakpoint tables.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod event;
pub mod overrides;
pub mod parametric;
pub mod tabular;

pub use event::{list_events, resolve, Backend, CanonicalEvent, EventInfo};
pub use overrides::{load_overrides, parse_overrides, TableOverrides};
pub use parametric::{ParametricTable, PointsModel};
pub use tabular::{Breakpoint, BreakpointTable, TabularTable};

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ScoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unrecognized event label: {0}")]
    UnknownEvent(String),
    #[error("no reference data for {gender} {event}")]
    NoReferenceData {
        gender: Gender,
        event: CanonicalEvent,
    },
    #[error("invalid reference table: {0}")]
    InvalidTable(String),
    #[error("failed to load table overrides: {0}")]
    OverrideLoad(String),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub fn key(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "men" => Some(Gender::Men),
            "women" => Some(Gender::Women),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Venue {
    Indoor,
    Outdoor,
    RoadOrUnspecified,
}

impl Default for Venue {
    fn default() -> Self {
        Venue::RoadOrUnspecified
    }
}

/// One race result to score. A transient value type: no identity, no
/// persistence, consumed within a single call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RaceResult {
    pub distance_label: String,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub gender: Gender,
    pub venue: Venue,
}

impl RaceResult {
    pub fn total_seconds(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }
}

/// Parse a human-entered time token into (hours, minutes, seconds).
///
/// Accepts `h:mm:ss`, `mm:ss`, or a bare seconds count. Colon forms are
/// taken literally (out-of-range components are left for validation to
/// reject); a bare seconds count is split into components.
pub fn parse_time_parts(token: &str) -> Option<(u32, u32, u32)> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let fields: Vec<&str> = token.split(':').collect();
    match fields.as_slice() {
        [secs] => {
            let total: u64 = secs.parse().ok()?;
            Some((
                (total / 3600) as u32,
                ((total % 3600) / 60) as u32,
                (total % 60) as u32,
            ))
        }
        [mins, secs] => Some((0, mins.parse().ok()?, secs.parse().ok()?)),
        [hours, mins, secs] => Some((hours.parse().ok()?, mins.parse().ok()?, secs.parse().ok()?)),
        _ => None,
    }
}

/// Immutable scoring registry: the parametric coefficient models plus the
/// tabular breakpoint tables. Built once, then only read; concurrent callers
/// share one instance without locking.
#[derive(Clone, Debug)]
pub struct ScoreTables {
    parametric: ParametricTable,
    tabular: TabularTable,
}

impl ScoreTables {
    /// The embedded reference data.
    pub fn reference() -> Self {
        Self {
            parametric: ParametricTable::reference(),
            tabular: TabularTable::reference(),
        }
    }

    /// Process-wide shared instance, initialized on first use and frozen.
    pub fn shared() -> &'static ScoreTables {
        static TABLES: OnceLock<ScoreTables> = OnceLock::new();
        TABLES.get_or_init(ScoreTables::reference)
    }

    /// Merge a validated override set over this registry. Consumes and
    /// returns the registry; a frozen instance is never mutated in place.
    pub fn with_overrides(mut self, overrides: &TableOverrides) -> Self {
        for ((gender, event), model) in &overrides.parametric {
            self.parametric.insert(*gender, *event, *model);
        }
        for ((gender, event), table) in &overrides.tabular {
            self.tabular.insert(*gender, *event, table.clone());
        }
        self
    }

    pub fn parametric(&self) -> &ParametricTable {
        &self.parametric
    }

    pub fn tabular(&self) -> &TabularTable {
        &self.tabular
    }

    /// Score one race result: validate, resolve the event, dispatch to the
    /// backend that owns it.
    pub fn score(&self, result: &RaceResult) -> Result<i64, ScoreError> {
        if result.distance_label.trim().is_empty() {
            return Err(ScoreError::InvalidInput("empty distance label".to_string()));
        }
        if result.minutes >= 60 || result.seconds >= 60 {
            return Err(ScoreError::InvalidInput(format!(
                "time components out of range: {}:{:02}:{:02}",
                result.hours, result.minutes, result.seconds
            )));
        }

        let event = event::resolve(&result.distance_label, result.venue)
            .ok_or_else(|| ScoreError::UnknownEvent(result.distance_label.clone()))?;

        let total_seconds = result.total_seconds() as f64;
        let points = match event.backend() {
            Backend::Parametric => self.parametric.score(event, result.gender, total_seconds),
            Backend::Tabular => self.tabular.score(event, result.gender, total_seconds),
        };
        points.ok_or(ScoreError::NoReferenceData {
            gender: result.gender,
            event,
        })
    }
}

/// Score one race result against the shared reference tables.
pub fn compute_points(result: &RaceResult) -> Result<i64, ScoreError> {
    ScoreTables::shared().score(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str, h: u32, m: u32, s: u32, gender: Gender, venue: Venue) -> RaceResult {
        RaceResult {
            distance_label: label.to_string(),
            hours: h,
            minutes: m,
            seconds: s,
            gender,
            venue,
        }
    }

    #[test]
    fn golden_5k_in_twenty_minutes() {
        let run = result("5K", 0, 20, 0, Gender::Men, Venue::Outdoor);
        assert_eq!(compute_points(&run), Ok(585));
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let run = result("Media maratón", 1, 25, 30, Gender::Women, Venue::RoadOrUnspecified);
        let first = compute_points(&run);
        let second = compute_points(&run);
        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn tabular_events_dispatch_by_venue() {
        // 24.0s sits exactly on a breakpoint of the men's indoor 200m table.
        let indoor = result("200m", 0, 0, 24, Gender::Men, Venue::Indoor);
        assert_eq!(compute_points(&indoor), Ok(700));
        // Outdoors the same time scores against the outdoor table.
        let outdoor = result("200m", 0, 0, 24, Gender::Men, Venue::Outdoor);
        assert_eq!(compute_points(&outdoor), Ok(646));
    }

    #[test]
    fn zero_time_caps_at_the_best_tabulated_score() {
        let run = result("100m", 0, 0, 0, Gender::Men, Venue::Outdoor);
        assert_eq!(compute_points(&run), Ok(1250));
    }

    #[test]
    fn empty_label_is_invalid_input() {
        let run = result("", 0, 20, 0, Gender::Men, Venue::Outdoor);
        assert!(matches!(
            compute_points(&run),
            Err(ScoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn out_of_range_time_components_are_invalid_input() {
        let minutes = result("5K", 0, 60, 0, Gender::Men, Venue::Outdoor);
        assert!(matches!(
            compute_points(&minutes),
            Err(ScoreError::InvalidInput(_))
        ));
        let seconds = result("5K", 0, 19, 75, Gender::Men, Venue::Outdoor);
        assert!(matches!(
            compute_points(&seconds),
            Err(ScoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn unknown_distance_is_not_a_silent_zero() {
        let run = result("Triatlón", 0, 59, 59, Gender::Men, Venue::Outdoor);
        assert_eq!(
            compute_points(&run),
            Err(ScoreError::UnknownEvent("Triatlón".to_string()))
        );
    }

    #[test]
    fn gender_gap_reports_no_reference_data() {
        // The indoor mile ships men-only; the women's query must fail with
        // a reason distinct from an unknown label.
        let run = result("Milla", 0, 4, 45, Gender::Women, Venue::Indoor);
        assert_eq!(
            compute_points(&run),
            Err(ScoreError::NoReferenceData {
                gender: Gender::Women,
                event: CanonicalEvent::MileShort,
            })
        );
        let men = result("Milla", 0, 4, 45, Gender::Men, Venue::Indoor);
        assert!(compute_points(&men).is_ok());
    }

    #[test]
    fn failure_reasons_stay_distinguishable() {
        let invalid = compute_points(&result("5K", 0, 61, 0, Gender::Men, Venue::Outdoor));
        let unknown = compute_points(&result("Triatlón", 0, 30, 0, Gender::Men, Venue::Outdoor));
        let no_data = compute_points(&result("Milla", 0, 5, 0, Gender::Women, Venue::Indoor));
        assert!(matches!(invalid, Err(ScoreError::InvalidInput(_))));
        assert!(matches!(unknown, Err(ScoreError::UnknownEvent(_))));
        assert!(matches!(no_data, Err(ScoreError::NoReferenceData { .. })));
    }

    #[test]
    fn total_seconds_adds_components() {
        let run = result("5K", 1, 2, 3, Gender::Men, Venue::Outdoor);
        assert_eq!(run.total_seconds(), 3723);
    }

    #[test]
    fn time_tokens_parse_into_components() {
        assert_eq!(parse_time_parts("1:05:30"), Some((1, 5, 30)));
        assert_eq!(parse_time_parts("20:00"), Some((0, 20, 0)));
        assert_eq!(parse_time_parts("1200"), Some((0, 20, 0)));
        assert_eq!(parse_time_parts(" 45 "), Some((0, 0, 45)));
        // Colon forms stay literal; validation rejects them later.
        assert_eq!(parse_time_parts("90:00"), Some((0, 90, 0)));
        assert_eq!(parse_time_parts(""), None);
        assert_eq!(parse_time_parts("abc"), None);
        assert_eq!(parse_time_parts("1:2:3:4"), None);
    }

    #[test]
    fn shared_tables_are_one_instance() {
        let a = ScoreTables::shared() as *const ScoreTables;
        let b = ScoreTables::shared() as *const ScoreTables;
        assert_eq!(a, b);
    }
}
