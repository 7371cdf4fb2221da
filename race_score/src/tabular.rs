// Tabular scoring backend: per-(gender, event) breakpoint tables for sprint
// and middle-distance track events. Rows are (time in seconds, points),
// fastest first. Scoring caps at the fastest row, interpolates linearly
// between rows, and extrapolates past the slowest row at the last segment's
// decline rate with a hard floor of zero. All three branches floor, unlike
// the parametric backend's rounding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::event::CanonicalEvent;
use crate::{Gender, ScoreError};

/// One (time, score) anchor point in a tabular scoring curve.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Breakpoint {
    pub time_s: f64,
    pub points: i64,
}

/// Breakpoints sorted by ascending time and strictly descending points.
#[derive(Clone, Debug)]
pub struct BreakpointTable {
    rows: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Validate an already-sorted row sequence. At least two rows are
    /// required so the extrapolation slope is always defined.
    pub fn new(rows: Vec<Breakpoint>) -> Result<Self, ScoreError> {
        if rows.len() < 2 {
            return Err(ScoreError::InvalidTable(format!(
                "breakpoint table needs at least 2 rows, got {}",
                rows.len()
            )));
        }
        for pair in rows.windows(2) {
            if pair[1].time_s <= pair[0].time_s {
                return Err(ScoreError::InvalidTable(format!(
                    "breakpoint times must be strictly ascending near t={}",
                    pair[1].time_s
                )));
            }
            if pair[1].points >= pair[0].points {
                return Err(ScoreError::InvalidTable(format!(
                    "breakpoint scores must be strictly descending near t={}",
                    pair[1].time_s
                )));
            }
        }
        Ok(Self { rows })
    }

    fn from_static(rows: &[(f64, i64)]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|&(time_s, points)| Breakpoint { time_s, points })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Breakpoint] {
        &self.rows
    }

    /// Score a total elapsed time against this table.
    pub fn score(&self, total_seconds: f64) -> i64 {
        let rows = &self.rows;
        let first = rows[0];
        if total_seconds <= first.time_s {
            // Cap at the best tabulated score; no extrapolation upward.
            return first.points;
        }

        let last = rows[rows.len() - 1];
        if total_seconds >= last.time_s {
            // Project past the slowest row at the last segment's decline
            // rate; floored and never negative.
            let prev = rows[rows.len() - 2];
            let rate = (prev.points - last.points) as f64 / (last.time_s - prev.time_s);
            let projected = last.points as f64 - rate * (total_seconds - last.time_s);
            return (projected.floor() as i64).max(0);
        }

        let idx = rows.partition_point(|bp| bp.time_s <= total_seconds);
        let lo = rows[idx - 1];
        let hi = rows[idx];
        let ratio = (total_seconds - lo.time_s) / (hi.time_s - lo.time_s);
        let interpolated = lo.points as f64 - ratio * (lo.points - hi.points) as f64;
        interpolated.floor() as i64
    }
}

const MEN_60M: &[(f64, i64)] = &[
    (6.5, 1250),
    (6.75, 1100),
    (7.0, 950),
    (7.5, 760),
    (8.0, 570),
    (8.75, 360),
    (9.5, 180),
];

const MEN_100M: &[(f64, i64)] = &[
    (10.0, 1250),
    (10.5, 1080),
    (11.0, 910),
    (11.75, 730),
    (12.5, 540),
    (13.5, 350),
    (14.5, 180),
];

const MEN_200M: &[(f64, i64)] = &[
    (20.0, 1260),
    (21.0, 1090),
    (22.0, 900),
    (23.5, 710),
    (25.0, 520),
    (26.5, 330),
    (28.5, 160),
];

const MEN_200M_SH: &[(f64, i64)] = &[
    (20.5, 1240),
    (21.5, 1070),
    (22.75, 890),
    (24.0, 700),
    (25.5, 510),
    (27.25, 320),
];

const MEN_400M: &[(f64, i64)] = &[
    (44.0, 1270),
    (46.5, 1090),
    (49.0, 910),
    (52.0, 720),
    (55.5, 530),
    (59.5, 340),
    (64.0, 170),
];

const MEN_400M_SH: &[(f64, i64)] = &[
    (45.25, 1250),
    (47.75, 1070),
    (50.25, 890),
    (53.5, 700),
    (57.0, 510),
    (61.25, 320),
];

const MEN_800M: &[(f64, i64)] = &[
    (102.0, 1260),
    (108.0, 1080),
    (115.0, 900),
    (123.0, 710),
    (132.0, 520),
    (142.0, 330),
    (153.0, 160),
];

const MEN_800M_SH: &[(f64, i64)] = &[
    (104.0, 1240),
    (110.0, 1060),
    (117.0, 880),
    (125.0, 690),
    (134.0, 500),
    (144.0, 310),
];

const MEN_1500M: &[(f64, i64)] = &[
    (210.0, 1250),
    (222.0, 1080),
    (235.0, 900),
    (250.0, 710),
    (267.0, 520),
    (286.0, 330),
    (307.0, 160),
];

const MEN_1500M_SH: &[(f64, i64)] = &[
    (214.0, 1230),
    (226.0, 1060),
    (240.0, 880),
    (255.0, 690),
    (272.0, 500),
    (292.0, 310),
];

const MEN_MILE: &[(f64, i64)] = &[
    (226.0, 1250),
    (239.0, 1080),
    (253.0, 900),
    (269.0, 710),
    (287.0, 520),
    (307.0, 330),
    (330.0, 160),
];

// The indoor mile is the one single-gender event in the reference data.
const MEN_MILE_SH: &[(f64, i64)] = &[
    (230.0, 1230),
    (244.0, 1060),
    (258.0, 880),
    (274.0, 690),
    (293.0, 500),
    (313.0, 310),
];

const MEN_3000M: &[(f64, i64)] = &[
    (436.0, 1240),
    (460.0, 1070),
    (487.0, 890),
    (517.0, 700),
    (551.0, 510),
    (589.0, 320),
    (631.0, 140),
];

const MEN_3000M_SH: &[(f64, i64)] = &[
    (445.0, 1220),
    (469.0, 1050),
    (497.0, 870),
    (527.0, 680),
    (562.0, 490),
    (601.0, 300),
];

const WOMEN_60M: &[(f64, i64)] = &[
    (7.0, 1240),
    (7.5, 1080),
    (8.0, 910),
    (8.5, 730),
    (9.0, 540),
    (9.75, 350),
];

const WOMEN_100M: &[(f64, i64)] = &[
    (11.0, 1240),
    (11.5, 1070),
    (12.0, 900),
    (12.75, 720),
    (13.5, 530),
    (14.5, 340),
    (15.75, 170),
];

const WOMEN_200M: &[(f64, i64)] = &[
    (22.0, 1250),
    (23.25, 1080),
    (24.5, 900),
    (26.0, 710),
    (27.5, 520),
    (29.25, 330),
    (31.5, 160),
];

const WOMEN_200M_SH: &[(f64, i64)] = &[
    (22.75, 1230),
    (24.0, 1060),
    (25.25, 880),
    (26.75, 690),
    (28.25, 500),
    (30.25, 310),
];

const WOMEN_400M: &[(f64, i64)] = &[
    (49.25, 1260),
    (52.0, 1080),
    (55.0, 900),
    (58.5, 710),
    (62.25, 520),
    (66.75, 330),
    (72.0, 160),
];

const WOMEN_400M_SH: &[(f64, i64)] = &[
    (50.5, 1240),
    (53.5, 1060),
    (56.5, 880),
    (60.0, 690),
    (64.0, 500),
    (68.5, 310),
];

const WOMEN_800M: &[(f64, i64)] = &[
    (115.0, 1250),
    (122.0, 1080),
    (129.0, 900),
    (137.0, 710),
    (146.0, 520),
    (157.0, 330),
    (169.0, 160),
];

const WOMEN_800M_SH: &[(f64, i64)] = &[
    (117.0, 1230),
    (124.0, 1060),
    (131.0, 880),
    (140.0, 690),
    (149.0, 500),
    (160.0, 310),
];

const WOMEN_1500M: &[(f64, i64)] = &[
    (235.0, 1240),
    (248.0, 1070),
    (263.0, 890),
    (279.0, 700),
    (298.0, 510),
    (319.0, 320),
    (343.0, 140),
];

const WOMEN_1500M_SH: &[(f64, i64)] = &[
    (240.0, 1220),
    (253.0, 1050),
    (268.0, 870),
    (285.0, 680),
    (304.0, 490),
    (325.0, 300),
];

const WOMEN_MILE: &[(f64, i64)] = &[
    (253.0, 1240),
    (267.0, 1070),
    (283.0, 890),
    (300.0, 700),
    (320.0, 510),
    (343.0, 320),
];

const WOMEN_3000M: &[(f64, i64)] = &[
    (486.0, 1230),
    (513.0, 1060),
    (542.0, 880),
    (575.0, 690),
    (612.0, 500),
    (654.0, 310),
];

const WOMEN_3000M_SH: &[(f64, i64)] = &[
    (496.0, 1210),
    (523.0, 1040),
    (553.0, 860),
    (587.0, 670),
    (624.0, 480),
    (667.0, 290),
];

/// Immutable registry of breakpoint tables keyed by (gender, event).
#[derive(Clone, Debug)]
pub struct TabularTable {
    tables: HashMap<(Gender, CanonicalEvent), BreakpointTable>,
}

impl TabularTable {
    /// Embedded reference tables. Built once; never mutated after
    /// construction.
    pub fn reference() -> Self {
        let entries: [(Gender, CanonicalEvent, &[(f64, i64)]); 27] = [
            (Gender::Men, CanonicalEvent::Sprint60, MEN_60M),
            (Gender::Men, CanonicalEvent::Sprint100, MEN_100M),
            (Gender::Men, CanonicalEvent::Sprint200, MEN_200M),
            (Gender::Men, CanonicalEvent::Sprint200Short, MEN_200M_SH),
            (Gender::Men, CanonicalEvent::Lap400, MEN_400M),
            (Gender::Men, CanonicalEvent::Lap400Short, MEN_400M_SH),
            (Gender::Men, CanonicalEvent::Middle800, MEN_800M),
            (Gender::Men, CanonicalEvent::Middle800Short, MEN_800M_SH),
            (Gender::Men, CanonicalEvent::Middle1500, MEN_1500M),
            (Gender::Men, CanonicalEvent::Middle1500Short, MEN_1500M_SH),
            (Gender::Men, CanonicalEvent::Mile, MEN_MILE),
            (Gender::Men, CanonicalEvent::MileShort, MEN_MILE_SH),
            (Gender::Men, CanonicalEvent::Track3000, MEN_3000M),
            (Gender::Men, CanonicalEvent::Track3000Short, MEN_3000M_SH),
            (Gender::Women, CanonicalEvent::Sprint60, WOMEN_60M),
            (Gender::Women, CanonicalEvent::Sprint100, WOMEN_100M),
            (Gender::Women, CanonicalEvent::Sprint200, WOMEN_200M),
            (Gender::Women, CanonicalEvent::Sprint200Short, WOMEN_200M_SH),
            (Gender::Women, CanonicalEvent::Lap400, WOMEN_400M),
            (Gender::Women, CanonicalEvent::Lap400Short, WOMEN_400M_SH),
            (Gender::Women, CanonicalEvent::Middle800, WOMEN_800M),
            (Gender::Women, CanonicalEvent::Middle800Short, WOMEN_800M_SH),
            (Gender::Women, CanonicalEvent::Middle1500, WOMEN_1500M),
            (Gender::Women, CanonicalEvent::Middle1500Short, WOMEN_1500M_SH),
            (Gender::Women, CanonicalEvent::Mile, WOMEN_MILE),
            (Gender::Women, CanonicalEvent::Track3000, WOMEN_3000M),
            (Gender::Women, CanonicalEvent::Track3000Short, WOMEN_3000M_SH),
        ];

        let mut tables = HashMap::with_capacity(entries.len());
        for (gender, event, rows) in entries {
            tables.insert((gender, event), BreakpointTable::from_static(rows));
        }
        Self { tables }
    }

    /// Score a result, or `None` when no table is registered for this
    /// (gender, event) pair.
    pub fn score(&self, event: CanonicalEvent, gender: Gender, total_seconds: f64) -> Option<i64> {
        self.tables
            .get(&(gender, event))
            .map(|table| table.score(total_seconds))
    }

    pub fn get(&self, gender: Gender, event: CanonicalEvent) -> Option<&BreakpointTable> {
        self.tables.get(&(gender, event))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Gender, CanonicalEvent), &BreakpointTable)> {
        self.tables.iter()
    }

    pub(crate) fn insert(&mut self, gender: Gender, event: CanonicalEvent, table: BreakpointTable) {
        self.tables.insert((gender, event), table);
    }
}
