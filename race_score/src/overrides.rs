// Optional JSON overrides for the embedded reference data. A deployment can
// replace or extend coefficient entries and breakpoint tables without a
// rebuild; override rows are validated with the same invariants as the
// reference tables and the source bytes are fingerprinted for provenance.

use std::fs;
use std::path::Path;

use ordered_float::OrderedFloat;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::event::{Backend, CanonicalEvent};
use crate::parametric::PointsModel;
use crate::tabular::{Breakpoint, BreakpointTable};
use crate::{Gender, ScoreError};

#[derive(Debug, Deserialize)]
struct OverrideDoc {
    #[serde(default)]
    parametric: Vec<ParametricRow>,
    #[serde(default)]
    tabular: Vec<TabularRow>,
}

#[derive(Debug, Deserialize)]
struct ParametricRow {
    event: String,
    gender: String,
    /// `[a, b]` for a linear model, `[a, b, c]` for a quadratic one.
    coefficients: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct TabularRow {
    event: String,
    gender: String,
    /// `[time_seconds, points]` pairs; accepted in any order.
    breakpoints: Vec<(f64, i64)>,
}

/// Parsed, validated override set ready to merge into `ScoreTables`.
#[derive(Clone, Debug)]
pub struct TableOverrides {
    /// SHA-256 of the override document bytes.
    pub source_hash: String,
    pub(crate) parametric: Vec<((Gender, CanonicalEvent), PointsModel)>,
    pub(crate) tabular: Vec<((Gender, CanonicalEvent), BreakpointTable)>,
}

impl TableOverrides {
    pub fn is_empty(&self) -> bool {
        self.parametric.is_empty() && self.tabular.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parametric.len() + self.tabular.len()
    }
}

/// Read and parse an override document from disk.
pub fn load_overrides(path: &Path) -> Result<TableOverrides, ScoreError> {
    let bytes = fs::read(path)
        .map_err(|e| ScoreError::OverrideLoad(format!("{}: {}", path.display(), e)))?;
    parse_overrides(&bytes)
}

/// Parse an override document from raw bytes.
pub fn parse_overrides(bytes: &[u8]) -> Result<TableOverrides, ScoreError> {
    let doc: OverrideDoc =
        serde_json::from_slice(bytes).map_err(|e| ScoreError::OverrideLoad(e.to_string()))?;

    let mut parametric = Vec::with_capacity(doc.parametric.len());
    for row in &doc.parametric {
        let key = resolve_row_key(&row.event, &row.gender, Backend::Parametric)?;
        let model = PointsModel::from_coefficients(&row.coefficients).ok_or_else(|| {
            ScoreError::OverrideLoad(format!(
                "expected 2 or 3 coefficients for {}, got {}",
                row.event,
                row.coefficients.len()
            ))
        })?;
        parametric.push((key, model));
    }

    let mut tabular = Vec::with_capacity(doc.tabular.len());
    for row in &doc.tabular {
        let key = resolve_row_key(&row.event, &row.gender, Backend::Tabular)?;
        let mut rows: Vec<Breakpoint> = row
            .breakpoints
            .iter()
            .map(|&(time_s, points)| Breakpoint { time_s, points })
            .collect();
        rows.sort_by_key(|bp| OrderedFloat(bp.time_s));
        tabular.push((key, BreakpointTable::new(rows)?));
    }

    Ok(TableOverrides {
        source_hash: sha256_hex(bytes),
        parametric,
        tabular,
    })
}

fn resolve_row_key(
    event: &str,
    gender: &str,
    expected: Backend,
) -> Result<(Gender, CanonicalEvent), ScoreError> {
    let event = CanonicalEvent::from_key(event)
        .ok_or_else(|| ScoreError::OverrideLoad(format!("unknown canonical event key: {event}")))?;
    if event.backend() != expected {
        return Err(ScoreError::OverrideLoad(format!(
            "{} is owned by the {:?} backend",
            event,
            event.backend()
        )));
    }
    let gender = Gender::from_key(gender)
        .ok_or_else(|| ScoreError::OverrideLoad(format!("unknown gender key: {gender}")))?;
    Ok((gender, event))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        use std::fmt::Write;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
