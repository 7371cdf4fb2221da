// Parametric scoring backend: one closed-form coefficient model per
// (gender, event). Road and long-track events live here.

use std::collections::HashMap;

use crate::event::CanonicalEvent;
use crate::Gender;

/// Closed-form points model evaluated at total elapsed seconds.
///
/// The reference tables carry three coefficients for timed events and two
/// for the handful of field events scored linearly; both shapes are kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointsModel {
    Quadratic { a: f64, b: f64, c: f64 },
    Linear { a: f64, b: f64 },
}

impl PointsModel {
    pub fn evaluate(&self, total_seconds: f64) -> f64 {
        match self {
            PointsModel::Quadratic { a, b, c } => {
                a * total_seconds * total_seconds + b * total_seconds + c
            }
            PointsModel::Linear { a, b } => a * total_seconds + b,
        }
    }

    /// Round-half-away-from-zero to the nearest integer. No zero clamp: a
    /// pathological time can evaluate below zero and is reported as-is.
    pub fn score(&self, total_seconds: f64) -> i64 {
        self.evaluate(total_seconds).round() as i64
    }

    /// Build a model from a raw coefficient row: `[a, b]` is linear,
    /// `[a, b, c]` quadratic. Any other arity is rejected.
    pub fn from_coefficients(coefficients: &[f64]) -> Option<Self> {
        match *coefficients {
            [a, b] => Some(PointsModel::Linear { a, b }),
            [a, b, c] => Some(PointsModel::Quadratic { a, b, c }),
            _ => None,
        }
    }
}

/// Immutable registry of coefficient models keyed by (gender, event).
#[derive(Clone, Debug)]
pub struct ParametricTable {
    models: HashMap<(Gender, CanonicalEvent), PointsModel>,
}

impl ParametricTable {
    /// Embedded reference coefficients. Built once; never mutated after
    /// construction.
    pub fn reference() -> Self {
        let entries = [
            (
                Gender::Men,
                CanonicalEvent::Track5000,
                PointsModel::Quadratic {
                    a: 0.00026,
                    b: -1.404,
                    c: 1895.4,
                },
            ),
            (
                Gender::Men,
                CanonicalEvent::Track10000,
                PointsModel::Quadratic {
                    a: 0.00007,
                    b: -0.756,
                    c: 2041.2,
                },
            ),
            (
                Gender::Men,
                CanonicalEvent::Road10K,
                PointsModel::Quadratic {
                    a: 0.000069,
                    b: -0.7452,
                    c: 2012.04,
                },
            ),
            (
                Gender::Men,
                CanonicalEvent::HalfMarathon,
                PointsModel::Quadratic {
                    a: 0.0000188,
                    b: -0.40608,
                    c: 2192.832,
                },
            ),
            (
                Gender::Men,
                CanonicalEvent::Marathon,
                PointsModel::Quadratic {
                    a: 0.0000048,
                    b: -0.20736,
                    c: 2239.488,
                },
            ),
            (
                Gender::Women,
                CanonicalEvent::Track5000,
                PointsModel::Quadratic {
                    a: 0.00029,
                    b: -1.566,
                    c: 2114.1,
                },
            ),
            (
                Gender::Women,
                CanonicalEvent::Track10000,
                PointsModel::Quadratic {
                    a: 0.000076,
                    b: -0.8208,
                    c: 2216.16,
                },
            ),
            (
                Gender::Women,
                CanonicalEvent::Road10K,
                PointsModel::Quadratic {
                    a: 0.000075,
                    b: -0.81,
                    c: 2187.0,
                },
            ),
            (
                Gender::Women,
                CanonicalEvent::HalfMarathon,
                PointsModel::Quadratic {
                    a: 0.00002,
                    b: -0.432,
                    c: 2332.8,
                },
            ),
            (
                Gender::Women,
                CanonicalEvent::Marathon,
                PointsModel::Quadratic {
                    a: 0.0000055,
                    b: -0.2376,
                    c: 2566.08,
                },
            ),
        ];

        let mut models = HashMap::with_capacity(entries.len());
        for (gender, event, model) in entries {
            models.insert((gender, event), model);
        }
        Self { models }
    }

    /// Score a result, or `None` when no coefficients are registered for
    /// this (gender, event) pair.
    pub fn score(&self, event: CanonicalEvent, gender: Gender, total_seconds: f64) -> Option<i64> {
        self.models
            .get(&(gender, event))
            .map(|model| model.score(total_seconds))
    }

    pub fn get(&self, gender: Gender, event: CanonicalEvent) -> Option<&PointsModel> {
        self.models.get(&(gender, event))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Gender, CanonicalEvent), &PointsModel)> {
        self.models.iter()
    }

    pub(crate) fn insert(&mut self, gender: Gender, event: CanonicalEvent, model: PointsModel) {
        self.models.insert((gender, event), model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn men_5000m_golden_values() {
        let table = ParametricTable::reference();
        // 20:00 on the men's 5000m coefficients.
        assert_eq!(
            table.score(CanonicalEvent::Track5000, Gender::Men, 1200.0),
            Some(585)
        );
        // 13:00, elite territory.
        assert_eq!(
            table.score(CanonicalEvent::Track5000, Gender::Men, 780.0),
            Some(958)
        );
    }

    #[test]
    fn women_road_10k_golden_value() {
        let table = ParametricTable::reference();
        // 40:00 evaluates exactly on the embedded coefficients.
        assert_eq!(
            table.score(CanonicalEvent::Road10K, Gender::Women, 2400.0),
            Some(675)
        );
    }

    #[test]
    fn faster_times_score_higher() {
        let table = ParametricTable::reference();
        let fast = table
            .score(CanonicalEvent::Marathon, Gender::Men, 8100.0)
            .unwrap();
        let slow = table
            .score(CanonicalEvent::Marathon, Gender::Men, 12600.0)
            .unwrap();
        assert!(fast > slow);
    }

    #[test]
    fn missing_event_or_gender_is_none() {
        let table = ParametricTable::reference();
        // Sprints belong to the tabular backend; no coefficients here.
        assert_eq!(table.score(CanonicalEvent::Sprint100, Gender::Men, 11.0), None);
        assert_eq!(
            table.score(CanonicalEvent::Sprint200Short, Gender::Women, 24.0),
            None
        );
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let model = PointsModel::Linear { a: 1.0, b: 0.5 };
        assert_eq!(model.score(2.0), 3);
        let negative = PointsModel::Linear { a: -1.0, b: -0.5 };
        assert_eq!(negative.score(2.0), -3);
    }

    #[test]
    fn linear_model_is_unclamped() {
        let model = PointsModel::Linear { a: -0.85, b: 1400.0 };
        assert_eq!(model.score(400.0), 1060);
        // Far beyond the scoring range the raw value goes negative and is
        // reported without clamping.
        assert_eq!(model.score(2000.0), -300);
    }

    #[test]
    fn coefficient_rows_map_to_model_shapes() {
        assert_eq!(
            PointsModel::from_coefficients(&[1.5, -2.0]),
            Some(PointsModel::Linear { a: 1.5, b: -2.0 })
        );
        assert_eq!(
            PointsModel::from_coefficients(&[0.1, -2.0, 300.0]),
            Some(PointsModel::Quadratic {
                a: 0.1,
                b: -2.0,
                c: 300.0
            })
        );
        assert_eq!(PointsModel::from_coefficients(&[1.0]), None);
        assert_eq!(PointsModel::from_coefficients(&[1.0, 2.0, 3.0, 4.0]), None);
    }

    #[test]
    fn every_reference_entry_declines_over_its_scoring_range() {
        let table = ParametricTable::reference();
        for (&(gender, event), model) in table.iter() {
            let PointsModel::Quadratic { a, b, .. } = *model else {
                panic!("reference data is quadratic only");
            };
            let vertex = -b / (2.0 * a);
            assert!(vertex > 0.0, "{gender} {event} has a non-positive vertex");
            let fast = model.score(0.4 * vertex);
            let slow = model.score(0.8 * vertex);
            assert!(
                fast > slow,
                "{gender} {event} does not decline between samples"
            );
        }
    }

    proptest! {
        #[test]
        fn men_5000m_is_monotone_in_the_scoring_range(
            t in 700.0f64..2200.0,
            delta in 1.0f64..500.0,
        ) {
            let table = ParametricTable::reference();
            let fast = table.score(CanonicalEvent::Track5000, Gender::Men, t).unwrap();
            let slow = table
                .score(CanonicalEvent::Track5000, Gender::Men, t + delta)
                .unwrap();
            prop_assert!(fast >= slow);
        }
    }
}
