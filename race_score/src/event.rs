// Canonical event registry and label resolution. Human-facing distance labels
// (including the localized Spanish ones the product ships) resolve to a closed
// set of canonical events, each owned by exactly one scoring backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Venue;

/// Scoring backend that owns a canonical event. Fixed at table-construction
/// time; dispatch never guesses per call.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Backend {
    Parametric,
    Tabular,
}

/// Internal, backend-agnostic identifier for a scoring event.
///
/// Keys follow the reference data verbatim: road and long-track events use
/// descriptive keys ("track5000", "Road 10 km"), indoor track variants carry
/// the short-track suffix ("200m sh").
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CanonicalEvent {
    Sprint60,
    Sprint100,
    Sprint200,
    Sprint200Short,
    Lap400,
    Lap400Short,
    Middle800,
    Middle800Short,
    Middle1500,
    Middle1500Short,
    Mile,
    MileShort,
    Track3000,
    Track3000Short,
    Track5000,
    Track10000,
    Road10K,
    HalfMarathon,
    Marathon,
}

impl CanonicalEvent {
    pub const ALL: [CanonicalEvent; 19] = [
        CanonicalEvent::Sprint60,
        CanonicalEvent::Sprint100,
        CanonicalEvent::Sprint200,
        CanonicalEvent::Sprint200Short,
        CanonicalEvent::Lap400,
        CanonicalEvent::Lap400Short,
        CanonicalEvent::Middle800,
        CanonicalEvent::Middle800Short,
        CanonicalEvent::Middle1500,
        CanonicalEvent::Middle1500Short,
        CanonicalEvent::Mile,
        CanonicalEvent::MileShort,
        CanonicalEvent::Track3000,
        CanonicalEvent::Track3000Short,
        CanonicalEvent::Track5000,
        CanonicalEvent::Track10000,
        CanonicalEvent::Road10K,
        CanonicalEvent::HalfMarathon,
        CanonicalEvent::Marathon,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CanonicalEvent::Sprint60 => "60m",
            CanonicalEvent::Sprint100 => "100m",
            CanonicalEvent::Sprint200 => "200m",
            CanonicalEvent::Sprint200Short => "200m sh",
            CanonicalEvent::Lap400 => "400m",
            CanonicalEvent::Lap400Short => "400m sh",
            CanonicalEvent::Middle800 => "800m",
            CanonicalEvent::Middle800Short => "800m sh",
            CanonicalEvent::Middle1500 => "1500m",
            CanonicalEvent::Middle1500Short => "1500m sh",
            CanonicalEvent::Mile => "Milla",
            CanonicalEvent::MileShort => "Milla sh",
            CanonicalEvent::Track3000 => "3000m",
            CanonicalEvent::Track3000Short => "3000m sh",
            CanonicalEvent::Track5000 => "track5000",
            CanonicalEvent::Track10000 => "track10000",
            CanonicalEvent::Road10K => "Road 10 km",
            CanonicalEvent::HalfMarathon => "Road half marathon",
            CanonicalEvent::Marathon => "Road marathon",
        }
    }

    /// Parse a stored canonical key back into an event.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim();
        CanonicalEvent::ALL
            .iter()
            .copied()
            .find(|event| event.key() == normalized)
    }

    pub fn backend(&self) -> Backend {
        match self {
            CanonicalEvent::Track5000
            | CanonicalEvent::Track10000
            | CanonicalEvent::Road10K
            | CanonicalEvent::HalfMarathon
            | CanonicalEvent::Marathon => Backend::Parametric,
            _ => Backend::Tabular,
        }
    }

    /// Indoor (short track) counterpart, where the reference tables register
    /// one. 60m is indoor-only and already canonical; 100m and the long
    /// events have no indoor counterpart.
    pub fn indoor_variant(&self) -> Option<Self> {
        match self {
            CanonicalEvent::Sprint200 => Some(CanonicalEvent::Sprint200Short),
            CanonicalEvent::Lap400 => Some(CanonicalEvent::Lap400Short),
            CanonicalEvent::Middle800 => Some(CanonicalEvent::Middle800Short),
            CanonicalEvent::Middle1500 => Some(CanonicalEvent::Middle1500Short),
            CanonicalEvent::Mile => Some(CanonicalEvent::MileShort),
            CanonicalEvent::Track3000 => Some(CanonicalEvent::Track3000Short),
            _ => None,
        }
    }

    /// Human-facing labels that resolve directly to this event. Indoor
    /// variants are reached through the venue flag, not through a label.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            CanonicalEvent::Sprint60 => &["60m"],
            CanonicalEvent::Sprint100 => &["100m"],
            CanonicalEvent::Sprint200 => &["200m"],
            CanonicalEvent::Lap400 => &["400m"],
            CanonicalEvent::Middle800 => &["800m"],
            CanonicalEvent::Middle1500 => &["1500m"],
            CanonicalEvent::Mile => &["Milla", "Mile"],
            CanonicalEvent::Track3000 => &["3000m"],
            CanonicalEvent::Track5000 => &["5K", "5000m"],
            CanonicalEvent::Track10000 => &["10000m"],
            CanonicalEvent::Road10K => &["10K"],
            CanonicalEvent::HalfMarathon => &["Media maratón", "Half Marathon"],
            CanonicalEvent::Marathon => &["Maratón", "Marathon"],
            _ => &[],
        }
    }
}

impl fmt::Display for CanonicalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolve a human-facing distance label plus venue flag to a canonical
/// event. Label comparison is exact-string and case-sensitive; unregistered
/// labels resolve to `None`, a valid terminal state (not an error).
pub fn resolve(distance_label: &str, venue: Venue) -> Option<CanonicalEvent> {
    let base = match distance_label {
        "5K" | "5000m" => CanonicalEvent::Track5000,
        "10K" => CanonicalEvent::Road10K,
        "Media maratón" | "Half Marathon" => CanonicalEvent::HalfMarathon,
        "Maratón" | "Marathon" => CanonicalEvent::Marathon,
        "60m" => CanonicalEvent::Sprint60,
        "100m" => CanonicalEvent::Sprint100,
        "200m" => CanonicalEvent::Sprint200,
        "400m" => CanonicalEvent::Lap400,
        "800m" => CanonicalEvent::Middle800,
        "1500m" => CanonicalEvent::Middle1500,
        "Milla" | "Mile" => CanonicalEvent::Mile,
        "3000m" => CanonicalEvent::Track3000,
        "10000m" => CanonicalEvent::Track10000,
        _ => return None,
    };

    if venue == Venue::Indoor {
        if let Some(indoor) = base.indoor_variant() {
            return Some(indoor);
        }
    }
    Some(base)
}

/// Catalog entry describing one canonical event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventInfo {
    pub key: String,
    pub labels: Vec<String>,
    pub backend: Backend,
    pub indoor_variant: Option<String>,
}

/// Enumerate every canonical event with its registered labels and backend.
pub fn list_events() -> Vec<EventInfo> {
    CanonicalEvent::ALL
        .iter()
        .map(|event| EventInfo {
            key: event.key().to_string(),
            labels: event.labels().iter().map(|s| s.to_string()).collect(),
            backend: event.backend(),
            indoor_variant: event.indoor_variant().map(|e| e.key().to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn road_labels_resolve_regardless_of_venue() {
        for venue in [Venue::Indoor, Venue::Outdoor, Venue::RoadOrUnspecified] {
            assert_eq!(resolve("5K", venue), Some(CanonicalEvent::Track5000));
            assert_eq!(resolve("10K", venue), Some(CanonicalEvent::Road10K));
            assert_eq!(
                resolve("Media maratón", venue),
                Some(CanonicalEvent::HalfMarathon)
            );
            assert_eq!(resolve("Maratón", venue), Some(CanonicalEvent::Marathon));
        }
    }

    #[test]
    fn english_and_spanish_labels_share_a_key() {
        assert_eq!(
            resolve("Half Marathon", Venue::Outdoor),
            resolve("Media maratón", Venue::Outdoor)
        );
        assert_eq!(
            resolve("Marathon", Venue::RoadOrUnspecified),
            resolve("Maratón", Venue::RoadOrUnspecified)
        );
        assert_eq!(resolve("Mile", Venue::Outdoor), resolve("Milla", Venue::Outdoor));
    }

    #[test]
    fn indoor_venue_substitutes_short_track_keys() {
        assert_eq!(
            resolve("200m", Venue::Indoor),
            Some(CanonicalEvent::Sprint200Short)
        );
        assert_eq!(
            resolve("1500m", Venue::Indoor),
            Some(CanonicalEvent::Middle1500Short)
        );
        assert_eq!(resolve("Milla", Venue::Indoor), Some(CanonicalEvent::MileShort));
        assert_eq!(
            resolve("200m", Venue::Outdoor),
            Some(CanonicalEvent::Sprint200)
        );
    }

    #[test]
    fn events_without_indoor_variant_keep_their_key() {
        assert_eq!(resolve("60m", Venue::Indoor), Some(CanonicalEvent::Sprint60));
        assert_eq!(resolve("60m", Venue::Outdoor), Some(CanonicalEvent::Sprint60));
        assert_eq!(
            resolve("100m", Venue::Indoor),
            Some(CanonicalEvent::Sprint100)
        );
        assert_eq!(
            resolve("5000m", Venue::Indoor),
            Some(CanonicalEvent::Track5000)
        );
    }

    #[test]
    fn unregistered_labels_resolve_to_none() {
        assert_eq!(resolve("Triatlón", Venue::Outdoor), None);
        assert_eq!(resolve("", Venue::Outdoor), None);
        // Case-sensitive, locale-literal comparison.
        assert_eq!(resolve("5k", Venue::Outdoor), None);
        assert_eq!(resolve("media maratón", Venue::Outdoor), None);
    }

    #[test]
    fn keys_round_trip_through_from_key() {
        for event in CanonicalEvent::ALL {
            assert_eq!(CanonicalEvent::from_key(event.key()), Some(event));
        }
        assert_eq!(CanonicalEvent::from_key("track42195"), None);
    }

    #[test]
    fn every_label_resolves_to_its_own_event() {
        for event in CanonicalEvent::ALL {
            for label in event.labels() {
                assert_eq!(resolve(label, Venue::RoadOrUnspecified), Some(event));
            }
        }
    }

    #[test]
    fn catalog_lists_every_event_once() {
        let infos = list_events();
        assert_eq!(infos.len(), CanonicalEvent::ALL.len());
        let sprint200 = infos.iter().find(|i| i.key == "200m").unwrap();
        assert_eq!(sprint200.backend, Backend::Tabular);
        assert_eq!(sprint200.indoor_variant.as_deref(), Some("200m sh"));
        let marathon = infos.iter().find(|i| i.key == "Road marathon").unwrap();
        assert_eq!(marathon.backend, Backend::Parametric);
        assert!(marathon.labels.contains(&"Maratón".to_string()));
    }
}
