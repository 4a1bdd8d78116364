//! Earthquake record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use statsvc_core::Entity;

/// A single seismic event keyed by its catalog id.
///
/// All measurement fields are optional: source catalogs routinely omit
/// depth or magnitude for preliminary records. Equality is id-based.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
    #[serde(default)]
    pub magnitude: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub magnitude_type: Option<String>,
}

impl PartialEq for Earthquake {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Earthquake {}

impl std::hash::Hash for Earthquake {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Entity for Earthquake {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake(id: &str, magnitude: f64) -> Earthquake {
        Earthquake {
            id: id.to_string(),
            magnitude: Some(magnitude),
            ..Earthquake::default()
        }
    }

    #[test]
    fn equality_is_id_based() {
        assert_eq!(quake("a", 5.5), quake("a", 6.5));
        assert_ne!(quake("a", 5.5), quake("b", 5.5));
    }

    #[test]
    fn wire_names_are_camel_case() {
        let q = Earthquake {
            id: "nc1".to_string(),
            magnitude_type: Some("md".to_string()),
            ..Earthquake::default()
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["magnitudeType"], "md");
    }

    #[test]
    fn json_round_trip_preserves_scalars() {
        let q = Earthquake {
            id: "nc216859".to_string(),
            time: "1967-10-12T06:15:06".parse().ok(),
            latitude: Some(37.047),
            longitude: Some(-121.461),
            depth: Some(6.692),
            magnitude: Some(3.0),
            place: Some("California".to_string()),
            magnitude_type: Some("mx".to_string()),
        };

        let back: Earthquake =
            serde_json::from_str(&serde_json::to_string(&q).unwrap()).unwrap();
        assert_eq!(back, q);
        assert_eq!(back.latitude, q.latitude);
        assert_eq!(back.time, q.time);
    }
}
