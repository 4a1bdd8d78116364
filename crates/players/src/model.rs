//! Player record.
//!
//! The id is derived once from team + sanitized name at construction and
//! never regenerated afterwards. Metric conversions and BMI are pure
//! functions of the stored fields: they appear in the JSON output but are
//! never stored, so they cannot drift out of sync.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use statsvc_core::Entity;

const METERS_PER_INCH: f64 = 0.0254;
const KG_PER_LB: f64 = 0.453592;

/// A roster entry keyed by a deterministic `TEAM_Player_Name` id.
///
/// Equality is id-based.
#[derive(Debug, Clone)]
pub struct Player {
    id: String,
    pub name: String,
    pub team: String,
    pub position: String,
    pub height_inches: Option<i32>,
    pub weight_lbs: Option<i32>,
    pub age: Option<f64>,
}

impl Player {
    /// Build a player with an id derived from team and name.
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        position: impl Into<String>,
        height_inches: Option<i32>,
        weight_lbs: Option<i32>,
        age: Option<f64>,
    ) -> Self {
        let name = name.into();
        let team = team.into();
        let id = generate_id(&name, &team);
        Self {
            id,
            name,
            team,
            position: position.into(),
            height_inches,
            weight_lbs,
            age,
        }
    }

    /// Replace the id, e.g. when a route path dictates it. Consumes the
    /// value so an id swap is always an explicit construction step.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Height converted to meters.
    pub fn height_meters(&self) -> Option<f64> {
        self.height_inches.map(|h| f64::from(h) * METERS_PER_INCH)
    }

    /// Weight converted to kilograms.
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_lbs.map(|w| f64::from(w) * KG_PER_LB)
    }

    /// Body mass index: `weight_lbs * 703 / height_inches²`. `None` when
    /// either input is missing or the height is zero.
    pub fn bmi(&self) -> Option<f64> {
        match (self.height_inches, self.weight_lbs) {
            (Some(h), Some(w)) if h > 0 => {
                Some(f64::from(w) * 703.0 / (f64::from(h) * f64::from(h)))
            }
            _ => None,
        }
    }
}

/// Deterministic player id: the team code, an underscore, and the name with
/// every non-alphanumeric character replaced by an underscore.
pub fn generate_id(name: &str, team: &str) -> String {
    if name.is_empty() || team.is_empty() {
        return String::new();
    }
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{team}_{sanitized}")
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl std::hash::Hash for Player {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Entity for Player {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Serialize for Player {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Player", 10)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("team", &self.team)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("heightInches", &self.height_inches)?;
        state.serialize_field("weightLbs", &self.weight_lbs)?;
        state.serialize_field("age", &self.age)?;
        state.serialize_field("heightMeters", &self.height_meters())?;
        state.serialize_field("weightKg", &self.weight_kg())?;
        state.serialize_field("bmi", &self.bmi())?;
        state.end()
    }
}

/// Incoming JSON shape. Derived fields are accepted and ignored; a missing
/// id falls back to the deterministic one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerWire {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    height_inches: Option<i32>,
    #[serde(default)]
    weight_lbs: Option<i32>,
    #[serde(default)]
    age: Option<f64>,
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = PlayerWire::deserialize(deserializer)?;
        let id = if wire.id.is_empty() {
            generate_id(&wire.name, &wire.team)
        } else {
            wire.id
        };
        Ok(Player {
            id,
            name: wire.name,
            team: wire.team,
            position: wire.position,
            height_inches: wire.height_inches,
            weight_lbs: wire.weight_lbs,
            age: wire.age,
        })
    }
}
