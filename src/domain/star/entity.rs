//! Star entity and identifier

use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

use crate::domain::DomainError;

/// Store-assigned identifier of a persisted star
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(Uuid);

impl StarId {
    /// Wrap an identifier handed out by the store
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its textual form
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|e| DomainError::validation(format!("Invalid star id '{}': {}", value, e)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for StarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A star as written by a caller, before the store assigns an identity.
///
/// `distance` keeps the JSON number exactly as received so a read-back
/// echoes `8` as `8` and `8.6` as `8.6`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStar {
    pub name: String,
    pub distance: Number,
}

impl NewStar {
    pub fn new(name: impl Into<String>, distance: Number) -> Self {
        Self {
            name: name.into(),
            distance,
        }
    }
}

/// A persisted star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    #[serde(rename = "_id")]
    id: StarId,
    name: String,
    distance: Number,
}

impl Star {
    pub fn new(id: StarId, star: NewStar) -> Self {
        Self {
            id,
            name: star.name,
            distance: star.distance,
        }
    }

    pub fn id(&self) -> StarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distance(&self) -> &Number {
        &self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_star_accepts_any_name() {
        assert_eq!(NewStar::new("", Number::from(4)).name, "");
        assert_eq!(NewStar::new("   ", Number::from(4)).name, "   ");
    }

    #[test]
    fn test_star_keeps_number_representation() {
        let distance = Number::from_f64(8.6).unwrap();
        let star = Star::new(
            StarId::from_uuid(Uuid::new_v4()),
            NewStar::new("Sirius", distance),
        );

        assert_eq!(star.name(), "Sirius");
        assert_eq!(star.distance().to_string(), "8.6");

        let integral = NewStar::new("Vega", Number::from(25));
        assert_eq!(serde_json::to_string(&integral.distance).unwrap(), "25");
    }

    #[test]
    fn test_star_document_uses_underscore_id() {
        let id = StarId::from_uuid(Uuid::new_v4());
        let star = Star::new(id, NewStar::new("Rigel", Number::from(860)));

        let doc = serde_json::to_value(&star).unwrap();
        assert_eq!(doc["_id"], serde_json::json!(id.to_string()));
        assert_eq!(doc["name"], "Rigel");
    }

    #[test]
    fn test_star_id_parse() {
        let id = Uuid::new_v4();
        assert_eq!(StarId::parse(&id.to_string()).unwrap().as_uuid(), &id);
        assert!(StarId::parse("not-a-uuid").is_err());
    }
}
