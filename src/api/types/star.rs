//! Request and response bodies for `/star`

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::{DomainError, NewStar, Star};

/// Body of `POST /star`; fields are optional so a missing one is reported
/// as a 400 naming the field
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStarRequest {
    pub name: Option<String>,
    pub distance: Option<Number>,
}

impl CreateStarRequest {
    pub fn into_new_star(self) -> Result<NewStar, DomainError> {
        let name = self
            .name
            .ok_or_else(|| DomainError::invalid_field("name", "missing field `name`"))?;
        let distance = self
            .distance
            .ok_or_else(|| DomainError::invalid_field("distance", "missing field `distance`"))?;

        Ok(NewStar::new(name, distance))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarResponse {
    pub result: StarResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarResult {
    pub name: String,
    pub distance: Number,
}

impl From<&Star> for StarResponse {
    fn from(star: &Star) -> Self {
        Self {
            result: StarResult {
                name: star.name().to_string(),
                distance: star.distance().clone(),
            },
        }
    }
}
