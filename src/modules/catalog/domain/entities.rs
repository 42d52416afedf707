/// Typed shapes a contribution payload must fit, per target entity family.
///
/// Unknown field names make the whole apply fail rather than being silently
/// dropped, so a contribution can never half-apply.
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::shared::errors::{AppError, AppResult};

/// Media-shaped targets: anime, manga, novels, donghua, manhua, manhwa,
/// fan comics. `unit_count` is episodes or chapters depending on the type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaFields {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub release_year: Option<i32>,
    pub unit_count: Option<i32>,
    pub cover_url: Option<String>,
}

/// Person-shaped targets: characters, staff, voice actors
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonFields {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioFields {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenreFields {
    pub name: Option<String>,
}

/// Parse proposed field values into a typed shape
pub fn parse_fields<T: for<'de> Deserialize<'de>>(fields: &Map<String, Value>) -> AppResult<T> {
    serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| AppError::ApplyFailure(format!("Payload does not fit target shape: {}", e)))
}
