//! Data model definitions for car records.
//!
//! [`Car`] is the one canonical record type of the crate. Backend payloads are
//! tolerant in shape (numeric ids and years, missing image URLs, extra fields)
//! and are normalized while deserializing, so every `Car` a caller receives
//! already has its `id` and `year` in string form and an `image_url` that is
//! at worst empty.
//!
//! ```rust
//! use car_records_core::car_model::Car;
//!
//! let car: Car = serde_json::from_str(
//!     r#"{"id":7,"model":"Civic","brand":"Honda","color":"Negro","year":2023,"plateNumber":"ABC456"}"#,
//! )?;
//! assert_eq!(car.id.as_deref(), Some("7"));
//! assert_eq!(car.year, "2023");
//! assert_eq!(car.image_url, "");
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use validator::Validate;

use crate::validation::{image_url_rule, normalize_plate, not_blank, plate_rule, year_rule};

/// Owner reference as the backend describes a user.
///
/// Read leniently: numeric or string ids, missing or `null` names and emails.
/// Other fields are kept in [`CarOwner::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarOwner {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub username: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// A car record in its canonical form.
///
/// Serialized in camelCase, matching the backend contract. Fields the crate
/// does not know about are kept in [`Car::extra`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Absent only while the record is waiting to be created.
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub color: String,

    /// Four digit year, always kept as a string.
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,

    /// Uppercase on every write path of this crate.
    #[serde(default)]
    pub plate_number: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub image_url: String,

    /// Owner attached by the backend, kept exactly as received. See [`Car::owner`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<JsonValue>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Car {
    /// Builds the stored form of a new record under `id`.
    pub fn from_request(id: impl Into<String>, request: CarCreateRequest) -> Self {
        Self {
            id: Some(id.into()),
            model: request.model,
            brand: request.brand,
            color: request.color,
            year: request.year,
            plate_number: normalize_plate(&request.plate_number),
            image_url: request.image_url.unwrap_or_default(),
            user: None,
            extra: Map::new(),
        }
    }

    /// Shallow merge: every field present in `changes` replaces the current one.
    pub fn apply_changes(&mut self, changes: &CarUpdateRequest) {
        if let Some(model) = &changes.model {
            self.model = model.clone();
        }
        if let Some(brand) = &changes.brand {
            self.brand = brand.clone();
        }
        if let Some(color) = &changes.color {
            self.color = color.clone();
        }
        if let Some(year) = &changes.year {
            self.year = year.clone();
        }
        if let Some(plate) = &changes.plate_number {
            self.plate_number = normalize_plate(plate);
        }
        if let Some(image_url) = &changes.image_url {
            self.image_url = image_url.clone();
        }
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Typed view of [`Car::user`]; `None` when absent or not an object.
    pub fn owner(&self) -> Option<CarOwner> {
        self.user
            .as_ref()
            .filter(|user| user.is_object())
            .and_then(|user| CarOwner::deserialize(user).ok())
    }
}

/// Fields accepted when creating a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CarCreateRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub model: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub brand: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 30, message = "must be at most 30 characters")
    )]
    pub color: String,
    #[serde(deserialize_with = "string_or_number")]
    #[validate(custom(function = "year_rule"))]
    pub year: String,
    #[validate(custom(function = "plate_rule"))]
    pub plate_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "image_url_rule"))]
    pub image_url: Option<String>,
}

impl CarCreateRequest {
    /// Returns the request with its plate in canonical (uppercase) form.
    pub fn normalized(mut self) -> Self {
        self.plate_number = normalize_plate(&self.plate_number);
        self
    }
}

/// Partial update: only the fields that are `Some` are sent, merged or validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CarUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        custom(function = "not_blank"),
        length(max = 30, message = "must be at most 30 characters")
    )]
    pub color: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(custom(function = "year_rule"))]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "plate_rule"))]
    pub plate_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "image_url_rule"))]
    pub image_url: Option<String>,
}

impl CarUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self == &CarUpdateRequest::default()
    }

    pub fn normalized(mut self) -> Self {
        if let Some(plate) = self.plate_number.take() {
            self.plate_number = Some(normalize_plate(&plate));
        }
        self
    }
}

/// Identifier given by callers. Numeric ids are compared by their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CarId(String);

impl CarId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CarId {
    fn from(id: &str) -> Self {
        CarId(id.to_string())
    }
}

impl From<String> for CarId {
    fn from(id: String) -> Self {
        CarId(id)
    }
}

impl From<&String> for CarId {
    fn from(id: &String) -> Self {
        CarId(id.clone())
    }
}

impl From<i64> for CarId {
    fn from(id: i64) -> Self {
        CarId(id.to_string())
    }
}

impl From<u64> for CarId {
    fn from(id: u64) -> Self {
        CarId(id.to_string())
    }
}

impl From<i32> for CarId {
    fn from(id: i32) -> Self {
        CarId(id.to_string())
    }
}

impl From<u32> for CarId {
    fn from(id: u32) -> Self {
        CarId(id.to_string())
    }
}

/// The two list shapes the backend is known to answer with: a bare array, or
/// an object whose optional `data` member holds the array.
///
/// Records are decoded one by one, so a malformed record is reported with its
/// position and the serde error for it instead of a generic shape mismatch.
#[derive(Debug)]
pub enum CarListPayload {
    Bare(Vec<Car>),
    Wrapped { data: Option<Vec<Car>> },
}

impl<'de> Deserialize<'de> for CarListPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Array(items) => decode_cars(items).map(CarListPayload::Bare),
            JsonValue::Object(mut fields) => {
                let data = match fields.remove("data") {
                    None | Some(JsonValue::Null) => None,
                    Some(JsonValue::Array(items)) => Some(decode_cars(items)?),
                    Some(other) => {
                        return Err(DeError::custom(format!(
                            "`data` must be a list of cars, found {}",
                            json_kind(&other)
                        )))
                    }
                };
                Ok(CarListPayload::Wrapped { data })
            }
            other => Err(DeError::custom(format!(
                "expected a list of cars, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn decode_cars<E: DeError>(items: Vec<JsonValue>) -> Result<Vec<Car>, E> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Car>(item)
                .map_err(|e| E::custom(format!("car at index {index}: {e}")))
        })
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

impl CarListPayload {
    pub fn into_cars(self) -> Vec<Car> {
        match self {
            CarListPayload::Bare(cars) => cars,
            CarListPayload::Wrapped { data } => data.unwrap_or_default(),
        }
    }
}

fn coerce_to_string(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_to_string(JsonValue::deserialize(deserializer)?))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_to_string(JsonValue::deserialize(deserializer)?).unwrap_or_default())
}
