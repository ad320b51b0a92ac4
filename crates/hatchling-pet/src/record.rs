//! The persisted pet record.
//!
//! A pet is stored as one flat JSON object with a camelCase key per
//! attribute. The schema is the [`FIELDS`] list below; writing and reading
//! both walk it, so adding an attribute means adding one key here.
//!
//! Loading is forgiving: every known key present with a value of the right
//! shape is overlaid onto a fresh default pet, anything else keeps its
//! default. Range-bound needs go back through their clamps, and `version`
//! is re-stamped to [`CURRENT_PET_VERSION`].

use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{CURRENT_PET_VERSION, PetConfig};
use crate::error::RecordError;
use crate::pet::Pet;

/// `version`
pub const VERSION: &str = "version";
/// `lifeStage`
pub const LIFE_STAGE: &str = "lifeStage";
/// `alive`
pub const ALIVE: &str = "alive";
/// `paused`
pub const PAUSED: &str = "paused";
/// `needsAdvancement`
pub const NEEDS_ADVANCEMENT: &str = "needsAdvancement";
/// `name`
pub const NAME: &str = "name";
/// `food`
pub const FOOD: &str = "food";
/// `age`
pub const AGE: &str = "age";
/// `behavior`
pub const BEHAVIOR: &str = "behavior";
/// `pottyTimer`
pub const POTTY_TIMER: &str = "pottyTimer";
/// `messCounter`
pub const MESS_COUNTER: &str = "messCounter";
/// `happiness`
pub const HAPPINESS: &str = "happiness";
/// `lastUpdate`
pub const LAST_UPDATE: &str = "lastUpdate";
/// `eggFound`
pub const EGG_FOUND: &str = "eggFound";
/// `hatched`
pub const HATCHED: &str = "hatched";
/// `type`
pub const TYPE: &str = "type";
/// `color`
pub const COLOR: &str = "color";
/// `scaleWidth`
pub const SCALE_WIDTH: &str = "scaleWidth";
/// `scaleHeight`
pub const SCALE_HEIGHT: &str = "scaleHeight";

/// Every persisted key, in write order.
pub const FIELDS: [&str; 19] = [
    VERSION,
    LIFE_STAGE,
    ALIVE,
    PAUSED,
    NEEDS_ADVANCEMENT,
    NAME,
    FOOD,
    AGE,
    BEHAVIOR,
    POTTY_TIMER,
    MESS_COUNTER,
    HAPPINESS,
    LAST_UPDATE,
    EGG_FOUND,
    HATCHED,
    TYPE,
    COLOR,
    SCALE_WIDTH,
    SCALE_HEIGHT,
];

/// Serialize every attribute of `pet` into its flat record.
///
/// # Errors
///
/// Returns [`RecordError::NonFinite`] for a NaN or infinite sprite scale,
/// or [`RecordError::Serialization`] if a field fails to serialize.
pub fn to_record(pet: &Pet) -> Result<Value, RecordError> {
    let mut map = Map::with_capacity(FIELDS.len());
    for field in FIELDS {
        let value = match field {
            VERSION => encode(field, pet.version)?,
            LIFE_STAGE => encode(field, pet.life_stage)?,
            ALIVE => encode(field, pet.alive)?,
            PAUSED => encode(field, pet.paused)?,
            NEEDS_ADVANCEMENT => encode(field, pet.needs_advancement)?,
            NAME => encode(field, &pet.name)?,
            FOOD => encode(field, pet.food())?,
            AGE => encode(field, pet.age)?,
            BEHAVIOR => encode(field, pet.behavior)?,
            POTTY_TIMER => encode(field, pet.potty_timer)?,
            MESS_COUNTER => encode(field, pet.mess_counter())?,
            HAPPINESS => encode(field, pet.happiness())?,
            LAST_UPDATE => encode(field, pet.last_update)?,
            EGG_FOUND => encode(field, pet.egg_found)?,
            HATCHED => encode(field, pet.hatched)?,
            TYPE => encode(field, pet.pet_type)?,
            COLOR => encode(field, &pet.color)?,
            SCALE_WIDTH => encode_scale(field, pet.scale_width)?,
            SCALE_HEIGHT => encode_scale(field, pet.scale_height)?,
            _ => continue,
        };
        map.insert(field.to_owned(), value);
    }
    Ok(Value::Object(map))
}

/// Rebuild a pet from a stored record.
///
/// Starts from a fresh pet created at `now_ms` with cosmetics from `rng`,
/// overlays every readable field, and re-stamps the version.
pub fn from_record<R: Rng + ?Sized>(
    record: &Map<String, Value>,
    config: &PetConfig,
    now_ms: i64,
    rng: &mut R,
) -> Pet {
    let mut pet = Pet::with_rng(config, now_ms, rng);
    overlay(&mut pet, record);
    pet.version = CURRENT_PET_VERSION;
    pet
}

/// Overlay each readable key of `record` onto `pet`.
///
/// Unknown keys are ignored; known keys whose value has the wrong shape
/// keep the pet's current value.
pub fn overlay(pet: &mut Pet, record: &Map<String, Value>) {
    for field in FIELDS {
        let Some(value) = record.get(field) else {
            continue;
        };
        let applied = match field {
            VERSION => decode(value).map(|v| pet.version = v).is_some(),
            LIFE_STAGE => decode(value).map(|v| pet.life_stage = v).is_some(),
            ALIVE => decode(value).map(|v| pet.alive = v).is_some(),
            PAUSED => decode(value).map(|v| pet.paused = v).is_some(),
            NEEDS_ADVANCEMENT => decode(value).map(|v| pet.needs_advancement = v).is_some(),
            NAME => decode(value).map(|v| pet.name = v).is_some(),
            FOOD => decode(value).map(|v| pet.restore_food(v)).is_some(),
            AGE => decode(value).map(|v| pet.age = v).is_some(),
            BEHAVIOR => decode(value).map(|v| pet.behavior = v).is_some(),
            POTTY_TIMER => decode(value).map(|v| pet.potty_timer = v).is_some(),
            MESS_COUNTER => decode(value).map(|v| pet.set_mess_counter(v)).is_some(),
            HAPPINESS => decode(value).map(|v| pet.set_happiness(v)).is_some(),
            LAST_UPDATE => decode(value).map(|v| pet.last_update = v).is_some(),
            EGG_FOUND => decode(value).map(|v| pet.egg_found = v).is_some(),
            HATCHED => decode(value).map(|v| pet.hatched = v).is_some(),
            TYPE => decode(value).map(|v| pet.pet_type = v).is_some(),
            COLOR => decode(value).map(|v| pet.color = v).is_some(),
            SCALE_WIDTH => decode(value).map(|v| pet.scale_width = v).is_some(),
            SCALE_HEIGHT => decode(value).map(|v| pet.scale_height = v).is_some(),
            _ => false,
        };
        if !applied {
            debug!(field, %value, "Ignoring unreadable record field");
        }
    }
}

fn encode<T: Serialize>(field: &'static str, value: T) -> Result<Value, RecordError> {
    serde_json::to_value(value).map_err(|source| RecordError::Serialization { field, source })
}

fn encode_scale(field: &'static str, scale: f64) -> Result<Value, RecordError> {
    // serde_json maps NaN and infinities to null, which would not load back.
    if !scale.is_finite() {
        return Err(RecordError::NonFinite { field });
    }
    encode(field, scale)
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}
