use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute mapping of one service center, in the order the dataset returns it.
pub type Attributes = serde_json::Map<String, Value>;

pub const OBJECT_ID: &str = "ObjectId";
pub const GLOBAL_ID: &str = "GlobalID";
pub const NAME: &str = "Name";
pub const PHONE_NUMBER: &str = "Phone_number";
pub const ADDRESS: &str = "Address";
pub const SUITE_ADDRESS: &str = "Address_w_suit__";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";

/// One row of the hosted dataset as it travels on the wire: `{"attributes": {...}}`.
///
/// Geometry is never requested, so only the attribute mapping is modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub attributes: Attributes,
}

impl Feature {
    pub fn new(attributes: Attributes) -> Self {
        Self { attributes }
    }

    pub fn object_id(&self) -> Option<i64> {
        object_id(&self.attributes)
    }
}

/// Server-assigned `ObjectId` of a record, if present and integral.
pub fn object_id(attributes: &Attributes) -> Option<i64> {
    attributes.get(OBJECT_ID).and_then(|value| match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Renders an attribute value the way a text input shows it.
///
/// `null` renders as an empty string; strings render without quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerces a stored service flag to the integer shown by the 0/1 selector.
///
/// Only values that are numerically one map to `1`; anything else, including
/// `null` and unparseable text, maps to `0`.
pub fn flag_value(value: &Value) -> u8 {
    let numeric = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match numeric {
        Some(n) if n == 1.0 => 1,
        _ => 0,
    }
}
