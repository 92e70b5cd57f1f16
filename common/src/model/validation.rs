//! Submission rules for the record form.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::model::record::display_value;
use crate::model::record::Attributes;
use crate::model::schema::{FieldKind, Schema};
use crate::model::session::{Flow, SessionState};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$").expect("phone pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must use the format 555-123-4567 (got \"{value}\").")]
    PhoneFormat { field: String, value: String },
    #[error("{field} must be 0 or 1 (got \"{value}\").")]
    NotBinary { field: String, value: String },
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Builds the attribute mapping sent to the dataset for `flow`.
///
/// Values come from `entered` when present and from the form defaults
/// otherwise. Identifiers are copied from the selected record on edit and
/// dropped on create; address and coordinates always come from the flow's
/// pending slots. Every broken rule is returned, never a partial mapping.
pub fn prepare_submission(
    schema: &Schema,
    flow: Flow,
    entered: &Attributes,
    state: &SessionState,
) -> Result<Attributes, Vec<ValidationError>> {
    let defaults = schema.defaults(flow, &state.selected_record);
    let pending = state.pending(flow);
    let mut attributes = Attributes::new();
    let mut errors = Vec::new();

    for field in schema.fields_for(flow, &state.selected_record) {
        let value = match field.kind {
            FieldKind::ReadOnly => match flow {
                Flow::Edit => match state.selected_record.get(&field.name) {
                    Some(original) => original.clone(),
                    None => continue,
                },
                Flow::Create => continue,
            },
            FieldKind::Address => Value::String(pending.address.clone()),
            FieldKind::Latitude => Value::String(pending.latitude.clone()),
            FieldKind::Longitude => Value::String(pending.longitude.clone()),
            FieldKind::Binary => {
                let raw = entered
                    .get(&field.name)
                    .or_else(|| defaults.get(&field.name))
                    .cloned()
                    .unwrap_or(Value::Null);
                match normalize_flag(&raw) {
                    Some(flag) => Value::String(flag.to_string()),
                    None => {
                        errors.push(ValidationError::NotBinary {
                            field: field.name.clone(),
                            value: display_value(&raw),
                        });
                        continue;
                    }
                }
            }
            FieldKind::Phone => {
                let phone = text_value(entered, &defaults, &field.name);
                if !is_valid_phone(&phone) {
                    errors.push(ValidationError::PhoneFormat {
                        field: field.name.clone(),
                        value: phone,
                    });
                    continue;
                }
                Value::String(phone)
            }
            FieldKind::Suite | FieldKind::Text => {
                Value::String(text_value(entered, &defaults, &field.name))
            }
        };
        attributes.insert(field.name, value);
    }

    if errors.is_empty() {
        Ok(attributes)
    } else {
        Err(errors)
    }
}

fn text_value(entered: &Attributes, defaults: &Attributes, name: &str) -> String {
    entered
        .get(name)
        .or_else(|| defaults.get(name))
        .map(display_value)
        .unwrap_or_default()
}

fn normalize_flag(value: &Value) -> Option<u8> {
    match value {
        Value::String(s) => match s.as_str() {
            "0" => Some(0),
            "1" => Some(1),
            _ => None,
        },
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(0),
            Some(1) => Some(1),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{
        ADDRESS, GLOBAL_ID, LATITUDE, LONGITUDE, NAME, OBJECT_ID, PHONE_NUMBER,
    };
    use crate::model::session::{Event, PendingAddress, Tier};
    use serde_json::json;

    fn admin() -> SessionState {
        SessionState::default()
            .apply(Event::LoggedIn(Tier::Admin))
            .unwrap()
    }

    fn editing() -> SessionState {
        let mut record = Attributes::new();
        record.insert(OBJECT_ID.into(), json!(42));
        record.insert(GLOBAL_ID.into(), json!("{0F3C-11}"));
        record.insert(NAME.into(), json!("Westside"));
        record.insert(PHONE_NUMBER.into(), json!("555-000-0000"));
        record.insert(ADDRESS.into(), json!("9 Pine Rd"));
        record.insert(LATITUDE.into(), json!(35.0));
        record.insert(LONGITUDE.into(), json!(-90.0));
        record.insert("Laundry".into(), json!(1));
        admin().apply(Event::EditStarted(record)).unwrap()
    }

    #[test]
    fn phone_pattern_requires_the_whole_value() {
        assert!(is_valid_phone("555-123-4567"));
        assert!(!is_valid_phone("5551234567"));
        assert!(!is_valid_phone("555-123-45678"));
        assert!(!is_valid_phone(" 555-123-4567"));
        assert!(!is_valid_phone("555-12a-4567"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn edit_keeps_identifiers_byte_identical() {
        let state = editing();
        let mut entered = Attributes::new();
        entered.insert(OBJECT_ID.into(), json!(999));
        entered.insert(GLOBAL_ID.into(), json!("{FORGED}"));
        entered.insert(PHONE_NUMBER.into(), json!("555-123-4567"));

        let attributes =
            prepare_submission(&Schema::default(), Flow::Edit, &entered, &state).unwrap();
        assert_eq!(attributes.get(OBJECT_ID), Some(&json!(42)));
        assert_eq!(attributes.get(GLOBAL_ID), Some(&json!("{0F3C-11}")));
        assert_eq!(attributes.get(PHONE_NUMBER), Some(&json!("555-123-4567")));
        assert_eq!(attributes.get(NAME), Some(&json!("Westside")));
        assert_eq!(attributes.get("Laundry"), Some(&json!("1")));
    }

    #[test]
    fn address_and_coordinates_come_from_pending_slots() {
        let state = editing()
            .apply(Event::AddressResolved {
                flow: Flow::Edit,
                address: PendingAddress::resolved("1 New Rd", 36.5, -91.25),
            })
            .unwrap();
        let mut entered = Attributes::new();
        entered.insert(ADDRESS.into(), json!("typed by hand"));
        entered.insert(LATITUDE.into(), json!("0"));

        let attributes =
            prepare_submission(&Schema::default(), Flow::Edit, &entered, &state).unwrap();
        assert_eq!(attributes.get(ADDRESS), Some(&json!("1 New Rd")));
        assert_eq!(attributes.get(LATITUDE), Some(&json!("36.5")));
        assert_eq!(attributes.get(LONGITUDE), Some(&json!("-91.25")));
    }

    #[test]
    fn create_drops_identifiers_and_defaults_flags_to_zero() {
        let state = admin().apply(Event::CreateStarted).unwrap();
        let mut entered = Attributes::new();
        entered.insert(OBJECT_ID.into(), json!(5));
        entered.insert(PHONE_NUMBER.into(), json!("555-987-6543"));
        entered.insert("Showers".into(), json!(1));

        let attributes =
            prepare_submission(&Schema::default(), Flow::Create, &entered, &state).unwrap();
        assert!(attributes.get(OBJECT_ID).is_none());
        assert!(attributes.get(GLOBAL_ID).is_none());
        assert_eq!(attributes.get("Showers"), Some(&json!("1")));
        assert_eq!(attributes.get("Clothing"), Some(&json!("0")));
        for flag in Schema::default().binary_fields() {
            let value = attributes.get(&flag.name).unwrap();
            assert!(value == &json!("0") || value == &json!("1"));
        }
    }

    #[test]
    fn every_broken_rule_is_reported() {
        let state = admin().apply(Event::CreateStarted).unwrap();
        let mut entered = Attributes::new();
        entered.insert(PHONE_NUMBER.into(), json!("5551234567"));
        entered.insert("Showers".into(), json!("yes"));
        entered.insert("Laundry".into(), json!(2));

        let errors =
            prepare_submission(&Schema::default(), Flow::Create, &entered, &state).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::PhoneFormat {
            field: PHONE_NUMBER.into(),
            value: "5551234567".into(),
        }));
    }
}
