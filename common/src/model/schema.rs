//! Declared field schema of the service-center dataset.
//!
//! The form and the submission rules never branch on raw attribute names;
//! they look up each attribute's [`FieldKind`] here. Attributes the schema
//! does not declare are treated as plain text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::record::{
    display_value, flag_value, Attributes, ADDRESS, GLOBAL_ID, LATITUDE, LONGITUDE, NAME,
    OBJECT_ID, PHONE_NUMBER, SUITE_ADDRESS,
};
use crate::model::session::Flow;

/// Service-availability flags used when the configuration does not name its own.
pub const DEFAULT_BINARY_FIELDS: [&str; 25] = [
    "Food_pantry",
    "Hot_meals",
    "Emergency_shelter",
    "Transitional_housing",
    "Rental_assistance",
    "Utility_assistance",
    "Clothing",
    "Showers",
    "Laundry",
    "Mail_services",
    "Medical_care",
    "Dental_care",
    "Mental_health",
    "Substance_use",
    "Case_management",
    "Job_training",
    "Legal_aid",
    "Benefits_enrollment",
    "ID_documents",
    "Transportation",
    "Childcare",
    "Youth_services",
    "Senior_services",
    "Veteran_services",
    "Language_services",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// 0/1 service flag.
    Binary,
    Phone,
    /// Server-assigned identifier, shown but never submitted as input.
    ReadOnly,
    /// Only changed through the address suggestion flow.
    Address,
    Suite,
    Latitude,
    Longitude,
    Text,
}

impl FieldKind {
    /// Whether the user types or picks this field's value directly in the form.
    pub fn is_user_editable(self) -> bool {
        matches!(
            self,
            FieldKind::Binary | FieldKind::Phone | FieldKind::Suite | FieldKind::Text
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered list of field descriptors driving rendering and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::with_binary_fields(&DEFAULT_BINARY_FIELDS)
    }
}

impl Schema {
    /// Builds the schema with the fixed text fields followed by `binary_fields`.
    pub fn with_binary_fields<S: AsRef<str>>(binary_fields: &[S]) -> Self {
        let mut fields = vec![
            FieldDescriptor::new(OBJECT_ID, FieldKind::ReadOnly),
            FieldDescriptor::new(GLOBAL_ID, FieldKind::ReadOnly),
            FieldDescriptor::new(NAME, FieldKind::Text),
            FieldDescriptor::new(PHONE_NUMBER, FieldKind::Phone),
            FieldDescriptor::new(ADDRESS, FieldKind::Address),
            FieldDescriptor::new(SUITE_ADDRESS, FieldKind::Suite),
            FieldDescriptor::new(LATITUDE, FieldKind::Latitude),
            FieldDescriptor::new(LONGITUDE, FieldKind::Longitude),
        ];
        for name in binary_fields {
            let name = name.as_ref();
            if fields.iter().all(|f| f.name != name) {
                fields.push(FieldDescriptor::new(name, FieldKind::Binary));
            }
        }
        Self { fields }
    }

    pub fn kind_of(&self, name: &str) -> FieldKind {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.kind)
            .unwrap_or(FieldKind::Text)
    }

    pub fn binary_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Binary)
    }

    /// Fields of a new record: declared order, identifiers left out.
    pub fn create_fields(&self) -> Vec<FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| f.kind != FieldKind::ReadOnly)
            .cloned()
            .collect()
    }

    /// Fields of an existing record, in the record's own attribute order.
    pub fn edit_fields(&self, record: &Attributes) -> Vec<FieldDescriptor> {
        record
            .keys()
            .map(|name| FieldDescriptor::new(name.clone(), self.kind_of(name)))
            .collect()
    }

    pub fn fields_for(&self, flow: Flow, selected: &Attributes) -> Vec<FieldDescriptor> {
        match flow {
            Flow::Create => self.create_fields(),
            Flow::Edit => self.edit_fields(selected),
        }
    }

    /// Initial values of every user-editable field of a form.
    ///
    /// Create starts from empty text and `"0"` flags; edit starts from the
    /// selected record, with flags coerced to `"0"`/`"1"`.
    pub fn defaults(&self, flow: Flow, selected: &Attributes) -> Attributes {
        self.fields_for(flow, selected)
            .into_iter()
            .filter(|f| f.kind.is_user_editable())
            .map(|f| {
                let current = match flow {
                    Flow::Create => None,
                    Flow::Edit => selected.get(&f.name),
                };
                let value = match (f.kind, current) {
                    (FieldKind::Binary, Some(v)) => flag_value(v).to_string(),
                    (FieldKind::Binary, None) => "0".to_string(),
                    (_, Some(v)) => display_value(v),
                    (_, None) => String::new(),
                };
                (f.name, Value::String(value))
            })
            .collect()
    }
}

/// Field arrangement of the record form.
///
/// Leading fields keep their original order; the suite address, the
/// latitude/longitude pair and the binary flag grid are moved to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormLayout {
    pub leading: Vec<FieldDescriptor>,
    pub suite: Option<FieldDescriptor>,
    pub latitude: Option<FieldDescriptor>,
    pub longitude: Option<FieldDescriptor>,
    pub flags: Vec<FieldDescriptor>,
}

impl FormLayout {
    pub fn from_fields(fields: Vec<FieldDescriptor>) -> Self {
        let mut layout = FormLayout::default();
        for field in fields {
            match field.kind {
                FieldKind::Suite => layout.suite = Some(field),
                FieldKind::Latitude => layout.latitude = Some(field),
                FieldKind::Longitude => layout.longitude = Some(field),
                FieldKind::Binary => layout.flags.push(field),
                _ => layout.leading.push(field),
            }
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(fields: &[FieldDescriptor]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn sample_record() -> Attributes {
        let mut record = Attributes::new();
        record.insert(OBJECT_ID.into(), json!(7));
        record.insert(NAME.into(), json!("Eastside Center"));
        record.insert("Food_pantry".into(), json!(1));
        record.insert(LATITUDE.into(), json!(41.5));
        record.insert(PHONE_NUMBER.into(), json!("555-000-1111"));
        record.insert(SUITE_ADDRESS.into(), json!("Suite 4"));
        record.insert("Hours".into(), json!("9-5"));
        record.insert(LONGITUDE.into(), json!(-87.2));
        record.insert(ADDRESS.into(), json!("1 Lake St"));
        record.insert(GLOBAL_ID.into(), json!("{ABC}"));
        record
    }

    #[test]
    fn undeclared_attributes_are_text() {
        let schema = Schema::default();
        assert_eq!(schema.kind_of("Hours"), FieldKind::Text);
        assert_eq!(schema.kind_of(PHONE_NUMBER), FieldKind::Phone);
        assert_eq!(schema.kind_of("Childcare"), FieldKind::Binary);
        assert_eq!(schema.binary_fields().count(), 25);
    }

    #[test]
    fn configured_binary_fields_replace_the_defaults() {
        let schema = Schema::with_binary_fields(&["Wifi", "Printing", "Wifi"]);
        let flags: Vec<&str> = schema.binary_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(flags, vec!["Wifi", "Printing"]);
        assert_eq!(schema.kind_of("Food_pantry"), FieldKind::Text);
    }

    #[test]
    fn create_fields_leave_out_identifiers() {
        let fields = Schema::default().create_fields();
        assert!(fields.iter().all(|f| f.kind != FieldKind::ReadOnly));
        assert_eq!(fields[0].name, NAME);
        assert_eq!(fields.len(), 6 + 25);
    }

    #[test]
    fn layout_keeps_record_order_and_moves_special_fields_last() {
        let schema = Schema::default();
        let layout = FormLayout::from_fields(schema.edit_fields(&sample_record()));

        assert_eq!(
            names(&layout.leading),
            vec![OBJECT_ID, NAME, PHONE_NUMBER, "Hours", ADDRESS, GLOBAL_ID]
        );
        assert_eq!(layout.suite.map(|f| f.name), Some(SUITE_ADDRESS.to_string()));
        assert_eq!(layout.latitude.map(|f| f.name), Some(LATITUDE.to_string()));
        assert_eq!(layout.longitude.map(|f| f.name), Some(LONGITUDE.to_string()));
        assert_eq!(names(&layout.flags), vec!["Food_pantry"]);
    }

    #[test]
    fn create_defaults_are_empty_text_and_zero_flags() {
        let defaults = Schema::default().defaults(Flow::Create, &Attributes::new());
        assert_eq!(defaults.get(NAME), Some(&json!("")));
        assert_eq!(defaults.get(PHONE_NUMBER), Some(&json!("")));
        assert_eq!(defaults.get("Showers"), Some(&json!("0")));
        assert!(defaults.get(ADDRESS).is_none());
        assert!(defaults.get(OBJECT_ID).is_none());
    }

    #[test]
    fn edit_defaults_come_from_the_selected_record() {
        let defaults = Schema::default().defaults(Flow::Edit, &sample_record());
        assert_eq!(defaults.get(NAME), Some(&json!("Eastside Center")));
        assert_eq!(defaults.get("Food_pantry"), Some(&json!("1")));
        assert_eq!(defaults.get("Hours"), Some(&json!("9-5")));
        assert_eq!(defaults.get(SUITE_ADDRESS), Some(&json!("Suite 4")));
        assert!(defaults.get(LATITUDE).is_none());
        assert!(defaults.get(GLOBAL_ID).is_none());
    }
}
