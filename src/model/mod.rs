pub mod date;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use date::DateStyle;

// one element of the fetched array, every field optional and untyped on the wire
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub status_name: Option<Value>,
    #[serde(default)]
    pub category_name: Option<Value>,
    #[serde(default)]
    pub date_column: Option<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    Description,
    Status,
    Category,
    Date,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Title,
        Field::Description,
        Field::Status,
        Field::Category,
        Field::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Status => "Status",
            Field::Category => "Category",
            Field::Date => "Date",
        }
    }
}

/// Header labels shared by the table view and every export format.
pub const COLUMNS: [&str; 6] = ["ID", "Title", "Description", "Status", "Category", "Date"];

impl Record {
    pub fn value(&self, field: Field) -> Option<&Value> {
        match field {
            Field::Id => self.id.as_ref(),
            Field::Title => self.title.as_ref(),
            Field::Description => self.description.as_ref(),
            Field::Status => self.status_name.as_ref(),
            Field::Category => self.category_name.as_ref(),
            Field::Date => self.date_column.as_ref(),
        }
    }

    /// Display text for a field. The date column is returned raw; use
    /// [`Record::cell_text`] to get it rendered.
    pub fn field_text(&self, field: Field) -> String {
        value_text(self.value(field))
    }

    pub fn id_text(&self) -> String {
        self.field_text(Field::Id)
    }

    pub fn title_text(&self) -> String {
        self.field_text(Field::Title)
    }

    pub fn cell_text<Tz: chrono::TimeZone>(
        &self,
        field: Field,
        date_style: &DateStyle,
        tz: &Tz,
    ) -> String {
        match field {
            Field::Date => date_style.render(self.date_column.as_ref(), tz),
            other => self.field_text(other),
        }
    }
}

pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_slice::<Vec<Record>>(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_decode_as_none() {
        let records = parse_records(br#"[{"id": 1}, {"title": null, "extra": true}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, Some(json!(1)));
        assert_eq!(records[0].title, None);
        assert_eq!(records[1].title_text(), "");
    }

    #[test]
    fn field_text_normalizes_values() {
        let record = Record {
            id: Some(json!(42)),
            title: Some(json!("Alpha")),
            description: Some(json!(true)),
            status_name: Some(json!(["a", "b"])),
            ..Default::default()
        };
        assert_eq!(record.id_text(), "42");
        assert_eq!(record.title_text(), "Alpha");
        assert_eq!(record.field_text(Field::Description), "true");
        assert_eq!(record.field_text(Field::Status), r#"["a","b"]"#);
        assert_eq!(record.field_text(Field::Category), "");
    }

    #[test]
    fn non_array_payload_is_rejected() {
        assert!(parse_records(br#"{"id": 1}"#).is_err());
        assert!(parse_records(b"<html></html>").is_err());
    }

    #[test]
    fn field_labels_match_columns() {
        let labels: Vec<&str> = Field::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, COLUMNS.to_vec());
    }
}
