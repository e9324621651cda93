use serde_json::Value;

use super::extract::FlatWeatherRecord;
use super::schema::{value_kind, ValueKind, LOCATION_FIELDS};

/// Measurement every weather point is written under.
pub const MEASUREMENT: &str = "weather_data";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Text(String),
}

/// One time-series point: measurement, location tag and typed fields. No
/// timestamp is carried; the store assigns the write time.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: &'static str,
    pub location: String,
    pub fields: Vec<(String, FieldValue)>,
}

impl Point {
    /// Renders the point as a single InfluxDB line protocol line.
    pub fn to_line_protocol(&self) -> String {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| match value {
                FieldValue::Float(number) => format!("{}={}", escape_key(key), number),
                FieldValue::Text(text) => {
                    format!("{}=\"{}\"", escape_key(key), escape_string_field(text))
                }
            })
            .collect();

        format!(
            "{},location={} {}",
            escape_measurement(self.measurement),
            escape_tag_value(&self.location),
            rendered.join(",")
        )
    }
}

/// Encodes a flattened record into a point, skipping absent values.
///
/// Field names are exactly the record keys; air-quality readings gain an
/// `air_quality_` prefix and location metadata a `location_` prefix. Kinds
/// come from the same schema the extractor ran against.
pub fn encode(record: &FlatWeatherRecord) -> Point {
    let mut fields = Vec::new();

    for (key, value) in &record.fields {
        if value.is_null() {
            continue;
        }
        fields.push((key.clone(), field_value(value, value_kind(key))));
    }

    for (key, value) in &record.air_quality {
        if value.is_null() {
            continue;
        }
        fields.push((
            format!("air_quality_{}", key),
            field_value(value, ValueKind::Numeric),
        ));
    }

    for field in LOCATION_FIELDS {
        let value = match record.location.get(field.key) {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };
        fields.push((
            format!("location_{}", field.key),
            field_value(value, field.kind),
        ));
    }

    Point {
        measurement: MEASUREMENT,
        location: record.formatted_location.clone(),
        fields,
    }
}

fn field_value(value: &Value, kind: ValueKind) -> FieldValue {
    match kind {
        ValueKind::Text => FieldValue::Text(stringify(value)),
        ValueKind::Numeric => match as_f64(value) {
            Some(number) => FieldValue::Float(number),
            // Values that refuse to parse are kept as strings instead of
            // being dropped
            None => FieldValue::Text(stringify(value)),
        },
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        // line protocol has no representation for non-finite floats
        Value::String(text) => text.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn escape_measurement(name: &str) -> String {
    name.replace(',', "\\,").replace(' ', "\\ ")
}

fn escape_key(key: &str) -> String {
    key.replace(',', "\\,").replace('=', "\\=").replace(' ', "\\ ")
}

fn escape_tag_value(value: &str) -> String {
    escape_key(value)
}

fn escape_string_field(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
