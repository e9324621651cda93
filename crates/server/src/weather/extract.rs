use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::json_path::{lookup, Seg};
use super::schema::{AIR_QUALITY_KEYS, ALERTS_KEY, LOCATION_FIELDS, SCHEMA};

/// Flattened view of one forecast response.
///
/// `fields` always holds every key the schema defines, with `Value::Null`
/// standing in wherever the source branch was missing. `air_quality` holds
/// all eight readings or nothing at all. `formatted_location` becomes the
/// point's tag and is never written as a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatWeatherRecord {
    pub fields: BTreeMap<String, Value>,
    pub air_quality: BTreeMap<String, Value>,
    pub location: BTreeMap<String, Value>,
    pub formatted_location: String,
}

/// Flattens a raw forecast response into the schema's field set.
pub fn extract(raw: &Value) -> FlatWeatherRecord {
    let mut fields = BTreeMap::new();

    for group in SCHEMA {
        let base = lookup(raw, group.base);
        for field in group.fields {
            let value = base
                .and_then(|branch| lookup(branch, &[Seg::Key(field.key)]))
                .cloned()
                .unwrap_or(Value::Null);
            fields.insert(format!("{}{}", group.prefix, field.key), value);
        }
    }

    let alerts = lookup(
        raw,
        &[
            Seg::Key("alerts"),
            Seg::Key("alert"),
            Seg::Index(0),
            Seg::Key("headline"),
        ],
    )
    .cloned()
    .unwrap_or_else(|| Value::String("None".to_string()));
    fields.insert(ALERTS_KEY.to_string(), alerts);

    // Air quality is all-or-nothing: the sub-record only exists when the
    // response carried the branch.
    let mut air_quality = BTreeMap::new();
    if let Some(readings) = lookup(raw, &[Seg::Key("current"), Seg::Key("air_quality")]) {
        for &(source_key, output_key) in AIR_QUALITY_KEYS {
            let value = lookup(readings, &[Seg::Key(source_key)])
                .cloned()
                .unwrap_or(Value::Null);
            air_quality.insert(output_key.to_string(), value);
        }
    }

    let location_base = lookup(raw, &[Seg::Key("location")]);
    let mut location = BTreeMap::new();
    for field in LOCATION_FIELDS {
        let value = location_base
            .and_then(|branch| lookup(branch, &[Seg::Key(field.key)]))
            .cloned()
            .unwrap_or(Value::Null);
        location.insert(field.key.to_string(), value);
    }

    let formatted_location = format!(
        "{}, {}",
        location_part(&location, "name"),
        location_part(&location, "country")
    );

    FlatWeatherRecord {
        fields,
        air_quality,
        location,
        formatted_location,
    }
}

fn location_part<'a>(location: &'a BTreeMap<String, Value>, key: &str) -> &'a str {
    location.get(key).and_then(Value::as_str).unwrap_or("")
}
