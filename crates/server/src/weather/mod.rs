pub mod extract;
pub mod json_path;
pub mod persist;
pub mod point;
pub mod schema;

pub use extract::{extract, FlatWeatherRecord};
pub use json_path::{lookup, Seg};
pub use persist::{persist, PersistOutcome};
pub use point::{encode, FieldValue, Point, MEASUREMENT};
pub use schema::{value_kind, Field, FieldGroup, ValueKind, SCHEMA};
