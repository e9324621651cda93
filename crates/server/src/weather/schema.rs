//! The one declarative description of every scalar pulled out of a forecast
//! response. Both the extractor and the point encoder read this table, so a
//! field added here flows through flattening and storage typing at once.

use super::json_path::Seg;

/// How the encoder writes a field into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Coerced to f64; values that refuse to parse fall back to strings
    Numeric,
    /// Always stored as a string, even when the value looks numeric
    Text,
}

/// One scalar field: the source key inside its group and the storage kind.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub kind: ValueKind,
}

/// A named set of fields read from one nested location in the response,
/// with an output prefix applied to every key.
#[derive(Debug, Clone, Copy)]
pub struct FieldGroup {
    pub name: &'static str,
    pub base: &'static [Seg],
    pub prefix: &'static str,
    pub fields: &'static [Field],
}

const fn num(key: &'static str) -> Field {
    Field {
        key,
        kind: ValueKind::Numeric,
    }
}

const fn text(key: &'static str) -> Field {
    Field {
        key,
        kind: ValueKind::Text,
    }
}

const CURRENT: FieldGroup = FieldGroup {
    name: "current",
    base: &[Seg::Key("current")],
    prefix: "",
    fields: &[
        num("last_updated_epoch"),
        text("last_updated"),
        num("temp_c"),
        num("temp_f"),
        num("is_day"),
        num("wind_mph"),
        num("wind_kph"),
        num("wind_degree"),
        text("wind_dir"),
        num("pressure_mb"),
        num("pressure_in"),
        num("precip_mm"),
        num("precip_in"),
        num("humidity"),
        num("cloud"),
        num("feelslike_c"),
        num("feelslike_f"),
        num("vis_km"),
        num("vis_miles"),
        num("gust_mph"),
        num("gust_kph"),
        num("uv"),
        num("windchill_c"),
        num("windchill_f"),
        num("heatindex_c"),
        num("heatindex_f"),
        num("dewpoint_c"),
        num("dewpoint_f"),
    ],
};

const CONDITION: FieldGroup = FieldGroup {
    name: "condition",
    base: &[Seg::Key("current"), Seg::Key("condition")],
    prefix: "condition_",
    fields: &[text("text"), text("icon"), num("code")],
};

const FORECAST_DAY: FieldGroup = FieldGroup {
    name: "forecast_day",
    base: &[Seg::Key("forecast"), Seg::Key("forecastday"), Seg::Index(0)],
    prefix: "",
    fields: &[text("date"), num("date_epoch")],
};

// The day group's `uv` lands on the same output key as the current group's
// and always wins, because this group is extracted later.
const DAY: FieldGroup = FieldGroup {
    name: "day",
    base: &[
        Seg::Key("forecast"),
        Seg::Key("forecastday"),
        Seg::Index(0),
        Seg::Key("day"),
    ],
    prefix: "",
    fields: &[
        num("maxtemp_c"),
        num("maxtemp_f"),
        num("mintemp_c"),
        num("mintemp_f"),
        num("avgtemp_c"),
        num("avgtemp_f"),
        num("maxwind_mph"),
        num("maxwind_kph"),
        num("totalprecip_mm"),
        num("totalprecip_in"),
        num("totalsnow_cm"),
        num("avgvis_km"),
        num("avgvis_miles"),
        num("avghumidity"),
        num("daily_will_it_rain"),
        num("daily_will_it_snow"),
        num("daily_chance_of_rain"),
        num("daily_chance_of_snow"),
        num("uv"),
    ],
};

const DAY_CONDITION: FieldGroup = FieldGroup {
    name: "day_condition",
    base: &[
        Seg::Key("forecast"),
        Seg::Key("forecastday"),
        Seg::Index(0),
        Seg::Key("day"),
        Seg::Key("condition"),
    ],
    prefix: "day_condition_",
    fields: &[text("text"), text("icon"), num("code")],
};

const ASTRO: FieldGroup = FieldGroup {
    name: "astro",
    base: &[
        Seg::Key("forecast"),
        Seg::Key("forecastday"),
        Seg::Index(0),
        Seg::Key("astro"),
    ],
    prefix: "",
    fields: &[
        text("sunrise"),
        text("sunset"),
        text("moonrise"),
        text("moonset"),
        text("moon_phase"),
        text("moon_illumination"),
        num("is_sun_up"),
        num("is_moon_up"),
    ],
};

// Always the first hour of the first forecast day, never matched to the
// current wall-clock hour.
const HOUR: FieldGroup = FieldGroup {
    name: "hour",
    base: &[
        Seg::Key("forecast"),
        Seg::Key("forecastday"),
        Seg::Index(0),
        Seg::Key("hour"),
        Seg::Index(0),
    ],
    prefix: "hour_",
    fields: &[
        num("time_epoch"),
        text("time"),
        num("temp_c"),
        num("temp_f"),
        num("is_day"),
        num("wind_mph"),
        num("wind_kph"),
        num("wind_degree"),
        text("wind_dir"),
        num("pressure_mb"),
        num("pressure_in"),
        num("precip_mm"),
        num("precip_in"),
        num("snow_cm"),
        num("humidity"),
        num("cloud"),
        num("feelslike_c"),
        num("feelslike_f"),
        num("windchill_c"),
        num("windchill_f"),
        num("heatindex_c"),
        num("heatindex_f"),
        num("dewpoint_c"),
        num("dewpoint_f"),
        num("will_it_rain"),
        num("will_it_snow"),
        num("chance_of_rain"),
        num("chance_of_snow"),
        num("vis_km"),
        num("vis_miles"),
        num("gust_mph"),
        num("gust_kph"),
        num("uv"),
    ],
};

const HOUR_CONDITION: FieldGroup = FieldGroup {
    name: "hour_condition",
    base: &[
        Seg::Key("forecast"),
        Seg::Key("forecastday"),
        Seg::Index(0),
        Seg::Key("hour"),
        Seg::Index(0),
        Seg::Key("condition"),
    ],
    prefix: "hour_condition_",
    fields: &[text("text"), text("icon"), num("code")],
};

const TIDE: FieldGroup = FieldGroup {
    name: "tide",
    base: &[
        Seg::Key("marine"),
        Seg::Key("tides"),
        Seg::Index(0),
        Seg::Key("tide"),
        Seg::Index(0),
    ],
    prefix: "",
    fields: &[text("tide_time"), num("tide_height_mt"), text("tide_type")],
};

// Swell and water readings ride on the hourly forecast entries, not on the
// top-level marine branch.
const MARINE_HOUR: FieldGroup = FieldGroup {
    name: "marine_hour",
    base: &[
        Seg::Key("forecast"),
        Seg::Key("forecastday"),
        Seg::Index(0),
        Seg::Key("hour"),
        Seg::Index(0),
    ],
    prefix: "",
    fields: &[
        num("sig_ht_mt"),
        num("swell_ht_mt"),
        num("swell_ht_ft"),
        num("swell_dir"),
        text("swell_dir_16_point"),
        num("swell_period_secs"),
        num("water_temp_c"),
        num("water_temp_f"),
    ],
};

/// Every field group, in extraction order.
pub const SCHEMA: &[FieldGroup] = &[
    CURRENT,
    CONDITION,
    FORECAST_DAY,
    DAY,
    DAY_CONDITION,
    ASTRO,
    HOUR,
    HOUR_CONDITION,
    TIDE,
    MARINE_HOUR,
];

/// Record key holding the first alert headline; set to the sentinel string
/// "None" when the response carries no alerts.
pub const ALERTS_KEY: &str = "alerts";

/// Air-quality keys as (source key, output key) pairs; the source spells
/// the two index fields with hyphens.
pub const AIR_QUALITY_KEYS: &[(&str, &str)] = &[
    ("co", "co"),
    ("o3", "o3"),
    ("no2", "no2"),
    ("so2", "so2"),
    ("pm2_5", "pm2_5"),
    ("pm10", "pm10"),
    ("us-epa-index", "us_epa_index"),
    ("gb-defra-index", "gb_defra_index"),
];

/// Location sub-record fields and their storage kinds.
pub const LOCATION_FIELDS: &[Field] = &[
    text("name"),
    text("region"),
    text("country"),
    num("lat"),
    num("lon"),
    text("tz_id"),
    num("localtime_epoch"),
    text("localtime"),
];

/// Storage kind for a record key. Total over all keys the extractor can
/// produce; anything unknown defaults to numeric (which itself falls back
/// to a string when the value will not parse).
pub fn value_kind(key: &str) -> ValueKind {
    if key == ALERTS_KEY {
        return ValueKind::Text;
    }
    for group in SCHEMA {
        for field in group.fields {
            if key.strip_prefix(group.prefix) == Some(field.key) {
                return field.kind;
            }
        }
    }
    ValueKind::Numeric
}
