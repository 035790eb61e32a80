//! Daily notes settings and their persisted form

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Date format used when nothing has been configured
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Settings of the daily notes plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyNotesSettings {
    /// moment.js pattern used to name new notes
    #[serde(deserialize_with = "null_as_default_format")]
    pub date_format: String,
    /// Stored keys this version does not know about, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DailyNotesSettings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            extra: Map::new(),
        }
    }
}

impl DailyNotesSettings {
    /// Merge stored data over the defaults. Data of the wrong shape falls back
    /// to the defaults instead of failing the load.
    pub fn from_stored(stored: Option<Value>) -> Self {
        let mut object = match stored {
            None | Some(Value::Null) => return Self::default(),
            Some(Value::Object(object)) => object,
            Some(other) => {
                tracing::warn!("Ignoring daily notes settings that are not an object: {}", other);
                return Self::default();
            }
        };

        match serde_json::from_value(Value::Object(object.clone())) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Invalid daily notes settings, using the default format: {}", e);
                object.remove("dateFormat");
                Self {
                    extra: object,
                    ..Self::default()
                }
            }
        }
    }

    /// Serialize for persistence
    pub fn to_stored(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

fn null_as_default_format<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let format = Option::<String>::deserialize(deserializer)?;
    Ok(format.unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_without_stored_data() {
        let settings = DailyNotesSettings::from_stored(None);
        assert_eq!(settings.date_format, "YYYY-MM-DD");
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_stored_values_win() {
        let settings = DailyNotesSettings::from_stored(Some(json!({ "dateFormat": "DD.MM.YYYY" })));
        assert_eq!(settings.date_format, "DD.MM.YYYY");
    }

    #[test]
    fn test_missing_or_null_format_defaults() {
        let empty = DailyNotesSettings::from_stored(Some(json!({})));
        assert_eq!(empty.date_format, DEFAULT_DATE_FORMAT);

        let null = DailyNotesSettings::from_stored(Some(json!({ "dateFormat": null })));
        assert_eq!(null.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_wrong_shape_falls_back_to_defaults() {
        for stored in [json!("x"), json!([]), json!(42), json!(true)] {
            assert_eq!(
                DailyNotesSettings::from_stored(Some(stored)),
                DailyNotesSettings::default()
            );
        }
    }

    #[test]
    fn test_non_string_format_keeps_other_keys() {
        let settings = DailyNotesSettings::from_stored(Some(
            json!({ "dateFormat": 5, "templateFolder": "Templates" }),
        ));
        assert_eq!(settings.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(settings.extra.get("templateFolder"), Some(&json!("Templates")));
        assert!(!settings.extra.contains_key("dateFormat"));
    }

    #[test]
    fn test_unknown_keys_survive_a_save() {
        let stored = json!({ "dateFormat": "YYYY/MM/DD", "templateFolder": "Templates" });
        let settings = DailyNotesSettings::from_stored(Some(stored.clone()));
        assert_eq!(settings.to_stored().unwrap(), stored);
    }

    #[test]
    fn test_round_trip() {
        let mut settings = DailyNotesSettings::default();
        settings.date_format = "gggg-[W]ww".to_string();

        let loaded = DailyNotesSettings::from_stored(Some(settings.to_stored().unwrap()));
        assert_eq!(loaded, settings);
    }
}
