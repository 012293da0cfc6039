//! The snapshot data model exchanged with the gist.
//!
//! A [`Snapshot`] is the whole editor configuration at one point in time. Its
//! JSON shape is the compatibility-critical artifact stored remotely:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "platform": "Linux",
//!   "settings": {},
//!   "keybindings": {},
//!   "extensions": [{"name": "...", "version": "...", "publisher": "..."}],
//!   "snippets": {}
//! }
//! ```
//!
//! Every key is optional on read so older or hand-edited blobs still load.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Format version written by this release. Informational only.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Placeholder for missing extension metadata.
pub const UNKNOWN: &str = "unknown";

/// Full editor configuration, serialized as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version of the producer (never used for migration)
    #[serde(rename = "version", default = "default_version")]
    pub format_version: String,

    /// Platform that produced the snapshot (e.g. "Linux", "Darwin", "Windows")
    #[serde(rename = "platform", default)]
    pub origin_platform: String,

    /// Contents of settings.json, passed through untouched
    #[serde(default, deserialize_with = "object_or_empty")]
    pub settings: Map<String, Value>,

    /// Contents of keybindings.json with comment lines removed
    #[serde(default = "empty_object")]
    pub keybindings: Value,

    /// Installed extensions, in directory enumeration order
    #[serde(default, deserialize_with = "readable_extensions")]
    pub extensions: Vec<ExtensionRecord>,

    /// Snippet files keyed by file stem
    #[serde(default, deserialize_with = "snippet_files")]
    pub snippets: BTreeMap<String, Value>,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Snapshot {
    /// Create an empty snapshot tagged with the given platform.
    pub fn new(origin_platform: impl Into<String>) -> Self {
        Self {
            format_version: default_version(),
            origin_platform: origin_platform.into(),
            settings: Map::new(),
            keybindings: empty_object(),
            extensions: Vec::new(),
            snippets: BTreeMap::new(),
        }
    }

    /// Serialize to the pretty-printed wire format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse the wire format.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new("")
    }
}

/// Identity of one installed extension.
///
/// `version` and `publisher` are only serialized when they were known at
/// collection time; the accessors fall back to `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionRecord {
    #[serde(default = "unknown", deserialize_with = "string_or_unknown")]
    pub name: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_none"
    )]
    pub version: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_none"
    )]
    pub publisher: Option<String>,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

// Lenient readers for hand-edited or foreign blobs: a value of the wrong
// type falls back to the field's empty value instead of failing the pull.

fn string_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_unknown<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(string_or_none(d)?.unwrap_or_else(unknown))
}

fn object_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

fn snippet_files<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, Value>, D::Error> {
    Ok(object_or_empty(d)?.into_iter().collect())
}

/// Object entries become records; anything else in the list is dropped.
fn readable_extensions<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Vec<ExtensionRecord>, D::Error> {
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

impl ExtensionRecord {
    /// A record for an extension directory without a usable manifest.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            publisher: None,
        }
    }

    /// A record built from manifest fields.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            publisher: Some(publisher.into()),
        }
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn publisher(&self) -> &str {
        self.publisher.as_deref().unwrap_or(UNKNOWN)
    }

    /// Human-readable form, e.g. `ms-python.python (v2024.1.0)`.
    pub fn display_line(&self) -> String {
        format!("{}.{} (v{})", self.publisher(), self.name, self.version())
    }
}

/// Whether a value counts as "nothing to apply".
///
/// Mirrors the truthiness the sync format has always used: `null`, `false`,
/// zero, the empty string and empty containers are all blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_keys() {
        let mut snapshot = Snapshot::new("Linux");
        snapshot.settings.insert("editor.fontSize".into(), json!(14));
        let value = serde_json::to_value(&snapshot).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            ["extensions", "keybindings", "platform", "settings", "snippets", "version"]
        );
        assert_eq!(obj["version"], "1.0");
        assert_eq!(obj["platform"], "Linux");
    }

    #[test]
    fn test_reads_fixture_from_older_writer() {
        let text = r#"{
            "version": "1.0",
            "platform": "Windows",
            "settings": {"editor.fontSize": 14, "editor.fontFamily": "Consolas"},
            "keybindings": [{"key": "ctrl+r", "command": "workbench.action.reloadWindow"}],
            "extensions": [
                {"name": "test-extension", "version": "1.0.0", "publisher": "test-publisher"},
                {"name": "test-extension-no-package"}
            ],
            "snippets": {"python": {"prefix": "py", "body": ["print($1)"]}}
        }"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert_eq!(snapshot.origin_platform, "Windows");
        assert_eq!(snapshot.settings["editor.fontSize"], 14);
        assert_eq!(snapshot.keybindings[0]["key"], "ctrl+r");
        assert_eq!(snapshot.extensions.len(), 2);
        assert_eq!(snapshot.extensions[1].version(), "unknown");
        assert_eq!(snapshot.snippets["python"]["prefix"], "py");
    }

    #[test]
    fn test_missing_keys_take_zero_values() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert_eq!(snapshot.format_version, SNAPSHOT_VERSION);
        assert!(snapshot.settings.is_empty());
        assert_eq!(snapshot.keybindings, json!({}));
        assert!(snapshot.extensions.is_empty());
        assert!(snapshot.snippets.is_empty());
    }

    #[test]
    fn test_unknown_version_is_accepted() {
        let snapshot = Snapshot::from_json(r#"{"version": "9.9-beta", "extra": true}"#).unwrap();
        assert_eq!(snapshot.format_version, "9.9-beta");
    }

    #[test]
    fn test_keybindings_accept_any_shape() {
        let snapshot = Snapshot::from_json(r#"{"keybindings": "odd"}"#).unwrap();
        assert_eq!(snapshot.keybindings, json!("odd"));
        let back = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_wrongly_typed_extension_fields_fall_back() {
        let text = r#"{"extensions": [
            {"name": null, "version": 3, "publisher": "acme"},
            {"name": "tool", "version": ["1"], "publisher": false},
            "just-a-string",
            {"version": "2.0"}
        ]}"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert_eq!(snapshot.extensions.len(), 3);

        assert_eq!(snapshot.extensions[0].name, "unknown");
        assert_eq!(snapshot.extensions[0].version(), "unknown");
        assert_eq!(snapshot.extensions[0].publisher(), "acme");

        assert_eq!(snapshot.extensions[1].display_line(), "unknown.tool (vunknown)");
        assert_eq!(snapshot.extensions[2].name, "unknown");
        assert_eq!(snapshot.extensions[2].version(), "2.0");
    }

    #[test]
    fn test_wrongly_typed_sections_take_zero_values() {
        let text = r#"{
            "settings": ["not", "an", "object"],
            "extensions": {"name": "x"},
            "snippets": "none",
            "keybindings": [{"key": "k"}]
        }"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert!(snapshot.settings.is_empty());
        assert!(snapshot.extensions.is_empty());
        assert!(snapshot.snippets.is_empty());
        assert_eq!(snapshot.keybindings, json!([{"key": "k"}]));
    }

    #[test]
    fn test_settings_keep_source_key_order() {
        let snapshot =
            Snapshot::from_json(r#"{"settings": {"z.last": 1, "a.first": 2, "m.mid": 3}}"#).unwrap();
        let keys: Vec<_> = snapshot.settings.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z.last", "a.first", "m.mid"]);
    }

    #[test]
    fn test_bare_extension_serializes_name_only() {
        let record = ExtensionRecord::bare("foo-bar");
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"name": "foo-bar"}));
        assert_eq!(record.version(), "unknown");
        assert_eq!(record.publisher(), "unknown");
    }

    #[test]
    fn test_display_line() {
        let record = ExtensionRecord::new("python", "2024.1.0", "ms-python");
        assert_eq!(record.display_line(), "ms-python.python (v2024.1.0)");
        assert_eq!(
            ExtensionRecord::bare("foo").display_line(),
            "unknown.foo (vunknown)"
        );
    }

    #[test]
    fn test_is_blank() {
        for v in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(is_blank(&v), "{v} should be blank");
        }
        for v in [json!(true), json!(1), json!("x"), json!([1]), json!({"a": 1})] {
            assert!(!is_blank(&v), "{v} should not be blank");
        }
    }
}
