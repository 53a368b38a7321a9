//! The uniform value tree every source converts into.

use std::collections::BTreeMap;

use serde::ser::{Error as _, Serialize, Serializer};

/// A string-keyed mapping of values.
pub type Mapping = BTreeMap<String, Value>;

/// A configuration value.
///
/// YAML and TOML documents, serde values and struct defaults all convert
/// into this one shape, so path lookup never has to know where a tree came
/// from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    /// An integer above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// Returns `true` for sequences and mappings.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a decoded YAML value.
    ///
    /// Scalar mapping keys are stringified; a sequence or mapping used as a
    /// key is rejected and returned as the error.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, String> {
        use serde_yaml::Value as Yaml;

        Ok(match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(u)) => Value::Unsigned(u),
                _ => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(seq) => Value::Sequence(
                seq.into_iter()
                    .map(Value::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(map) => {
                let mut out = Mapping::new();
                for (key, value) in map {
                    let key = match key {
                        Yaml::String(s) => s,
                        Yaml::Bool(b) => b.to_string(),
                        Yaml::Number(n) => n.to_string(),
                        Yaml::Null => "null".to_string(),
                        other => return Err(format!("{other:?}")),
                    };
                    out.insert(key, Value::from_yaml(value)?);
                }
                Value::Mapping(out)
            }
            Yaml::Tagged(tagged) => Value::from_yaml(tagged.value)?,
        })
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => Value::Sequence(arr.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => {
                Value::Mapping(table.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(u)) => Value::Unsigned(u),
                _ => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(arr) => Value::Sequence(arr.into_iter().map(Value::from).collect()),
            Json::Object(obj) => {
                Value::Mapping(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Value::Integer(i.into())
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Unsigned(u),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Unsigned(u) => serializer.serialize_u64(*u),
            Value::Float(f) if !f.is_finite() => {
                Err(S::Error::custom(format!("unsupported float value: {f}")))
            }
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(seq) => serializer.collect_seq(seq),
            Value::Mapping(map) => serializer.collect_map(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_conversion() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("name: app\nport: 8080\nratio: 0.5\ntags: [a, b]\n1: one\n")
                .unwrap();
        let value = Value::from_yaml(yaml).unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map["name"], Value::from("app"));
        assert_eq!(map["port"], Value::Integer(8080));
        assert_eq!(map["ratio"], Value::Float(0.5));
        assert_eq!(map["tags"], Value::from(vec!["a", "b"]));
        assert_eq!(map["1"], Value::from("one"));
    }

    #[test]
    fn test_yaml_rejects_composite_key() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: value\n").unwrap();
        assert!(Value::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_integers_beyond_i64_stay_exact() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("big: 18446744073709551615\nsmall: 7\n").unwrap();
        let value = Value::from_yaml(yaml).unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map["big"], Value::Unsigned(u64::MAX));
        assert_eq!(map["small"], Value::Integer(7));

        let json: serde_json::Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(Value::from(json), Value::Unsigned(u64::MAX));

        assert_eq!(Value::from(u64::MAX), Value::Unsigned(u64::MAX));
        assert_eq!(Value::from(5_u64), Value::Integer(5));
        assert_eq!(
            serde_json::to_string(&Value::Unsigned(u64::MAX)).unwrap(),
            "18446744073709551615"
        );
    }

    #[test]
    fn test_toml_conversion() {
        let table: toml::Table =
            toml::from_str("[server]\nhost = \"localhost\"\nport = 80").unwrap();
        let value = Value::from(toml::Value::Table(table));
        let server = value.as_mapping().unwrap()["server"].as_mapping().unwrap();

        assert_eq!(server["host"], Value::from("localhost"));
        assert_eq!(server["port"], Value::Integer(80));
    }

    #[test]
    fn test_serialize_rejects_non_finite_float() {
        assert!(serde_json::to_string(&Value::Float(f64::NAN)).is_err());
        assert_eq!(serde_json::to_string(&Value::Float(1.5)).unwrap(), "1.5");
    }
}
