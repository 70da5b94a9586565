// ABOUTME: Build section of the application config.
// ABOUTME: Unknown scalar keys under `build` fold into the builder args.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    pub builder: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
}

impl BuildConfig {
    /// Read a raw `build` table. Returns `None` when no builder is named.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let mut build = BuildConfig::default();

        for (key, value) in map {
            match key.as_str() {
                "builder" => build.builder = stringify(value),
                "args" => {
                    if let Value::Object(args) = value {
                        for (arg_key, arg_value) in args {
                            build.args.insert(arg_key.clone(), stringify(arg_value));
                        }
                    }
                }
                _ => {
                    build.args.insert(key.clone(), stringify(value));
                }
            }
        }

        if build.builder.is_empty() {
            None
        } else {
            Some(build)
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
