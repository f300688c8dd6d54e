//! Rendering a resolved configuration for the training script

use serde_json::{json, Map};

use super::merge::{ResolvedConfig, Source};
use crate::domain::Value;
use crate::utils::{args_fingerprint, join_command};

impl ResolvedConfig {
    /// Arguments handed to the training script.
    ///
    /// Only options that were set (or derived) are passed; the script applies
    /// its own defaults for the rest.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for field in self.fields() {
            if !field.spec.forward || field.source == Source::Default {
                continue;
            }
            match &field.value {
                Value::Null => continue,
                Value::List(items) if items.is_empty() => continue,
                Value::Map(map) if map.is_empty() => continue,
                Value::List(items) => {
                    args.push(format!("--{}", field.spec.name));
                    args.extend(items.iter().map(Value::to_string));
                }
                value => {
                    args.push(format!("--{}", field.spec.name));
                    args.push(value.to_string());
                }
            }
        }
        args
    }

    pub fn to_command_string(&self) -> String {
        join_command(&self.to_args())
    }

    pub fn fingerprint(&self) -> String {
        args_fingerprint(&self.to_args())
    }

    /// Every option with its value and source, grouped by argument group.
    pub fn to_json(&self) -> serde_json::Value {
        let mut groups = Map::new();
        for group in self.groups() {
            let mut fields = Map::new();
            for field in &group.fields {
                fields.insert(
                    field.spec.name.to_string(),
                    json!({ "value": field.value.to_json(), "source": field.source }),
                );
            }
            groups.insert(group.spec.name.to_string(), serde_json::Value::Object(fields));
        }

        json!({
            "mode": self.mode(),
            "config_file": self.config_path().map(|p| p.display().to_string()),
            "groups": groups,
            "env": self.env(),
        })
    }
}
