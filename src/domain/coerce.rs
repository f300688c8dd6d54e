//! Coercion of raw values into the kind a field declares

use super::{FieldKind, FieldSpec, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("'{value}' is not one of [{choices}]")]
    NotAChoice { value: String, choices: String },

    #[error("value must not be null")]
    NullNotAllowed,
}

/// Boolean spellings accepted on the command line and in config strings.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "t" | "y" | "1" => Some(true),
        "false" | "no" | "f" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn mismatch(spec: &FieldSpec, found: impl Into<String>) -> CoerceError {
    CoerceError::TypeMismatch { expected: spec.kind.describe(), found: found.into() }
}

fn check_choice(options: &[&str], raw: &str) -> Result<Value, CoerceError> {
    if options.contains(&raw) {
        Ok(Value::Str(raw.to_string()))
    } else {
        Err(CoerceError::NotAChoice { value: raw.to_string(), choices: options.join(", ") })
    }
}

fn parse_json_object(spec: &FieldSpec, raw: &str) -> Result<Value, CoerceError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json @ serde_json::Value::Object(_)) => Ok(Value::from_json(json)),
        _ => Err(mismatch(spec, format!("'{}'", raw))),
    }
}

/// Coerce one CLI token.
pub fn coerce_str(spec: &FieldSpec, raw: &str) -> Result<Value, CoerceError> {
    match spec.kind {
        FieldKind::Bool => parse_bool(raw).map(Value::Bool).ok_or_else(|| mismatch(spec, raw)),
        FieldKind::Int => raw.trim().parse::<i64>().map(Value::Int).map_err(|_| mismatch(spec, raw)),
        FieldKind::Float => match raw.trim().parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Value::Float(x)),
            _ => Err(mismatch(spec, raw)),
        },
        FieldKind::Str => Ok(Value::Str(raw.to_string())),
        FieldKind::Choice(options) => check_choice(options, raw),
        FieldKind::StrList => Ok(Value::List(vec![Value::Str(raw.to_string())])),
        FieldKind::Map => parse_json_object(spec, raw),
    }
}

/// Coerce the tokens following a CLI key. Only list fields take more than one.
pub fn coerce_tokens(spec: &FieldSpec, tokens: &[String]) -> Result<Value, CoerceError> {
    match (spec.kind, tokens) {
        (FieldKind::StrList, _) => {
            Ok(Value::List(tokens.iter().map(|t| Value::Str(t.clone())).collect()))
        }
        (_, [single]) => coerce_str(spec, single),
        _ => Err(mismatch(spec, format!("{} values", tokens.len()))),
    }
}

/// Coerce a value read from a config file.
pub fn coerce_value(spec: &FieldSpec, value: &Value) -> Result<Value, CoerceError> {
    if value.is_null() {
        return if spec.nullable { Ok(Value::Null) } else { Err(CoerceError::NullNotAllowed) };
    }

    match (spec.kind, value) {
        (FieldKind::Int | FieldKind::Float, Value::Float(x)) if !x.is_finite() => {
            Err(mismatch(spec, "a non-finite number"))
        }

        (FieldKind::Bool, Value::Bool(_)) => Ok(value.clone()),
        (FieldKind::Bool, Value::Str(s)) => coerce_str(spec, s),

        (FieldKind::Int, Value::Int(_)) => Ok(value.clone()),
        (FieldKind::Int, Value::Float(x)) if x.fract() == 0.0 => {
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            if *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                Ok(Value::Int(*x as i64))
            } else {
                Err(mismatch(spec, format!("{} (out of integer range)", x)))
            }
        }
        (FieldKind::Int, Value::Str(s)) => coerce_str(spec, s),

        (FieldKind::Float, Value::Float(_)) => Ok(value.clone()),
        (FieldKind::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
        // YAML 1.1 loaders read `1e-4` as a string.
        (FieldKind::Float, Value::Str(s)) => coerce_str(spec, s),

        (FieldKind::Str, Value::Str(_)) => Ok(value.clone()),
        (FieldKind::Str, Value::Bool(_) | Value::Int(_) | Value::Float(_)) => {
            Ok(Value::Str(value.to_string()))
        }

        (FieldKind::Choice(options), v) if v.is_scalar() => check_choice(options, &v.to_string()),

        (FieldKind::StrList, Value::List(items)) => items
            .iter()
            .map(|item| match item {
                Value::Str(_) => Ok(item.clone()),
                v if v.is_scalar() && !v.is_null() => Ok(Value::Str(v.to_string())),
                other => Err(mismatch(spec, format!("a list containing a {}", other.type_name()))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        (FieldKind::StrList, Value::Str(s)) => Ok(Value::List(vec![Value::Str(s.clone())])),

        (FieldKind::Map, Value::Map(_)) => Ok(value.clone()),
        (FieldKind::Map, Value::Str(s)) => parse_json_object(spec, s),

        (_, other) => Err(mismatch(spec, format!("a {}", other.type_name()))),
    }
}
