//! Placeholder interpolation for YAML templates
//!
//! Templates are arbitrary YAML trees whose strings may contain `{name}`
//! placeholders. Interpolation resolves every placeholder against a flat
//! variable set and returns a new tree; the input is never mutated.
//!
//! Substitution is single-pass: a substituted value that itself contains
//! `{other}` is not re-expanded. `{{` and `}}` escape to literal braces.

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};

use crate::error::InterpolateError;

/// Recursively resolve every placeholder in `template` against `vars`.
///
/// Mappings keep their key set and insertion order, sequences keep their
/// length and order, and non-string scalars pass through unchanged. Keys
/// are never interpolated, only values.
pub fn interpolate(
    template: &Value,
    vars: &BTreeMap<String, String>,
) -> Result<Value, InterpolateError> {
    match template {
        Value::String(text) => Ok(Value::String(substitute(text, vars)?)),
        Value::Mapping(map) => {
            let mut resolved = Mapping::with_capacity(map.len());
            for (key, value) in map {
                resolved.insert(key.clone(), interpolate(value, vars)?);
            }
            Ok(Value::Mapping(resolved))
        }
        Value::Sequence(seq) => {
            let resolved = seq
                .iter()
                .map(|element| interpolate(element, vars))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Sequence(resolved))
        }
        other => Ok(other.clone()),
    }
}

/// Substitute `{name}` placeholders in a single string.
fn substitute(text: &str, vars: &BTreeMap<String, String>) -> Result<String, InterpolateError> {
    let mut resolved = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    resolved.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(inner) => name.push(inner),
                        None => {
                            return Err(InterpolateError::UnmatchedBrace {
                                text: text.to_string(),
                            })
                        }
                    }
                }
                let value = vars
                    .get(&name)
                    .ok_or(InterpolateError::MissingVariable { name })?;
                resolved.push_str(value);
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    resolved.push('}');
                } else {
                    return Err(InterpolateError::UnmatchedBrace {
                        text: text.to_string(),
                    });
                }
            }
            _ => resolved.push(ch),
        }
    }

    Ok(resolved)
}
