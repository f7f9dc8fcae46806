//! Compose / Traefik fragment builders
//!
//! A fragment is the per-registry entry merged into one of the shared
//! output documents: a compose service, a traefik router, or a traefik
//! service. All three are built the same way: start empty, shallow-merge
//! the per-registry customization template, resolve placeholders against
//! the registry's fields.
//!
//! Fragments always resolve against the password-stripped variable set.
//! Compose and traefik output files are typically less access-restricted
//! than the registry configs, so the password must not be resolvable
//! here; a `{password}` placeholder in a fragment template is a
//! MissingVariable error, not a leak.

use serde_yaml::{Mapping, Value};

use crate::config::RegistryDescriptor;
use crate::error::GenerateError;
use crate::interpolate::interpolate;

/// Build one fragment for `registry` from a customization template.
pub fn build_fragment(
    registry: &RegistryDescriptor,
    custom: &Mapping,
) -> Result<Value, GenerateError> {
    let mut fragment = Mapping::new();
    for (key, value) in custom {
        fragment.insert(key.clone(), value.clone());
    }
    Ok(interpolate(
        &Value::Mapping(fragment),
        &registry.variables(false),
    )?)
}
