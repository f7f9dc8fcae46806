//! Registry descriptor: one upstream registry declared in the input document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// What kind of registry this entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// Pull-through cache for an upstream registry (proxy section emitted)
    Cache,
    /// Plain hosted registry, no upstream to proxy
    Registry,
}

impl RegistryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Cache => "cache",
            RegistryKind::Registry => "registry",
        }
    }
}

/// One entry of the `registries` list in the input document.
///
/// Every string-valued field declared here, known or not, becomes an
/// interpolation variable for that registry's templates. Unknown fields
/// land in `extra` so users can declare their own variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryDescriptor {
    /// Unique registry name, used as map key and `{name}` variable
    pub name: String,

    /// Registry kind. Old config files omit this; `kind()` defaults to
    /// cache for backward compatibility.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RegistryKind>,

    /// Upstream URL to proxy (required for cache registries)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Upstream credentials. Emitted into the proxy config only when
    /// both are present and non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Cache TTL for proxied content (e.g., "720h")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,

    /// Any additional user-declared fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RegistryDescriptor {
    /// Effective kind, defaulting to cache when the input omitted `type`.
    pub fn kind(&self) -> RegistryKind {
        self.kind.unwrap_or(RegistryKind::Cache)
    }

    /// The interpolation variable set for this registry.
    ///
    /// The password is included only for the secret-bearing registry
    /// config; compose and traefik fragments are built without it so it
    /// cannot leak into less-restricted output files.
    pub fn variables(&self, include_password: bool) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("name".to_string(), self.name.clone());
        vars.insert("type".to_string(), self.kind().as_str().to_string());

        if let Some(url) = &self.url {
            vars.insert("url".to_string(), url.clone());
        }
        if let Some(username) = &self.username {
            vars.insert("username".to_string(), username.clone());
        }
        if include_password {
            if let Some(password) = &self.password {
                vars.insert("password".to_string(), password.clone());
            }
        }
        if let Some(ttl) = &self.ttl {
            vars.insert("ttl".to_string(), ttl.clone());
        }

        for (key, value) in &self.extra {
            if let Some(text) = scalar_to_string(value) {
                vars.insert(key.clone(), text);
            }
        }

        vars
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
