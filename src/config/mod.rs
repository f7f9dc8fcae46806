//! Input document loading
//!
//! The whole run is driven by a single `config.yaml` with these required
//! top-level sections:
//!
//! 1. **registries** — ordered list of registry descriptors
//! 2. **docker.baseConfig** / **docker.perRegistry.compose** — compose
//!    accumulator and per-registry service template
//! 3. **traefik.baseConfig** / **traefik.perRegistry.{router,service}** —
//!    dynamic-config accumulator and per-registry templates
//! 4. **registry.baseConfig** — proxy/cache config template, cloned per
//!    registry
//!
//! Any missing section is a fatal error reported by its dotted path.

mod registry;

pub use registry::{RegistryDescriptor, RegistryKind};

use std::collections::HashSet;
use std::io;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// Fully-extracted input document.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Registries in declaration order. Order matters: the Redis database
    /// slot is assigned by position.
    pub registries: Vec<RegistryDescriptor>,

    /// Compose accumulator; must contain a `services` mapping.
    pub docker_base: Value,

    /// Per-registry compose service template.
    pub compose_fragment: Mapping,

    /// Traefik accumulator; must contain `http.routers` and `http.services`.
    pub traefik_base: Value,

    /// Per-registry traefik router template.
    pub router_fragment: Mapping,

    /// Per-registry traefik service template.
    pub service_fragment: Mapping,

    /// Per-registry proxy config template.
    pub registry_base: Value,
}

impl InputConfig {
    /// Load and validate the input document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::ParseError {
                message: format!("failed to read {}: {}", path.display(), err),
            },
        })?;

        let doc: Value = serde_yaml::from_str(&content).map_err(|err| ConfigError::ParseError {
            message: format!("{}: {}", path.display(), err),
        })?;

        Self::from_document(&doc)
    }

    /// Extract the required sections from an already-parsed document.
    pub fn from_document(doc: &Value) -> Result<Self, ConfigError> {
        let registries: Vec<RegistryDescriptor> =
            serde_yaml::from_value(require(doc, "registries")?.clone()).map_err(|err| {
                ConfigError::ParseError {
                    message: format!("registries: {}", err),
                }
            })?;

        let mut seen = HashSet::new();
        for registry in &registries {
            if !seen.insert(registry.name.as_str()) {
                return Err(ConfigError::DuplicateRegistry {
                    name: registry.name.clone(),
                });
            }
        }

        let docker_base = require(doc, "docker.baseConfig")?.clone();
        require(doc, "docker.baseConfig.services")?;
        let traefik_base = require(doc, "traefik.baseConfig")?.clone();
        require(doc, "traefik.baseConfig.http.routers")?;
        require(doc, "traefik.baseConfig.http.services")?;

        Ok(Self {
            registries,
            docker_base,
            compose_fragment: fragment(doc, "docker.perRegistry.compose")?,
            traefik_base,
            router_fragment: fragment(doc, "traefik.perRegistry.router")?,
            service_fragment: fragment(doc, "traefik.perRegistry.service")?,
            registry_base: require(doc, "registry.baseConfig")?.clone(),
        })
    }
}

/// Walk a dotted path into the document, reporting the full path on a miss.
fn require<'a>(doc: &'a Value, key: &str) -> Result<&'a Value, ConfigError> {
    let mut current = doc;
    for segment in key.split('.') {
        current = current
            .get(segment)
            .ok_or_else(|| ConfigError::MissingKey {
                key: key.to_string(),
            })?;
    }
    Ok(current)
}

/// A per-registry customization template: a mapping, or null for "no
/// customization".
fn fragment(doc: &Value, key: &str) -> Result<Mapping, ConfigError> {
    match require(doc, key)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map.clone()),
        _ => Err(ConfigError::ParseError {
            message: format!("{} must be a mapping", key),
        }),
    }
}
