//! Per-registry proxy config derivation
//!
//! Takes the shared `registry.baseConfig` template and one registry
//! descriptor, and produces that registry's fully-resolved config file
//! content. The template is never mutated; the caller still clones it per
//! registry so one registry's derivation can never bleed into the next.

use serde_yaml::Value;

use crate::config::{RegistryDescriptor, RegistryKind};
use crate::error::{ConfigError, GenerateError};
use crate::interpolate::interpolate;

/// Derive one registry's config from the base template.
///
/// For cache registries the `proxy` section (when the template has one)
/// gets the upstream URL, credentials and TTL filled in. Credentials are
/// all-or-nothing: unless both username and password are present and
/// non-empty, neither is emitted. For plain `type: registry` entries the
/// `proxy` section is dropped entirely.
///
/// After interpolation, a `redis` section (when present) gets its `db`
/// field overwritten with `slot`, the registry's logical-database number.
/// Sections absent from the template are never materialized.
pub fn derive_registry_config(
    template: &Value,
    registry: &RegistryDescriptor,
    slot: usize,
) -> Result<Value, GenerateError> {
    let mut config = template.clone();

    match registry.kind() {
        RegistryKind::Registry => {
            if let Some(map) = config.as_mapping_mut() {
                map.retain(|key, _| key.as_str() != Some("proxy"));
            }
        }
        RegistryKind::Cache => {
            if let Some(proxy) = config.get_mut("proxy").and_then(Value::as_mapping_mut) {
                let url = registry.url.as_deref().ok_or_else(|| ConfigError::MissingKey {
                    key: format!("registries[{}].url", registry.name),
                })?;
                proxy.insert("remoteurl".into(), url.into());

                match (&registry.username, &registry.password) {
                    (Some(username), Some(password))
                        if !username.is_empty() && !password.is_empty() =>
                    {
                        proxy.insert("username".into(), username.as_str().into());
                        proxy.insert("password".into(), password.as_str().into());
                    }
                    _ => {}
                }

                if let Some(ttl) = &registry.ttl {
                    proxy.insert("ttl".into(), ttl.as_str().into());
                }
            }
        }
    }

    let mut resolved = interpolate(&config, &registry.variables(true))?;

    if let Some(redis) = resolved.get_mut("redis").and_then(Value::as_mapping_mut) {
        redis.insert("db".into(), Value::from(slot as u64));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn registry(text: &str) -> RegistryDescriptor {
        serde_yaml::from_str(text).unwrap()
    }

    const TEMPLATE: &str = r#"
version: 0.1
proxy:
  remoteurl: placeholder
redis:
  addr: redis:6379
  db: 0
"#;

    #[test]
    fn test_cache_registry_full_credentials() {
        let reg = registry(
            "name: example\ntype: cache\nurl: https://example.com\nusername: user\npassword: pass\nttl: 24h",
        );
        let config = derive_registry_config(&yaml(TEMPLATE), &reg, 2).unwrap();
        assert_eq!(config["proxy"]["remoteurl"], yaml("https://example.com"));
        assert_eq!(config["proxy"]["username"], yaml("user"));
        assert_eq!(config["proxy"]["password"], yaml("pass"));
        assert_eq!(config["proxy"]["ttl"], yaml("24h"));
        assert_eq!(config["redis"]["db"], Value::from(2u64));
    }

    #[test]
    fn test_partial_credentials_emit_neither() {
        for partial in [
            "name: a\nurl: https://example.com\nusername: user",
            "name: a\nurl: https://example.com\npassword: pass",
            "name: a\nurl: https://example.com\nusername: user\npassword: ''",
            "name: a\nurl: https://example.com\nusername: ''\npassword: pass",
        ] {
            let config = derive_registry_config(&yaml(TEMPLATE), &registry(partial), 0).unwrap();
            let proxy = config["proxy"].as_mapping().unwrap();
            assert!(!proxy.contains_key("username"), "input: {}", partial);
            assert!(!proxy.contains_key("password"), "input: {}", partial);
        }
    }

    #[test]
    fn test_ttl_only_when_present() {
        let reg = registry("name: a\nurl: https://example.com");
        let config = derive_registry_config(&yaml(TEMPLATE), &reg, 0).unwrap();
        assert!(!config["proxy"].as_mapping().unwrap().contains_key("ttl"));
    }

    #[test]
    fn test_registry_kind_drops_proxy_section() {
        let reg = registry("name: private\ntype: registry");
        let config = derive_registry_config(&yaml(TEMPLATE), &reg, 1).unwrap();
        assert!(config.get("proxy").is_none());
        assert_eq!(config["redis"]["db"], Value::from(1u64));
    }

    #[test]
    fn test_missing_url_for_cache_is_an_error() {
        let reg = registry("name: docker");
        let err = derive_registry_config(&yaml(TEMPLATE), &reg, 0).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Config(ConfigError::MissingKey { ref key })
                if key == "registries[docker].url"
        ));
    }

    #[test]
    fn test_no_redis_section_stays_absent() {
        let template = yaml("version: 0.1\nproxy:\n  remoteurl: placeholder");
        let reg = registry("name: a\nurl: https://example.com");
        let config = derive_registry_config(&template, &reg, 3).unwrap();
        assert!(config.get("redis").is_none());
    }

    #[test]
    fn test_no_proxy_section_stays_absent() {
        let template = yaml("version: 0.1\nredis:\n  db: 0");
        let reg = registry("name: a\nurl: https://example.com");
        let config = derive_registry_config(&template, &reg, 0).unwrap();
        assert!(config.get("proxy").is_none());
        assert_eq!(config["redis"]["db"], Value::from(0u64));
    }

    #[test]
    fn test_template_placeholders_resolve_against_registry() {
        let template = yaml("log:\n  fields:\n    service: 'registry-{name}'\nproxy: {}");
        let reg = registry("name: docker\nurl: https://example.com");
        let config = derive_registry_config(&template, &reg, 0).unwrap();
        assert_eq!(config["log"]["fields"]["service"], yaml("registry-docker"));
    }

    #[test]
    fn test_template_not_mutated() {
        let template = yaml(TEMPLATE);
        let before = template.clone();
        let reg = registry("name: a\nurl: https://example.com\nusername: u\npassword: p");
        derive_registry_config(&template, &reg, 5).unwrap();
        assert_eq!(template, before);
    }
}
