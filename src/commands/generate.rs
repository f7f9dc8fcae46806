//! Generate command: the one-shot configuration pass
//!
//! Loads the input document, derives every registry's config, merges the
//! compose/traefik fragments into the shared base documents, and writes
//! all output files. Fail-fast: the first error aborts the whole run.
//!
//! Registries are processed strictly in declaration order because the
//! Redis database slot is assigned by position. Reordering the list
//! reassigns slots on the next run.

use std::path::Path;

use anyhow::{Context, Result};
use serde_yaml::Value;
use tracing::info;

use crate::config::{InputConfig, RegistryDescriptor};
use crate::derive::derive_registry_config;
use crate::error::ConfigError;
use crate::fragment::build_fragment;
use crate::output;
use crate::ui;

/// Legacy compose filename from before the `compose.yaml` rename.
const LEGACY_COMPOSE_FILE: &str = "docker-compose.yml";

pub fn execute(config_path: &str, output_dir: &str, assume_yes: bool) -> Result<()> {
    let input = InputConfig::load(Path::new(config_path))?;
    ui::print_success("Config loaded successfully");

    let outdir = Path::new(output_dir);
    if output::ensure_output_dirs(outdir)? {
        ui::print_success("Output directory created");
    } else {
        ui::print_warning("Output directory already exists");
    }

    let mut compose_doc = input.docker_base.clone();
    let mut traefik_doc = input.traefik_base.clone();

    for (slot, registry) in input.registries.iter().enumerate() {
        let name = &registry.name;
        if registry.kind.is_none() {
            ui::print_warning(&format!(
                "No type specified for registry {}, defaulting to cache",
                name
            ));
        }

        let registry_config = derive_registry_config(&input.registry_base, registry, slot)
            .with_context(|| format!("Failed to derive registry configuration for {}", name))?;
        output::write_yaml_file(&outdir.join(format!("{}.yaml", name)), &registry_config)?;
        ui::print_success(&format!("Registry configuration file created for {}", name));

        insert_fragments(registry, &input, &mut compose_doc, &mut traefik_doc)
            .with_context(|| format!("Failed to build compose/traefik entries for {}", name))?;
        ui::print_success(&format!(
            "Docker-compose and traefik configuration created for {}",
            name
        ));
    }

    output::write_yaml_file(&outdir.join("compose.yaml"), &compose_doc)?;
    output::write_yaml_file(&outdir.join("traefik.yaml"), &traefik_doc)?;
    output::write_text_file(
        &outdir.join("redis.conf"),
        &format!("databases {}", input.registries.len()),
    )?;

    remove_legacy_compose_file(outdir, assume_yes)?;

    if output::write_http_secret(outdir)? {
        info!("registry HTTP secret generated");
    }

    ui::print_success("Configuration files written successfully");
    Ok(())
}

/// Merge one registry's fragments into the shared documents.
///
/// Fragments resolve against the password-stripped variable set; only the
/// per-registry config derived above ever sees the password.
fn insert_fragments(
    registry: &RegistryDescriptor,
    input: &InputConfig,
    compose_doc: &mut Value,
    traefik_doc: &mut Value,
) -> Result<()> {
    let name = Value::from(registry.name.as_str());

    let service = build_fragment(registry, &input.compose_fragment)?;
    section_mut(compose_doc, "services", "docker.baseConfig.services")?
        .insert(name.clone(), service);

    let router = build_fragment(registry, &input.router_fragment)?;
    section_mut(traefik_doc, "http.routers", "traefik.baseConfig.http.routers")?
        .insert(name.clone(), router);

    let traefik_service = build_fragment(registry, &input.service_fragment)?;
    section_mut(traefik_doc, "http.services", "traefik.baseConfig.http.services")?
        .insert(name, traefik_service);

    Ok(())
}

/// Navigate to a mapping inside an accumulator document.
fn section_mut<'a>(
    doc: &'a mut Value,
    path: &str,
    reported: &str,
) -> Result<&'a mut serde_yaml::Mapping, ConfigError> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.get_mut(segment).ok_or_else(|| ConfigError::MissingKey {
            key: reported.to_string(),
        })?;
    }
    current.as_mapping_mut().ok_or_else(|| ConfigError::MissingKey {
        key: reported.to_string(),
    })
}

/// Offer to delete the deprecated docker-compose.yml from older releases.
fn remove_legacy_compose_file(outdir: &Path, assume_yes: bool) -> Result<()> {
    let legacy_path = outdir.join(LEGACY_COMPOSE_FILE);
    if !legacy_path.exists() {
        return Ok(());
    }

    let remove = assume_yes
        || ui::confirm(
            "docker-compose.yml exists and compose.yaml is now used. Remove the deprecated file?",
            true,
        )?;

    if remove {
        std::fs::remove_file(&legacy_path)
            .with_context(|| format!("Failed to remove {}", legacy_path.display()))?;
        ui::print_info("Existing docker-compose.yml file removed");
    } else {
        ui::print_warning("docker-compose.yml file not removed");
    }
    Ok(())
}
