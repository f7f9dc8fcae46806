//! Setup command: interactive config.yaml creation
//!
//! Walks the user through declaring registries, the public domain and the
//! storage backend, starting from the embedded sample document. Every
//! value entered for a registry becomes an interpolation variable for the
//! generate pass, so the wizard only fills in the `registries` list and a
//! couple of template-level settings; the rest of the sample carries
//! through unchanged.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};

use crate::output;
use crate::ui;

/// Default document the wizard starts from.
const SAMPLE_CONFIG: &str = include_str!("../../config.sample.yaml");

/// Answer source for the wizard, so tests can script a session.
pub trait Prompter {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String>;
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// Interactive prompter reading from stdin.
pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        ui::prompt(question, default)
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        ui::confirm(question, default)
    }
}

pub fn execute(config_path: &str, force: bool) -> Result<()> {
    run_setup(&mut TermPrompter, Path::new(config_path), force)
}

pub fn run_setup<P: Prompter>(prompter: &mut P, config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        let overwrite = prompter.confirm(
            &format!("{} already exists. Overwrite it?", config_path.display()),
            false,
        )?;
        if !overwrite {
            ui::print_warning("Setup cancelled, existing config kept");
            return Ok(());
        }
    }

    ui::print_success("Welcome to the mirrorgen setup");
    ui::print_info("This will create a config.yaml describing your registries.");
    ui::print_info("All registry values are usable in templates via {name}-style placeholders.");

    let mut config: Value =
        serde_yaml::from_str(SAMPLE_CONFIG).context("embedded sample config is invalid")?;

    let registries = collect_registries(prompter)?;
    config
        .as_mapping_mut()
        .context("embedded sample config is not a mapping")?
        .insert("registries".into(), Value::Sequence(registries));

    let domain = prompter.ask(
        "Enter the domain registries are served under (e.g., example.com)",
        Some("localhost"),
    )?;
    apply_domain(&mut config, &domain);

    let storage = collect_storage(prompter)?;
    set_storage(&mut config, storage)?;

    output::write_yaml_file(config_path, &config)?;
    ui::print_success(&format!("{} written", config_path.display()));
    ui::print_info("Run `mirrorgen generate` to produce the configuration files.");
    Ok(())
}

fn collect_registries<P: Prompter>(prompter: &mut P) -> Result<Vec<Value>> {
    let mut registries = Vec::new();

    loop {
        let name = prompter.ask("Enter the name for the registry", Some("docker"))?;
        let url = prompter.ask(
            &format!("Enter the URL for registry {}", name),
            Some("https://registry-1.docker.io"),
        )?;
        let username = prompter.ask(&format!("Enter the username for registry {}", name), None)?;
        let password = prompter.ask(&format!("Enter the password for registry {}", name), None)?;
        let ttl = prompter.ask(
            &format!("Enter the cache TTL for registry {}", name),
            Some("720h"),
        )?;

        if prompter.confirm("Is this correct?", true)? {
            let mut registry = Mapping::new();
            registry.insert("name".into(), name.into());
            registry.insert("type".into(), "cache".into());
            registry.insert("url".into(), url.into());
            if !username.is_empty() && !password.is_empty() {
                registry.insert("username".into(), username.into());
                registry.insert("password".into(), password.into());
            }
            registry.insert("ttl".into(), ttl.into());
            registries.push(Value::Mapping(registry));
        }

        if !prompter.confirm("Add another registry?", false)? {
            break;
        }
    }

    Ok(registries)
}

/// Storage backend for the registry template.
enum Storage {
    Filesystem,
    InMemory,
    S3 {
        bucket: String,
        region: String,
        accesskey: String,
        secretkey: String,
    },
    Gcs {
        bucket: String,
    },
}

fn collect_storage<P: Prompter>(prompter: &mut P) -> Result<Storage> {
    loop {
        let backend = prompter.ask(
            "Choose a storage backend (filesystem/inmemory/s3/gcs)",
            Some("filesystem"),
        )?;
        match backend.as_str() {
            "filesystem" => return Ok(Storage::Filesystem),
            "inmemory" => return Ok(Storage::InMemory),
            "s3" => {
                return Ok(Storage::S3 {
                    bucket: prompter.ask("Enter the S3 bucket name", None)?,
                    region: prompter.ask("Enter the S3 region", Some("us-east-1"))?,
                    accesskey: prompter.ask("Enter the S3 access key", None)?,
                    secretkey: prompter.ask("Enter the S3 secret key", None)?,
                })
            }
            "gcs" => {
                return Ok(Storage::Gcs {
                    bucket: prompter.ask("Enter the GCS bucket name", None)?,
                })
            }
            other => ui::print_warning(&format!("Unknown storage backend: {}", other)),
        }
    }
}

/// Bake the chosen domain into the traefik router template.
///
/// `{domain}` is a wizard-level placeholder, not a registry field, so it
/// must be resolved here; left in place it would be a MissingVariable
/// error on every generate run.
fn apply_domain(config: &mut Value, domain: &str) {
    if let Some(per_registry) = config
        .get_mut("traefik")
        .and_then(|t| t.get_mut("perRegistry"))
    {
        replace_in_strings(per_registry, "{domain}", domain);
    }
}

fn replace_in_strings(value: &mut Value, from: &str, to: &str) {
    match value {
        Value::String(text) => {
            if text.contains(from) {
                *text = text.replace(from, to);
            }
        }
        Value::Mapping(map) => {
            for (_, nested) in map.iter_mut() {
                replace_in_strings(nested, from, to);
            }
        }
        Value::Sequence(seq) => {
            for nested in seq {
                replace_in_strings(nested, from, to);
            }
        }
        _ => {}
    }
}

/// Replace the storage section of the registry template, keeping content
/// deletion enabled for garbage collection.
fn set_storage(config: &mut Value, storage: Storage) -> Result<()> {
    let backend_yaml = match storage {
        Storage::Filesystem => "filesystem:\n  rootdirectory: /var/lib/registry".to_string(),
        Storage::InMemory => "inmemory: {}".to_string(),
        Storage::S3 {
            bucket,
            region,
            accesskey,
            secretkey,
        } => format!(
            "s3:\n  bucket: {}\n  region: {}\n  accesskey: {}\n  secretkey: {}",
            bucket, region, accesskey, secretkey
        ),
        Storage::Gcs { bucket } => format!("gcs:\n  bucket: {}", bucket),
    };

    let mut section: Mapping = serde_yaml::from_str(&backend_yaml)?;
    section.insert(
        "delete".into(),
        serde_yaml::from_str("enabled: true").map(Value::Mapping)?,
    );

    let base = config
        .get_mut("registry")
        .and_then(|r| r.get_mut("baseConfig"))
        .and_then(Value::as_mapping_mut);
    match base {
        Some(base) => {
            base.insert("storage".into(), Value::Mapping(section));
            Ok(())
        }
        None => bail!("embedded sample config has no registry.baseConfig section"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs;

    /// Scripted answers: pop front for every ask/confirm.
    struct Scripted {
        answers: VecDeque<&'static str>,
        confirms: VecDeque<bool>,
    }

    impl Scripted {
        fn new(answers: &[&'static str], confirms: &[bool]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                confirms: confirms.iter().copied().collect(),
            }
        }
    }

    impl Prompter for Scripted {
        fn ask(&mut self, _question: &str, default: Option<&str>) -> Result<String> {
            let answer = self.answers.pop_front().expect("script ran out of answers");
            if answer.is_empty() {
                return Ok(default.unwrap_or("").to_string());
            }
            Ok(answer.to_string())
        }

        fn confirm(&mut self, _question: &str, _default: bool) -> Result<bool> {
            Ok(self.confirms.pop_front().expect("script ran out of confirms"))
        }
    }

    fn load(path: &Path) -> Value {
        serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_wizard_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");

        // One registry with defaults, credentials, confirm, no second
        // registry; domain; filesystem storage.
        let mut prompter = Scripted::new(
            &["", "", "user", "pass", "", "mirrors.example.com", ""],
            &[true, false],
        );
        run_setup(&mut prompter, &config_path, false).unwrap();

        let config = load(&config_path);
        let registries = config["registries"].as_sequence().unwrap();
        assert_eq!(registries.len(), 1);
        assert_eq!(registries[0]["name"], Value::from("docker"));
        assert_eq!(
            registries[0]["url"],
            Value::from("https://registry-1.docker.io")
        );
        assert_eq!(registries[0]["username"], Value::from("user"));
        assert_eq!(registries[0]["ttl"], Value::from("720h"));

        // Domain baked into the router rule, {name} left for generate.
        assert_eq!(
            config["traefik"]["perRegistry"]["router"]["rule"],
            Value::from("Host(`{name}.mirrors.example.com`)")
        );

        // The document must satisfy the generate-side loader.
        crate::config::InputConfig::from_document(&config).unwrap();
    }

    #[test]
    fn test_wizard_skips_empty_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");

        let mut prompter = Scripted::new(
            &["", "", "", "", "", "localhost", ""],
            &[true, false],
        );
        run_setup(&mut prompter, &config_path, false).unwrap();

        let config = load(&config_path);
        let registry = &config["registries"][0];
        assert!(registry.get("username").is_none());
        assert!(registry.get("password").is_none());
    }

    #[test]
    fn test_wizard_s3_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");

        let mut prompter = Scripted::new(
            &[
                "", "", "", "", "", "localhost", "s3", "my-bucket", "", "AKIA123", "secret",
            ],
            &[true, false],
        );
        run_setup(&mut prompter, &config_path, false).unwrap();

        let config = load(&config_path);
        let storage = &config["registry"]["baseConfig"]["storage"];
        assert_eq!(storage["s3"]["bucket"], Value::from("my-bucket"));
        assert_eq!(storage["s3"]["region"], Value::from("us-east-1"));
        assert_eq!(storage["delete"]["enabled"], Value::from(true));
        assert!(storage.get("filesystem").is_none());
    }

    #[test]
    fn test_wizard_refuses_to_clobber_without_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, "registries: []\n").unwrap();

        let mut prompter = Scripted::new(&[], &[false]);
        run_setup(&mut prompter, &config_path, false).unwrap();

        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "registries: []\n"
        );
    }

    #[test]
    fn test_declined_registry_is_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");

        // First registry declined, second accepted.
        let mut prompter = Scripted::new(
            &[
                "typo", "", "", "", "", // declined entry
                "docker", "", "", "", "", // accepted entry
                "localhost", "",
            ],
            &[false, true, true, false],
        );
        run_setup(&mut prompter, &config_path, false).unwrap();

        let config = load(&config_path);
        let registries = config["registries"].as_sequence().unwrap();
        assert_eq!(registries.len(), 1);
        assert_eq!(registries[0]["name"], Value::from("docker"));
    }
}
