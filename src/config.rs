use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Connection profiles plus the external commands that migrate and seed them.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub migrate: Vec<String>,
    #[serde(default)]
    pub seed: Vec<String>,
    pub connections: BTreeMap<String, ConnectionProfile>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub driver: String,
    /// Database name, or the database file for sqlite.
    pub database: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ConnectionProfile {
    // Templated fields whose variable is unset render as "", which means "not set".
    fn normalize(&mut self) {
        for field in [&mut self.host, &mut self.username, &mut self.password] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }
    }
}

fn render_template(content: &str, connection: &str, seed_class: &str) -> Result<String> {
    let env_map: BTreeMap<String, String> = std::env::vars().collect();
    let mut jinja_env = minijinja::Environment::new();
    jinja_env.set_undefined_behavior(minijinja::UndefinedBehavior::Lenient);
    jinja_env
        .add_template("config", content)
        .map_err(|e| Error::Config(format!("parsing config template: {}", e)))?;
    let tmpl = jinja_env
        .get_template("config")
        .map_err(|e| Error::Config(format!("getting config template: {}", e)))?;
    tmpl.render(minijinja::context!(
        env => env_map,
        connection => connection,
        seed_class => seed_class
    ))
    .map_err(|e| Error::Config(format!("rendering config template: {}", e)))
}

impl Config {
    /// Reads, renders and parses the config file. `connection` and `seed_class`
    /// are exposed to the template alongside `env`.
    pub fn load(path: &str, connection: &str, seed_class: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading config '{}'", path), e))?;
        let rendered = render_template(&content, connection, seed_class)?;
        if path.ends_with(".json") {
            Self::from_json(&rendered)
        } else {
            Self::from_yaml(&rendered)
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("parsing config YAML: {}", e)))?;
        cfg.finish()
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("parsing config JSON: {}", e)))?;
        cfg.finish()
    }

    fn finish(mut self) -> Result<Self> {
        self.migrate.retain(|a| !a.is_empty());
        self.seed.retain(|a| !a.is_empty());
        for profile in self.connections.values_mut() {
            profile.normalize();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.migrate.is_empty() {
            return Err(Error::Config("config must define a migrate command".into()));
        }
        if self.connections.is_empty() {
            return Err(Error::Config(
                "config must define at least one connection".into(),
            ));
        }
        for (name, profile) in &self.connections {
            if profile.driver.is_empty() {
                return Err(Error::Config(format!(
                    "connection '{}' has no driver",
                    name
                )));
            }
            if profile.database.is_empty() {
                return Err(Error::Config(format!(
                    "connection '{}' has no database",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn profile(&self, name: &str) -> Result<&ConnectionProfile> {
        self.connections.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.connections.keys().map(String::as_str).collect();
            Error::Config(format!(
                "unknown connection '{}' (configured: {})",
                name,
                known.join(", ")
            ))
        })
    }
}
