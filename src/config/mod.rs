//! Configuration loading and management

use crate::core::auth::{AuthPolicy, UserCredential};
use crate::core::error::ConfigError;
use crate::core::field::{FieldKind, FieldSpec};
use crate::core::record::Record;
use crate::core::validation::{ErrorMode, check_default, validate};
use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_token_ttl_secs() -> i64 {
    300
}

/// Longest accepted token lifetime: one year
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Route segments already taken by the token and health routes
const RESERVED_PLURALS: &[&str] = &["auth", "private", "health", "healthz"];

fn is_path_segment(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Configuration for one CRUD resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Singular form, used in messages (e.g., "user")
    pub singular: String,

    /// Plural form, used as the route segment (e.g., "subscribers")
    pub plural: String,

    /// Declared fields, in order
    pub fields: Vec<FieldSpec>,

    /// Report every failing field instead of only the first
    #[serde(default = "default_true")]
    pub bundle_errors: bool,

    #[serde(default)]
    pub auth: AuthPolicy,

    /// Records present at startup; each must carry an `id`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed: Vec<Map<String, Value>>,
}

impl ResourceDefinition {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
            fields,
            bundle_errors: true,
            auth: AuthPolicy::Public,
            seed: Vec::new(),
        }
    }

    pub fn with_auth(mut self, auth: AuthPolicy) -> Self {
        self.auth = auth;
        self
    }

    pub fn error_mode(&self) -> ErrorMode {
        ErrorMode::from_bundle_flag(self.bundle_errors)
    }

    /// Check field declarations and seed records
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.singular.trim().is_empty() || self.plural.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if !is_path_segment(&self.plural) {
            return Err(ConfigError::InvalidName {
                plural: self.plural.clone(),
            });
        }
        if RESERVED_PLURALS.contains(&self.plural.as_str()) {
            return Err(ConfigError::ReservedName {
                plural: self.plural.clone(),
            });
        }

        let mut names = HashSet::new();
        for spec in &self.fields {
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    resource: self.plural.clone(),
                    field: spec.name.clone(),
                });
            }
            // Optional fields store their resolved default, which must obey the spec
            if (!spec.required || spec.default.is_some()) && check_default(spec).is_err() {
                return Err(ConfigError::InvalidDefault {
                    resource: self.plural.clone(),
                    field: spec.name.clone(),
                });
            }
        }

        self.seed_records().map(|_| ())
    }

    /// Turn the seed entries into validated records
    pub fn seed_records(&self) -> Result<Vec<Record>, ConfigError> {
        let mut ids = HashSet::new();
        let mut records = Vec::with_capacity(self.seed.len());

        for entry in &self.seed {
            let id = entry
                .get("id")
                .and_then(Value::as_u64)
                .ok_or_else(|| ConfigError::InvalidSeed {
                    resource: self.plural.clone(),
                    message: "missing or non-integer id".to_string(),
                })?;

            // The largest id is kept free so the store can always advance past seeds
            if id == u64::MAX {
                return Err(ConfigError::InvalidSeed {
                    resource: self.plural.clone(),
                    message: format!("id {} is out of range", id),
                });
            }

            if !ids.insert(id) {
                return Err(ConfigError::DuplicateSeedId {
                    resource: self.plural.clone(),
                    id,
                });
            }

            let fields = validate(&Value::Object(entry.clone()), &self.fields, ErrorMode::Bundle)
                .map_err(|errors| ConfigError::InvalidSeed {
                    resource: self.plural.clone(),
                    message: errors
                        .iter()
                        .map(|(field, message)| format!("{}: {}", field, message))
                        .collect::<Vec<_>>()
                        .join(", "),
                })?;

            records.push(Record::new(id, fields));
        }

        Ok(records)
    }
}

/// Token issuing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret
    pub secret: String,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    /// Logins accepted by `POST /auth`
    #[serde(default)]
    pub users: Vec<UserCredential>,
}

impl AuthConfig {
    /// Token lifetime, checked to lie within `1..=MAX_TOKEN_TTL_SECS`
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        let invalid = || ConfigError::InvalidTokenTtl {
            secs: self.token_ttl_secs,
            max: MAX_TOKEN_TTL_SECS,
        };

        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(invalid());
        }
        Duration::try_seconds(self.token_ttl_secs).ok_or_else(invalid)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "super-secret".to_string(),
            token_ttl_secs: default_token_ttl_secs(),
            users: Vec::new(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Optional prefix every route is nested under (e.g., "/api/v1")
    #[serde(default)]
    pub api_prefix: Option<String>,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check token settings and every resource, and reject duplicate route names
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.token_ttl()?;

        let mut plurals = HashSet::new();
        for resource in &self.resources {
            resource.validate()?;
            if !plurals.insert(resource.plural.as_str()) {
                return Err(ConfigError::DuplicateResource {
                    plural: resource.plural.clone(),
                });
            }
        }
        Ok(())
    }

    /// Find a resource by its plural name
    pub fn find_resource(&self, plural: &str) -> Option<&ResourceDefinition> {
        self.resources.iter().find(|r| r.plural == plural)
    }

    /// Merge several configurations
    ///
    /// Resources are concatenated; a resource whose plural was already seen is
    /// skipped. Server and auth settings come from the first config.
    pub fn merge(configs: Vec<AppConfig>) -> Self {
        let mut configs = configs.into_iter();
        let Some(mut merged) = configs.next() else {
            return Self::empty();
        };

        for config in configs {
            for resource in config.resources {
                if merged.find_resource(&resource.plural).is_none() {
                    merged.resources.push(resource);
                }
            }
        }

        merged
    }

    /// A configuration with no resources
    pub fn empty() -> Self {
        Self {
            bind: default_bind(),
            api_prefix: None,
            auth: AuthConfig::default(),
            resources: Vec::new(),
        }
    }

    /// Create the default demo configuration
    ///
    /// `subscribers` starts with three users, so the next id handed out is 4.
    pub fn default_config() -> Self {
        let mut subscribers = ResourceDefinition::new(
            "user",
            "subscribers",
            vec![
                FieldSpec::required("name", FieldKind::String).with_max(64),
                FieldSpec::required("email", FieldKind::Email),
            ],
        );
        subscribers.seed = ["thefirstuser", "theseconduser", "thethirduser"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut entry = Map::new();
                entry.insert("id".into(), Value::from(i as u64 + 1));
                entry.insert("name".into(), Value::from(*name));
                entry.insert("email".into(), Value::from(format!("{}@mail.com", name)));
                entry
            })
            .collect();

        let hellos = ResourceDefinition::new(
            "hello",
            "hellos",
            vec![
                FieldSpec::required("name", FieldKind::String).with_max(6),
                FieldSpec::optional("age", FieldKind::Integer)
                    .with_min(9)
                    .with_default(10),
            ],
        );

        Self {
            bind: default_bind(),
            api_prefix: None,
            auth: AuthConfig {
                secret: "super-secret".to_string(),
                token_ttl_secs: default_token_ttl_secs(),
                users: vec![UserCredential {
                    username: "ttg".to_string(),
                    password: "password".to_string(),
                    identity: 667,
                }],
            },
            resources: vec![subscribers, hellos],
        }
    }
}
