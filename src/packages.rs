//! Package metadata and the roles the wizard resolves at startup.
//!
//! A package is an externally defined workflow step with named inputs and
//! outputs. Package descriptions come from an MCP search tool and are kept in
//! the [`PackageCache`](crate::cache::PackageCache).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::cache::PackageCache;
use crate::error::Result;

/// Description of a reusable workflow package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub workflow_syntax: String,
    #[serde(default)]
    pub inputs: Vec<PackageIo>,
    #[serde(default)]
    pub outputs: Vec<PackageIo>,
    #[serde(default)]
    pub usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A named input or output of a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageIo {
    pub name: String,
    #[serde(rename = "type", default = "default_io_type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_io_type() -> String {
    "string".to_string()
}

fn default_required() -> bool {
    true
}

impl PackageInfo {
    /// Build a package description from a raw search tool payload.
    ///
    /// The payload is expected to be `{"results": [...]}`; the first result
    /// wins. Field names vary between registries, so a few aliases are
    /// accepted. Scalar values that are not strings are stored in their JSON
    /// text form, which is lossy for nested objects.
    pub fn from_search_results(query: &str, payload: &Value) -> Self {
        let empty = Map::new();
        let best = payload
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        Self {
            name: first_text(best, &["name"]).unwrap_or_else(|| query.to_string()),
            version: first_text(best, &["version"]),
            workflow_syntax: first_text(best, &["workflow_syntax", "syntax"]).unwrap_or_default(),
            inputs: io_list(best.get("inputs"), "input"),
            outputs: io_list(best.get("outputs"), "output"),
            usage: first_text(best, &["usage", "readme_usage"]).unwrap_or_default(),
            homepage: first_text(best, &["homepage", "docs"]),
            source: first_text(best, &["source", "repository"]),
        }
    }

    /// Inputs the user must fill before the package can run
    pub fn required_inputs(&self) -> impl Iterator<Item = &PackageIo> {
        self.inputs.iter().filter(|io| io.required)
    }
}

/// First non-empty value among `keys`, coerced to text
fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(as_text)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(false) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn io_list(value: Option<&Value>, fallback_name: &str) -> Vec<PackageIo> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::Object(object) => PackageIo {
                name: first_text(object, &["name", "id"])
                    .unwrap_or_else(|| fallback_name.to_string()),
                kind: first_text(object, &["type", "datatype"]).unwrap_or_else(default_io_type),
                description: first_text(object, &["description"]).unwrap_or_default(),
                required: object
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
            },
            Value::String(name) => PackageIo {
                name: name.clone(),
                kind: default_io_type(),
                description: String::new(),
                required: true,
            },
            other => PackageIo {
                name: other.to_string(),
                kind: default_io_type(),
                description: String::new(),
                required: true,
            },
        })
        .collect()
}

/// Anything that can resolve a free-text query to a package description
pub trait PackageSource {
    fn search_package(&mut self, query: &str) -> Result<PackageInfo>;
}

/// Packages the wizard composes workflows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageRole {
    /// Creates the backing database for the chat agent
    Database,
    /// Drives the conversation with the end customer
    ConversationalFlow,
    /// Collects payments
    PaymentMethod,
}

impl PackageRole {
    pub const ALL: [PackageRole; 3] = [
        PackageRole::Database,
        PackageRole::ConversationalFlow,
        PackageRole::PaymentMethod,
    ];

    /// Search query used to discover the package
    pub fn query(self) -> &'static str {
        match self {
            Self::Database => "database creation",
            Self::ConversationalFlow => "package-conversational-eco",
            Self::PaymentMethod => "payment method",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::ConversationalFlow => "conversational flow",
            Self::PaymentMethod => "payment method",
        }
    }
}

/// One resolved package per role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSet {
    pub database: PackageInfo,
    pub conversational_flow: PackageInfo,
    pub payment_method: PackageInfo,
}

impl PackageSet {
    /// Resolve every role through the cache, in declaration order
    pub fn resolve(cache: &mut PackageCache, source: &mut dyn PackageSource) -> Result<Self> {
        let mut lookup = |role: PackageRole| -> Result<PackageInfo> {
            let package = cache.get(role.query(), &mut *source)?;
            info!(role = role.label(), package = %package.name, "resolved package");
            Ok(package)
        };

        Ok(Self {
            database: lookup(PackageRole::Database)?,
            conversational_flow: lookup(PackageRole::ConversationalFlow)?,
            payment_method: lookup(PackageRole::PaymentMethod)?,
        })
    }

    pub fn get(&self, role: PackageRole) -> &PackageInfo {
        match role {
            PackageRole::Database => &self.database,
            PackageRole::ConversationalFlow => &self.conversational_flow,
            PackageRole::PaymentMethod => &self.payment_method,
        }
    }
}
