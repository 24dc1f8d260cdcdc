//! Requirements extracted from the user's infrastructure request.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of an infrastructure component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    Compute,
    Storage,
    Database,
    Networking,
    Messaging,
    Other,
}

impl ComponentCategory {
    pub const ALL: [&'static str; 6] = [
        "compute",
        "storage",
        "database",
        "networking",
        "messaging",
        "other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Storage => "storage",
            Self::Database => "database",
            Self::Networking => "networking",
            Self::Messaging => "messaging",
            Self::Other => "other",
        }
    }
}

/// Target deployment environment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Dev,
    Staging,
    #[default]
    Prod,
}

impl Environment {
    pub const ALL: [&'static str; 3] = ["dev", "staging", "prod"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One infrastructure component the application needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    #[serde(rename = "type")]
    pub category: ComponentCategory,
    /// Target service identifier, e.g. `cloud_run` or `cloud_sql`
    pub service: String,
    #[serde(default)]
    pub requirements: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub notes: String,
}

/// Structured requirements, produced once per run from the user's text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirements {
    pub application_name: String,
    pub description: String,
    pub components: Vec<Component>,
    #[serde(default)]
    pub regions: Vec<String>,
    pub environment: Environment,
    #[serde(default)]
    pub estimated_scale: BTreeMap<String, serde_json::Value>,
}

impl Requirements {
    /// Components of the given category, in request order.
    pub fn components_of(&self, category: ComponentCategory) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.category == category)
    }
}
