//! Documentation produced at the end of a run.

use serde::{Deserialize, Serialize};

/// Heading used when the documentation stage returns neither JSON nor markdown.
pub const DEFAULT_README_HEADING: &str = "# Infrastructure Documentation";

/// The documents a run can produce, with their output file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Readme,
    DeploymentGuide,
    SecurityGuide,
    Troubleshooting,
    ArchitectureDiagram,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Readme,
        DocumentKind::DeploymentGuide,
        DocumentKind::SecurityGuide,
        DocumentKind::Troubleshooting,
        DocumentKind::ArchitectureDiagram,
    ];

    pub fn filename(&self) -> &'static str {
        match self {
            Self::Readme => "README.md",
            Self::DeploymentGuide => "DEPLOYMENT.md",
            Self::SecurityGuide => "SECURITY.md",
            Self::Troubleshooting => "TROUBLESHOOTING.md",
            Self::ArchitectureDiagram => "architecture.mmd",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Documentation {
    pub readme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_guide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_guide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troubleshooting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture_diagram: Option<String>,
}

impl Documentation {
    /// A README-only document.
    pub fn readme_only(readme: impl Into<String>) -> Self {
        Self {
            readme: readme.into(),
            ..Default::default()
        }
    }

    /// Minimal document wrapping free text under the default heading.
    pub fn placeholder(body: &str) -> Self {
        let body = body.trim();
        let readme = if body.is_empty() {
            format!("{}\n", DEFAULT_README_HEADING)
        } else {
            format!("{}\n\n{}\n", DEFAULT_README_HEADING, body)
        };
        Self::readme_only(readme)
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Readme => Some(self.readme.as_str()),
            DocumentKind::DeploymentGuide => self.deployment_guide.as_deref(),
            DocumentKind::SecurityGuide => self.security_guide.as_deref(),
            DocumentKind::Troubleshooting => self.troubleshooting.as_deref(),
            DocumentKind::ArchitectureDiagram => self.architecture_diagram.as_deref(),
        }
    }

    /// Documents to persist: the README always, others only when non-empty.
    pub fn populated(&self) -> Vec<(DocumentKind, &str)> {
        DocumentKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let content = self.get(kind)?;
                if kind == DocumentKind::Readme || !content.trim().is_empty() {
                    Some((kind, content))
                } else {
                    None
                }
            })
            .collect()
    }
}
