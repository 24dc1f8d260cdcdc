//! Built-in demo scenarios.

/// A canned infrastructure description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl Scenario {
    /// Look up a scenario by id, or by its 1-based position in [`SCENARIOS`].
    pub fn find(key: &str) -> Option<&'static Scenario> {
        let key = key.trim();
        if let Ok(index) = key.parse::<usize>() {
            return index.checked_sub(1).and_then(|i| SCENARIOS.get(i));
        }
        SCENARIOS.iter().find(|s| s.id.eq_ignore_ascii_case(key))
    }

    /// First line of the description.
    pub fn headline(&self) -> &'static str {
        self.description.lines().next().unwrap_or_default()
    }
}

pub const SCENARIOS: [Scenario; 4] = [
    Scenario {
        id: "web-app",
        name: "Simple Web App",
        description: "A simple web application with:\n\
            - a Cloud Run service hosting a containerized API\n\
            - a Cloud SQL PostgreSQL database\n\
            - a Cloud Storage bucket for static assets\n\
            Deploy in the us-central1 region.",
    },
    Scenario {
        id: "microservices",
        name: "Microservices Application",
        description: "A microservices platform with:\n\
            - a GKE cluster for container orchestration\n\
            - Cloud SQL as the main database\n\
            - Memorystore (Redis) for caching\n\
            - Pub/Sub for messaging between services\n\
            - a load balancer for external traffic\n\
            - a VPC with private subnets\n\
            Spread across multiple zones for high availability.",
    },
    Scenario {
        id: "data-pipeline",
        name: "Data Pipeline",
        description: "A data processing pipeline with:\n\
            - Cloud Storage buckets for raw input and processed output\n\
            - Cloud Functions for transformation\n\
            - BigQuery as the warehouse\n\
            - Cloud Scheduler for periodic jobs\n\
            - Pub/Sub for event-driven processing\n\
            Give each service account only the IAM roles it needs.",
    },
    Scenario {
        id: "ml-platform",
        name: "ML Training Platform",
        description: "A machine learning training platform with:\n\
            - Vertex AI Workbench for development\n\
            - Cloud Storage for datasets and models\n\
            - Compute Engine GPU instances for training\n\
            - Cloud SQL for experiment metadata\n\
            - a VPC with firewall rules\n\
            Monitor resource usage with Cloud Monitoring.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id_and_index() {
        assert_eq!(Scenario::find("web-app").unwrap().name, "Simple Web App");
        assert_eq!(Scenario::find("ML-PLATFORM").unwrap().id, "ml-platform");
        assert_eq!(Scenario::find("2").unwrap().id, "microservices");
        assert!(Scenario::find("0").is_none());
        assert!(Scenario::find("5").is_none());
        assert!(Scenario::find("unknown").is_none());
    }

    #[test]
    fn test_headline() {
        assert_eq!(SCENARIOS[2].headline(), "A data processing pipeline with:");
    }
}
