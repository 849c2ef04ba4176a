//! Deployed service flavours

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Which of the reference services this process runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ServiceFlavour {
    /// Record API backed by the document store
    Backend,
    /// Static page renderer
    Front,
    /// Demo service fetching upstream job listings
    Trial,
}

impl ServiceFlavour {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Front => "front",
            Self::Trial => "trial",
        }
    }

    /// Service name reported to the trace collector unless overridden
    pub fn default_service_name(&self) -> &'static str {
        match self {
            Self::Backend => "backend-service",
            Self::Front => "front-service",
            Self::Trial => "trial-service",
        }
    }

    pub fn needs_store(&self) -> bool {
        matches!(self, Self::Backend)
    }

    pub fn needs_job_source(&self) -> bool {
        matches!(self, Self::Trial)
    }
}

impl std::str::FromStr for ServiceFlavour {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backend" | "backend-service" => Ok(Self::Backend),
            "front" | "frontend" | "front-service" => Ok(Self::Front),
            "trial" | "trial-service" => Ok(Self::Trial),
            other => Err(DomainError::configuration(format!(
                "Unknown service flavour '{}'. Expected backend, front or trial",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ServiceFlavour {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for ServiceFlavour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the running process
#[derive(Debug, Clone)]
pub struct ServiceProfile {
    pub flavour: ServiceFlavour,
    pub name: String,
    pub version: String,
}

impl ServiceProfile {
    pub fn new(flavour: ServiceFlavour) -> Self {
        Self {
            flavour,
            name: flavour.default_service_name().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
