//! Query value object

use super::backend::Backend;
use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Which backend(s) a query is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Every backend, through the aggregate endpoint
    #[default]
    All,
    /// One named backend
    Single(Backend),
}

impl TargetMode {
    pub fn is_all(&self) -> bool {
        matches!(self, TargetMode::All)
    }

    /// Backends this target covers, in canonical order
    pub fn backends(&self) -> Vec<Backend> {
        match self {
            TargetMode::All => Backend::ALL.to_vec(),
            TargetMode::Single(backend) => vec![*backend],
        }
    }
}

impl std::fmt::Display for TargetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetMode::All => write!(f, "all"),
            TargetMode::Single(backend) => write!(f, "{}", backend),
        }
    }
}

impl std::str::FromStr for TargetMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "*" => Ok(TargetMode::All),
            other => other
                .parse::<Backend>()
                .map(TargetMode::Single)
                .map_err(|_| DomainError::UnknownTarget(other.to_string())),
        }
    }
}

/// A submitted user question (Value Object)
///
/// The text is stored trimmed and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    target: TargetMode,
}

impl Query {
    /// Build a query, rejecting blank input
    pub fn try_new(text: impl AsRef<str>, target: TargetMode) -> Result<Self, DomainError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(DomainError::EmptyQuery);
        }
        Ok(Self {
            text: text.to_string(),
            target,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> TargetMode {
        self.target
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
