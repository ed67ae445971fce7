//! Backend value object representing one remote model endpoint

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A remote language-model backend (Value Object)
///
/// The declaration order is the canonical display order: every aggregate
/// result lists replies as llama3, mixtral, tinyllama.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Backend {
    Llama3,
    Mixtral,
    TinyLlama,
}

impl Backend {
    /// All backends in canonical order
    pub const ALL: [Backend; 3] = [Backend::Llama3, Backend::Mixtral, Backend::TinyLlama];

    /// Wire identifier, also used as the JSON key in aggregate payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Llama3 => "llama3",
            Backend::Mixtral => "mixtral",
            Backend::TinyLlama => "tinyllama",
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            Backend::Llama3 => "LLaMA 3",
            Backend::Mixtral => "Mixtral",
            Backend::TinyLlama => "TinyLLaMA",
        }
    }

    /// Request path of this backend's single-model endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            Backend::Llama3 => "/api/llama3",
            Backend::Mixtral => "/api/mixtral",
            Backend::TinyLlama => "/api/tinyllama",
        }
    }

    /// Position in the canonical ordering
    pub fn position(&self) -> usize {
        match self {
            Backend::Llama3 => 0,
            Backend::Mixtral => 1,
            Backend::TinyLlama => 2,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Backend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "llama3" | "llama-3" | "llama" => Ok(Backend::Llama3),
            "mixtral" => Ok(Backend::Mixtral),
            "tinyllama" | "tiny-llama" | "tiny" => Ok(Backend::TinyLlama),
            other => Err(DomainError::UnknownBackend(other.to_string())),
        }
    }
}

impl Serialize for Backend {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Backend {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_roundtrip() {
        for backend in Backend::ALL {
            let parsed: Backend = backend.to_string().parse().unwrap();
            assert_eq!(backend, parsed);
        }
    }

    #[test]
    fn test_canonical_order() {
        let mut shuffled = vec![Backend::TinyLlama, Backend::Llama3, Backend::Mixtral];
        shuffled.sort();
        assert_eq!(shuffled, Backend::ALL.to_vec());
        for (i, backend) in Backend::ALL.iter().enumerate() {
            assert_eq!(backend.position(), i);
        }
    }

    #[test]
    fn test_unknown_backend() {
        let err = "gpt-4".parse::<Backend>().unwrap_err();
        assert_eq!(err, DomainError::UnknownBackend("gpt-4".to_string()));
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Backend::Llama3.endpoint(), "/api/llama3");
        assert_eq!(Backend::Mixtral.endpoint(), "/api/mixtral");
        assert_eq!(Backend::TinyLlama.endpoint(), "/api/tinyllama");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Backend::TinyLlama).unwrap();
        assert_eq!(json, "\"tinyllama\"");
        let back: Backend = serde_json::from_str("\"mixtral\"").unwrap();
        assert_eq!(back, Backend::Mixtral);
    }
}
