//! The fixed set of chat models hosted on Nebius AI Studio.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A model hosted on Nebius AI Studio.
///
/// Serializes to the exact identifier the API expects. Parsing accepts only
/// identifiers in this set; anything else is [`ClientError::InvalidModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Model {
    /// Qwen3 235B instruct (2507 revision). The default.
    #[serde(rename = "Qwen/Qwen3-235B-A22B-Instruct-2507")]
    Qwen3_235B,
    /// DeepSeek R1 (0528 revision).
    #[serde(rename = "deepseek-ai/DeepSeek-R1-0528")]
    DeepSeekR1,
    /// Llama 3.3 70B instruct.
    #[serde(rename = "meta-llama/Llama-3.3-70B-Instruct")]
    Llama33_70B,
}

impl Model {
    /// The wire identifier for this model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Qwen3_235B => "Qwen/Qwen3-235B-A22B-Instruct-2507",
            Model::DeepSeekR1 => "deepseek-ai/DeepSeek-R1-0528",
            Model::Llama33_70B => "meta-llama/Llama-3.3-70B-Instruct",
        }
    }

    /// Every model available on the provider.
    pub fn all() -> &'static [Model] {
        &[Model::Qwen3_235B, Model::DeepSeekR1, Model::Llama33_70B]
    }

    /// Comma-separated wire identifiers of the supported set.
    pub(crate) fn supported_list() -> String {
        Self::all()
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Qwen3_235B
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ClientError::InvalidModel(s.to_string()))
    }
}
