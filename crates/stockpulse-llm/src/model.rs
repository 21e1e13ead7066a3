use serde::{Deserialize, Serialize};

/// Chat models the pipeline addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatModel {
    /// Cheap model used for agents, debate, sentiment and most syntheses.
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    /// Capable model drawn for a minority of syntheses.
    #[serde(rename = "gpt-4o")]
    Gpt4o,
}

impl ChatModel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChatModel::Gpt4oMini => "gpt-4o-mini",
            ChatModel::Gpt4o => "gpt-4o",
        }
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
