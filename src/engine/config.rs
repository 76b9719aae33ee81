use serde::{Deserialize, Serialize};

/// Evaluation limits and randomness settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest root-to-leaf path accepted, the root counting as depth 1
    pub max_depth: usize,
    /// Most node evaluations accepted for one tree
    pub max_nodes: usize,
    /// Seed for random expressions and operators; entropy when unset
    pub random_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 1024,
            max_nodes: 65_536,
            random_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}
