use serde::{Deserialize, Serialize};

use crate::SolverError;

/// Depth at which the search stops and estimates by playouts.
pub const MAX_DEPTH: u32 = 40;
/// Symmetric moves are merged only while `depth <= SYMMETRY_DEPTH_LIMIT`.
pub const SYMMETRY_DEPTH_LIMIT: u32 = 3;
/// Random games per playout estimate.
pub const DEFAULT_TRIALS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub symmetry_depth: u32,
    pub trials: u32,

    /// Alpha-beta cutoffs. Off means every child is searched with the full window.
    pub prune: bool,
    /// Try moves far from the center first.
    pub heuristic: bool,
    /// Drop moves leading to positions equivalent to an earlier sibling.
    pub symmetry: bool,

    /// Seed for playouts; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Abort after this many searched nodes.
    pub node_limit: Option<u64>,
    pub log_interval_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            symmetry_depth: SYMMETRY_DEPTH_LIMIT,
            trials: DEFAULT_TRIALS,
            prune: true,
            heuristic: false,
            symmetry: false,
            seed: None,
            node_limit: None,
            log_interval_secs: 5,
        }
    }
}

impl SearchConfig {
    /// Exhaustive search: no depth horizon is ever reached on a legal board.
    pub fn exact() -> Self {
        Self {
            max_depth: u32::MAX,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if self.trials == 0 {
            return Err(SolverError::InvalidConfig(
                "playout trial count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_depth, 40);
        assert_eq!(config.symmetry_depth, 3);
        assert!(config.prune);
        assert!(!config.heuristic);
        assert!(!config.symmetry);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_trials_rejected() {
        let config = SearchConfig {
            trials: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(SolverError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"max_depth": 12, "symmetry": true, "seed": 7}"#).unwrap();
        assert_eq!(config.max_depth, 12);
        assert!(config.symmetry);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.trials, DEFAULT_TRIALS);
        assert!(config.prune);
    }
}
