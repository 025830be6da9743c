use serde::{Deserialize, Serialize};

use crate::engine::BodyHandle;

/// A contact reported by the physics collaborator for a rule declared with
/// `notify: true`. The order of the two handles is not significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first: BodyHandle,
    pub second: BodyHandle,
}

impl Contact {
    pub fn new(first: BodyHandle, second: BodyHandle) -> Self {
        Self { first, second }
    }

    /// Both orderings of the pair, for matching against group lookups.
    pub fn pairs(&self) -> [(BodyHandle, BodyHandle); 2] {
        [(self.first, self.second), (self.second, self.first)]
    }
}

/// Outcomes the game reports back to its host after handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    PickupsReplenished { count: usize },
    HazardsSpawned { spawned: usize, total: usize },
    GameOver { score: u32 },
    Restarted { generation: u64 },
}
