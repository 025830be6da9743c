use serde::{Deserialize, Serialize};

/// Running score for one session. Only ever grows until the session is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn award(&mut self, reward: u32) -> u32 {
        self.0 = self.0.saturating_add(reward);
        self.0
    }

    /// HUD label, e.g. `Score: 40`.
    pub fn hud_text(self) -> String {
        format!("Score: {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(Score::default().value(), 0);
        assert_eq!(Score::default().hud_text(), "Score: 0");
    }

    #[test]
    fn award_accumulates() {
        let mut s = Score::default();
        s.award(10);
        assert_eq!(s.award(10), 20);
        assert_eq!(s.hud_text(), "Score: 20");
    }

    #[test]
    fn award_saturates() {
        let mut s = Score(u32::MAX - 5);
        assert_eq!(s.award(10), u32::MAX);
    }
}
