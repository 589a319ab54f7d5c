//! Score accumulator
//!
//! Signed on purpose: enough fallen blocks will take the score negative.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score(i32);

impl Score {
    pub fn add(&mut self, delta: i32) {
        self.0 += delta;
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accumulates_and_goes_negative() {
        let mut score = Score::default();
        score.add(10);
        score.add(-30);
        assert_eq!(score.value(), -20);
        score.reset();
        assert_eq!(score.value(), 0);
    }
}
