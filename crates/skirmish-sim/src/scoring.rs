//! Score bookkeeping for kills of spawned combatants.

use skirmish_core::constants::KILL_SCORE;
use skirmish_core::events::SimEvent;
use skirmish_core::state::ScoreView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub kills: u32,
}

impl ScoreState {
    /// Record one kill and return the matching event.
    pub fn award_kill(&mut self) -> SimEvent {
        self.kills += 1;
        self.score = self.score.saturating_add(KILL_SCORE);
        SimEvent::ScoreAwarded {
            amount: KILL_SCORE,
            total: self.score,
        }
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            score: self.score,
            kills: self.kills,
        }
    }
}
