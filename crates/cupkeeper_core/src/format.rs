//! Format rules: the fixed action sequence each match kind prescribes.
//!
//! A format is a tag from a closed set; the step sequence is materialized
//! once at match creation (pool size in hand) and consulted by log length
//! from then on. There is no separate cursor to drift out of sync.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::team::TeamSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Ban,
    Pick,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ban => write!(f, "ban"),
            Self::Pick => write!(f, "pick"),
        }
    }
}

/// One element of a format's ban/pick sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftStep {
    pub slot: TeamSlot,
    pub kind: ActionKind,
}

/// What the sequence expects next for a given log length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Action(DraftStep),
    /// The terminal step: the designated slot picks a starting side.
    SideChoice(TeamSlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchFormat {
    Bo1,
    Bo2,
    Bo3,
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bo1 => write!(f, "best of 1"),
            Self::Bo2 => write!(f, "best of 2"),
            Self::Bo3 => write!(f, "best of 3"),
        }
    }
}

impl MatchFormat {
    /// Smallest pool the format can run without emptying mid-sequence.
    pub fn min_pool_size(self) -> usize {
        match self {
            // Two maps: one ban, one survivor.
            Self::Bo1 => 2,
            // The fixed ban/ban/pick/pick head.
            Self::Bo2 => 4,
            // The head plus at least one survivor for the decider.
            Self::Bo3 => 5,
        }
    }

    /// How many maps end up being played.
    pub fn maps_played(self) -> usize {
        match self {
            Self::Bo1 => 1,
            Self::Bo2 => 2,
            Self::Bo3 => 3,
        }
    }

    /// Bo1 and Bo3 leave a decider; Bo2 plays exactly its two picks.
    pub fn has_decider(self) -> bool {
        !matches!(self, Self::Bo2)
    }

    /// Materialize the step sequence for a pool of `pool_len` maps.
    ///
    /// Fails fast at match creation when the pool is too small; a draft can
    /// never discover mid-flight that it has run out of maps.
    pub fn sequence(self, pool_len: usize) -> Result<DraftSequence> {
        let minimum = self.min_pool_size();
        if pool_len < minimum {
            return Err(CoreError::ConfigurationError {
                format: self.to_string(),
                pool_size: pool_len,
                minimum,
            });
        }

        let mut steps = Vec::new();
        match self {
            // Alternating bans until a single map survives.
            MatchFormat::Bo1 => {
                push_alternating_bans(&mut steps, pool_len - 1);
            }
            MatchFormat::Bo2 => {
                push_head(&mut steps);
            }
            // Fixed head, then alternating bans down to the decider.
            MatchFormat::Bo3 => {
                push_head(&mut steps);
                push_alternating_bans(&mut steps, pool_len - 5);
            }
        }

        // min_pool_size guarantees at least one step.
        let side_slot = steps.last().expect("sequence is never empty").slot;
        Ok(DraftSequence { steps, side_slot })
    }
}

fn push_head(steps: &mut Vec<DraftStep>) {
    for (slot, kind) in [
        (TeamSlot::A, ActionKind::Ban),
        (TeamSlot::B, ActionKind::Ban),
        (TeamSlot::A, ActionKind::Pick),
        (TeamSlot::B, ActionKind::Pick),
    ] {
        steps.push(DraftStep { slot, kind });
    }
}

fn push_alternating_bans(steps: &mut Vec<DraftStep>, count: usize) {
    for i in 0..count {
        steps.push(DraftStep {
            slot: if i % 2 == 0 { TeamSlot::A } else { TeamSlot::B },
            kind: ActionKind::Ban,
        });
    }
}

/// A format's sequence, fixed for the lifetime of one match.
///
/// The side-choice step belongs to the last team to act in the ban/pick
/// sequence and is always terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSequence {
    steps: Vec<DraftStep>,
    side_slot: TeamSlot,
}

impl DraftSequence {
    /// The expected step once `log_len` actions have been recorded.
    /// `None` means the side choice has also been made.
    pub fn next_step(&self, log_len: usize) -> Option<Step> {
        if log_len < self.steps.len() {
            Some(Step::Action(self.steps[log_len]))
        } else if log_len == self.steps.len() {
            Some(Step::SideChoice(self.side_slot))
        } else {
            None
        }
    }

    pub fn is_complete(&self, log_len: usize) -> bool {
        log_len > self.steps.len()
    }

    /// Ban/pick steps, excluding the terminal side choice.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn side_slot(&self) -> TeamSlot {
        self.side_slot
    }

    pub fn steps(&self) -> &[DraftStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(seq: &DraftSequence) -> Vec<ActionKind> {
        seq.steps().iter().map(|s| s.kind).collect()
    }

    fn slots(seq: &DraftSequence) -> Vec<TeamSlot> {
        seq.steps().iter().map(|s| s.slot).collect()
    }

    #[test]
    fn bo1_alternates_bans_down_to_one() {
        let seq = MatchFormat::Bo1.sequence(3).unwrap();
        assert_eq!(kinds(&seq), vec![ActionKind::Ban, ActionKind::Ban]);
        assert_eq!(slots(&seq), vec![TeamSlot::A, TeamSlot::B]);
        assert_eq!(seq.side_slot(), TeamSlot::B);
    }

    #[test]
    fn bo1_even_pool_gives_side_choice_to_a() {
        let seq = MatchFormat::Bo1.sequence(4).unwrap();
        assert_eq!(seq.step_count(), 3);
        assert_eq!(seq.side_slot(), TeamSlot::A);
    }

    #[test]
    fn bo2_is_the_fixed_head() {
        let seq = MatchFormat::Bo2.sequence(4).unwrap();
        assert_eq!(
            kinds(&seq),
            vec![
                ActionKind::Ban,
                ActionKind::Ban,
                ActionKind::Pick,
                ActionKind::Pick
            ]
        );
        assert_eq!(seq.side_slot(), TeamSlot::B);
    }

    #[test]
    fn bo3_seven_maps_has_the_classic_two_ban_tail() {
        let seq = MatchFormat::Bo3.sequence(7).unwrap();
        assert_eq!(
            kinds(&seq),
            vec![
                ActionKind::Ban,
                ActionKind::Ban,
                ActionKind::Pick,
                ActionKind::Pick,
                ActionKind::Ban,
                ActionKind::Ban
            ]
        );
        assert_eq!(seq.side_slot(), TeamSlot::B);
    }

    #[test]
    fn bo3_five_maps_has_no_tail() {
        let seq = MatchFormat::Bo3.sequence(5).unwrap();
        assert_eq!(seq.step_count(), 4);
        assert_eq!(seq.side_slot(), TeamSlot::B);
    }

    #[test]
    fn turn_strictly_alternates_within_ban_pick_phase() {
        for (format, pool) in [
            (MatchFormat::Bo1, 5),
            (MatchFormat::Bo1, 8),
            (MatchFormat::Bo2, 6),
            (MatchFormat::Bo3, 7),
            (MatchFormat::Bo3, 9),
        ] {
            let seq = format.sequence(pool).unwrap();
            for pair in seq.steps().windows(2) {
                assert_eq!(pair[1].slot, pair[0].slot.other(), "{format} pool {pool}");
            }
        }
    }

    #[test]
    fn undersized_pools_fail_at_construction() {
        for (format, pool) in [
            (MatchFormat::Bo1, 1),
            (MatchFormat::Bo2, 3),
            (MatchFormat::Bo3, 4),
        ] {
            let err = format.sequence(pool).unwrap_err();
            assert!(
                matches!(err, CoreError::ConfigurationError { .. }),
                "{format} accepted a pool of {pool}"
            );
        }
    }

    #[test]
    fn side_choice_is_always_terminal() {
        let seq = MatchFormat::Bo3.sequence(7).unwrap();
        let n = seq.step_count();
        assert!(matches!(seq.next_step(n), Some(Step::SideChoice(_))));
        assert_eq!(seq.next_step(n + 1), None);
        assert!(seq.is_complete(n + 1));
        assert!(!seq.is_complete(n));
    }
}
