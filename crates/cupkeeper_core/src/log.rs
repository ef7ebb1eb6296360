//! The append-only action log. Its length is the draft's only cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::team::{Side, TeamSlot};

/// Payload of one recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Ban(String),
    Pick(String),
    Side(Side),
}

/// Immutable log entry. `seq` doubles as the step ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seq: usize,
    pub slot: TeamSlot,
    pub action: Action,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub(crate) fn append(&mut self, slot: TeamSlot, action: Action) {
        self.records.push(ActionRecord {
            seq: self.records.len(),
            slot,
            action,
            recorded_at: Utc::now(),
        });
    }

    /// Picked maps, in pick order.
    pub fn picks(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| match &r.action {
                Action::Pick(map) => Some(map.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn chosen_side(&self) -> Option<(TeamSlot, Side)> {
        self.records.iter().find_map(|r| match r.action {
            Action::Side(side) => Some((r.slot, side)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_numbers_follow_append_order() {
        let mut log = ActionLog::new();
        log.append(TeamSlot::A, Action::Ban("Yard".into()));
        log.append(TeamSlot::B, Action::Pick("D-17".into()));
        let seqs: Vec<_> = log.records().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }

    #[test]
    fn picks_keep_pick_order() {
        let mut log = ActionLog::new();
        log.append(TeamSlot::A, Action::Pick("Destination".into()));
        log.append(TeamSlot::B, Action::Ban("Yard".into()));
        log.append(TeamSlot::B, Action::Pick("Pyramid".into()));
        assert_eq!(log.picks(), vec!["Destination", "Pyramid"]);
    }

    #[test]
    fn chosen_side_reads_back() {
        let mut log = ActionLog::new();
        assert_eq!(log.chosen_side(), None);
        log.append(TeamSlot::B, Action::Side(Side::Attack));
        assert_eq!(log.chosen_side(), Some((TeamSlot::B, Side::Attack)));
    }
}
