//! The map pool: the ordered set of candidate maps for one match.
//!
//! Entries are never removed, only marked banned or picked, so the
//! conservation law (pool ∪ removed/picked == configured list) holds by
//! construction at every point of the draft.

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStatus {
    Available,
    Banned,
    Picked,
}

#[derive(Debug, Clone)]
struct MapEntry {
    name: String,
    status: MapStatus,
}

#[derive(Debug, Clone)]
pub struct MapPool {
    entries: Vec<MapEntry>,
}

impl MapPool {
    /// Build a pool from the configured, caller-normalized map list.
    /// Duplicates are a configuration error.
    pub fn new<I, S>(maps: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<MapEntry> = Vec::new();
        for map in maps {
            let name = map.into();
            if entries.iter().any(|e| e.name == name) {
                return Err(CoreError::DuplicateMap { map: name });
            }
            entries.push(MapEntry {
                name,
                status: MapStatus::Available,
            });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names still eligible for a ban or pick, in configured order.
    pub fn remaining(&self) -> Vec<String> {
        self.with_status(MapStatus::Available)
    }

    pub fn remaining_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == MapStatus::Available)
            .count()
    }

    pub fn banned(&self) -> Vec<String> {
        self.with_status(MapStatus::Banned)
    }

    pub fn picked(&self) -> Vec<String> {
        self.with_status(MapStatus::Picked)
    }

    pub fn contains_available(&self, name: &str) -> bool {
        self.status_of(name) == Some(MapStatus::Available)
    }

    pub fn status_of(&self, name: &str) -> Option<MapStatus> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.status)
    }

    /// Remove `name` from contention.
    pub fn ban(&mut self, name: &str) -> Result<()> {
        self.mark(name, MapStatus::Banned)
    }

    /// Select `name` to be played; it leaves the bannable pool but is
    /// recorded as a map of the match.
    pub fn pick(&mut self, name: &str) -> Result<()> {
        self.mark(name, MapStatus::Picked)
    }

    fn mark(&mut self, name: &str, status: MapStatus) -> Result<()> {
        match self
            .entries
            .iter_mut()
            .find(|e| e.name == name && e.status == MapStatus::Available)
        {
            Some(entry) => {
                entry.status = status;
                Ok(())
            }
            None => Err(CoreError::UnknownMap {
                map: name.to_string(),
                remaining: self.remaining(),
            }),
        }
    }

    fn with_status(&self, status: MapStatus) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pool() -> MapPool {
        MapPool::new(["Inferno", "Mirage", "Nuke"]).unwrap()
    }

    #[test]
    fn rejects_duplicates() {
        let err = MapPool::new(["Yard", "Yard"]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateMap { map } if map == "Yard"));
    }

    #[test]
    fn ban_removes_from_remaining_only() {
        let mut p = pool();
        p.ban("Mirage").unwrap();
        assert_eq!(p.remaining(), vec!["Inferno", "Nuke"]);
        assert_eq!(p.banned(), vec!["Mirage"]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn double_ban_is_unknown_and_mutates_nothing() {
        let mut p = pool();
        p.ban("Mirage").unwrap();
        for _ in 0..3 {
            let err = p.ban("Mirage").unwrap_err();
            assert!(matches!(err, CoreError::UnknownMap { .. }));
            assert_eq!(p.remaining(), vec!["Inferno", "Nuke"]);
        }
    }

    #[test]
    fn conservation_holds_after_mixed_actions() {
        let mut p = pool();
        p.ban("Inferno").unwrap();
        p.pick("Nuke").unwrap();
        let mut all = p.remaining();
        all.extend(p.banned());
        all.extend(p.picked());
        all.sort();
        assert_eq!(all, vec!["Inferno", "Mirage", "Nuke"]);
    }

    #[test]
    fn pick_of_banned_map_fails() {
        let mut p = pool();
        p.ban("Nuke").unwrap();
        assert!(matches!(
            p.pick("Nuke").unwrap_err(),
            CoreError::UnknownMap { .. }
        ));
    }
}
