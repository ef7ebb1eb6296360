//! The Match Draft State Machine.
//!
//! Sole mutator of a match: it validates turn legality, applies the
//! ban/pick/side actions against the pool and log, and announces outcomes
//! through the [`Notifier`]. The current step is derived purely from the log
//! length via the bound [`DraftSequence`]; there is no separate cursor.
//!
//! State transitions are pure and committed before any notification goes
//! out; a failed delivery never rolls anything back.

use rand::Rng;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::format::{ActionKind, DraftSequence, DraftStep, MatchFormat, Step};
use crate::log::{Action, ActionLog};
use crate::notifier::Notifier;
use crate::pool::MapPool;
use crate::team::{Actor, Side, Team, TeamId, TeamSlot};

/// Lifecycle of a match. Strictly forward, no regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Pending,
    InProgress,
    Complete,
}

/// One map of the final configuration: who starts where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapResult {
    pub map: String,
    pub attack: Team,
    pub defend: Team,
}

/// The fully determined outcome of a completed draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub format: MatchFormat,
    pub results: Vec<MapResult>,
}

impl MatchSummary {
    /// Human-readable summary block, one line per map.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["The match is set!".to_string()];
        for (i, result) in self.results.iter().enumerate() {
            lines.push(format!(
                "Map {}: **{}** — {} starts on attack, {} starts on defense.",
                i + 1,
                result.map,
                result.attack.name,
                result.defend.name
            ));
        }
        lines
    }
}

#[derive(Debug, Clone, Copy)]
enum Progress {
    Next(DraftStep),
    AwaitSide(TeamSlot),
}

#[derive(Debug, Clone, Copy)]
struct ActionOutcome {
    acted: TeamSlot,
    progress: Progress,
}

/// A single match being drafted in one channel.
///
/// The surrounding session owns exactly one of these for its lifetime and
/// delivers events one at a time; the machine itself does no locking.
#[derive(Debug, Clone)]
pub struct MatchDraft {
    teams: [Team; 2],
    format: MatchFormat,
    sequence: DraftSequence,
    pool: MapPool,
    log: ActionLog,
    state: MatchState,
}

impl MatchDraft {
    /// Create a match, randomizing which team takes slot A.
    pub fn new<R, I, S>(
        team_one: Team,
        team_two: Team,
        format: MatchFormat,
        maps: I,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if rng.r#gen::<bool>() {
            Self::with_slots(team_two, team_one, format, maps)
        } else {
            Self::with_slots(team_one, team_two, format, maps)
        }
    }

    /// Create a match with a fixed slot assignment.
    ///
    /// Fails with a configuration error when the pool cannot carry the
    /// format's sequence; no match value exists in that case.
    pub fn with_slots<I, S>(
        slot_a: Team,
        slot_b: Team,
        format: MatchFormat,
        maps: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pool = MapPool::new(maps)?;
        let sequence = format.sequence(pool.len())?;
        Ok(Self {
            teams: [slot_a, slot_b],
            format,
            sequence,
            pool,
            log: ActionLog::new(),
            state: MatchState::Pending,
        })
    }

    pub fn team(&self, slot: TeamSlot) -> &Team {
        &self.teams[slot.index()]
    }

    pub fn format(&self) -> MatchFormat {
        self.format
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn pool(&self) -> &MapPool {
        &self.pool
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Whether `id` belongs to either bound team. Pure query; the external
    /// permission layer uses it to gate command acceptance.
    pub fn is_in_match(&self, id: &TeamId) -> bool {
        self.teams.iter().any(|t| &t.id == id)
    }

    /// The final configuration, once the draft is complete.
    pub fn summary(&self) -> Option<MatchSummary> {
        let (chooser, side) = self.log.chosen_side()?;
        Some(self.build_summary(chooser, side))
    }

    /// Announce the draft and move `Pending → InProgress`. No-op once
    /// started.
    pub async fn begin(&mut self, notifier: &dyn Notifier) {
        if self.state != MatchState::Pending {
            return;
        }
        self.state = MatchState::InProgress;
        debug!(format = %self.format, "draft started");
        let lines = self.welcome_lines();
        notifier.announce_sequence(&lines).await;
    }

    /// Remove a map from contention.
    ///
    /// On rejection the refusal has already been delivered to the actor; the
    /// returned error is informational.
    pub async fn ban_map(
        &mut self,
        notifier: &dyn Notifier,
        actor: &Actor,
        map: &str,
        force: bool,
    ) -> Result<()> {
        match self.apply_action(actor, ActionKind::Ban, map, force) {
            Ok(outcome) => {
                let mut lines = vec![format!(
                    "**{}** banned **{}**.",
                    self.team(outcome.acted).name,
                    map
                )];
                lines.extend(self.progress_lines(outcome.progress));
                notifier.announce_sequence(&lines).await;
                Ok(())
            }
            Err(err) => {
                self.refuse(notifier, actor, &err).await;
                Err(err)
            }
        }
    }

    /// Select a map to be played.
    pub async fn pick_map(
        &mut self,
        notifier: &dyn Notifier,
        actor: &Actor,
        map: &str,
        force: bool,
    ) -> Result<()> {
        match self.apply_action(actor, ActionKind::Pick, map, force) {
            Ok(outcome) => {
                let mut lines = vec![format!(
                    "**{}** picked **{}** — it will be played!",
                    self.team(outcome.acted).name,
                    map
                )];
                lines.extend(self.progress_lines(outcome.progress));
                notifier.announce_sequence(&lines).await;
                Ok(())
            }
            Err(err) => {
                self.refuse(notifier, actor, &err).await;
                Err(err)
            }
        }
    }

    /// Record the terminal side choice and complete the match.
    pub async fn choose_side(
        &mut self,
        notifier: &dyn Notifier,
        actor: &Actor,
        side_token: &str,
        force: bool,
    ) -> Result<()> {
        match self.apply_side(actor, side_token, force) {
            Ok((chooser, side, summary)) => {
                let mut lines = vec![format!(
                    "**{}** will start on **{}**.",
                    self.team(chooser).name,
                    side
                )];
                lines.extend(summary.lines());
                notifier.announce_sequence(&lines).await;
                Ok(())
            }
            Err(err) => {
                self.refuse(notifier, actor, &err).await;
                Err(err)
            }
        }
    }

    // ---- pure transitions ----------------------------------------------

    fn apply_action(
        &mut self,
        actor: &Actor,
        kind: ActionKind,
        map: &str,
        force: bool,
    ) -> Result<ActionOutcome> {
        if self.state == MatchState::Complete {
            return Err(CoreError::MatchAlreadyComplete);
        }

        let step = match self.sequence.next_step(self.log.len()) {
            Some(Step::Action(step)) => step,
            Some(Step::SideChoice(slot)) => {
                // Bans and picks are over; only the side choice remains.
                return Err(CoreError::not_your_turn(
                    self.team(slot).name.clone(),
                    "choose a side",
                ));
            }
            None => return Err(CoreError::MatchAlreadyComplete),
        };

        // `force` never turns a ban into a pick or vice versa.
        if step.kind != kind {
            return Err(CoreError::not_your_turn(
                self.team(step.slot).name.clone(),
                step.kind.to_string(),
            ));
        }

        if !force && actor.team.as_ref() != Some(&self.team(step.slot).id) {
            return Err(CoreError::not_your_turn(
                self.team(step.slot).name.clone(),
                step.kind.to_string(),
            ));
        }

        match kind {
            ActionKind::Ban => self.pool.ban(map)?,
            ActionKind::Pick => self.pool.pick(map)?,
        }
        // Forced actions are still recorded against the team whose turn it
        // was; the referee acts on their behalf.
        self.log.append(
            step.slot,
            match kind {
                ActionKind::Ban => Action::Ban(map.to_string()),
                ActionKind::Pick => Action::Pick(map.to_string()),
            },
        );
        if self.state == MatchState::Pending {
            self.state = MatchState::InProgress;
        }

        let progress = match self.sequence.next_step(self.log.len()) {
            Some(Step::Action(next)) => Progress::Next(next),
            _ => Progress::AwaitSide(self.sequence.side_slot()),
        };
        Ok(ActionOutcome {
            acted: step.slot,
            progress,
        })
    }

    fn apply_side(
        &mut self,
        actor: &Actor,
        side_token: &str,
        force: bool,
    ) -> Result<(TeamSlot, Side, MatchSummary)> {
        if self.state == MatchState::Complete {
            return Err(CoreError::MatchAlreadyComplete);
        }

        let owner = match self.sequence.next_step(self.log.len()) {
            Some(Step::SideChoice(slot)) => slot,
            Some(Step::Action(step)) => {
                // Even a forced side choice must wait for the sequence end.
                return Err(CoreError::not_your_turn(
                    self.team(step.slot).name.clone(),
                    step.kind.to_string(),
                ));
            }
            None => return Err(CoreError::MatchAlreadyComplete),
        };

        if !force && actor.team.as_ref() != Some(&self.team(owner).id) {
            return Err(CoreError::not_your_turn(
                self.team(owner).name.clone(),
                "choose a side",
            ));
        }

        let side: Side = side_token.parse()?;
        self.log.append(owner, Action::Side(side));
        self.state = MatchState::Complete;
        debug!(side = %side, "draft complete");
        Ok((owner, side, self.build_summary(owner, side)))
    }

    // ---- announcements -------------------------------------------------

    async fn refuse(&self, notifier: &dyn Notifier, actor: &Actor, err: &CoreError) {
        notifier
            .send(&format!("{} {}", actor.mention, err.refusal_text()))
            .await;
    }

    fn progress_lines(&self, progress: Progress) -> Vec<String> {
        match progress {
            Progress::Next(step) => vec![format!(
                "{}, your turn to {}!",
                self.team(step.slot).mention,
                step.kind
            )],
            Progress::AwaitSide(slot) => vec![format!(
                "The map sequence is settled! {}, choose your starting side with `!side attack` or `!side defend`.",
                self.team(slot).mention
            )],
        }
    }

    fn welcome_lines(&self) -> Vec<String> {
        let a = self.team(TeamSlot::A);
        let b = self.team(TeamSlot::B);
        let mut lines = vec![
            format!("Welcome {} and {}!", a.mention, b.mention),
            format!("-- Match **{}** --", self.format.to_string().to_uppercase()),
            format!(
                "This channel is for the judge and the captains of **{}** and **{}** to settle the match.",
                a.name, b.name
            ),
        ];
        match self.format {
            MatchFormat::Bo1 => {
                lines.push(
                    "Ban maps with `!ban <map>`, team by team, until a single map remains."
                        .to_string(),
                );
                lines.push(
                    "The last team to ban picks their starting side with `!side attack` or `!side defend`."
                        .to_string(),
                );
            }
            MatchFormat::Bo2 => {
                lines.push("The sequence is `!ban`, `!ban`, `!pick`, `!pick`:".to_string());
                lines.push(format!(" - {} bans, {} bans,", a.name, b.name));
                lines.push(format!(" - {} picks, {} picks,", a.name, b.name));
                lines.push(format!(
                    " - {} picks the starting side with `!side attack` or `!side defend`.",
                    b.name
                ));
            }
            MatchFormat::Bo3 => {
                lines.push(
                    "The sequence is `!ban`, `!ban`, `!pick`, `!pick`, then `!ban` until one map remains:"
                        .to_string(),
                );
                lines.push(format!(" - {} bans, {} bans,", a.name, b.name));
                lines.push(format!(" - {} picks, {} picks,", a.name, b.name));
                lines.push(" - bans alternate until the decider map remains,".to_string());
                lines.push(format!(
                    " - {} picks the starting side with `!side attack` or `!side defend`.",
                    self.team(self.sequence.side_slot()).name
                ));
            }
        }
        lines.push("Maps in the pool:".to_string());
        for map in self.pool.remaining() {
            lines.push(format!(" - {}", map));
        }
        lines.push(format!("{}, you ban first!", a.mention));
        lines
    }

    fn build_summary(&self, chooser: TeamSlot, side: Side) -> MatchSummary {
        let chooser_team = self.team(chooser).clone();
        let other_team = self.team(chooser.other()).clone();
        let (attack, defend) = match side {
            Side::Attack => (chooser_team, other_team),
            Side::Defend => (other_team, chooser_team),
        };

        let mut maps = self.log.picks();
        if self.format.has_decider() {
            // Exactly one map survives the sequence for Bo1/Bo3.
            maps.extend(self.pool.remaining());
        }

        MatchSummary {
            format: self.format,
            results: maps
                .into_iter()
                .map(|map| MapResult {
                    map,
                    attack: attack.clone(),
                    defend: defend.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::RecordingNotifier;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn alpha() -> Team {
        Team::new("100", "Alpha", "<@&100>")
    }

    fn bravo() -> Team {
        Team::new("200", "Bravo", "<@&200>")
    }

    fn actor_for(team: &Team) -> Actor {
        Actor::for_team(format!("<@{}>", team.name), team.id.clone())
    }

    fn outsider() -> Actor {
        Actor::for_team("<@999>", TeamId::from("999"))
    }

    fn referee() -> Actor {
        Actor::unaffiliated("<@ref>")
    }

    fn bo1(maps: &[&str]) -> MatchDraft {
        MatchDraft::with_slots(alpha(), bravo(), MatchFormat::Bo1, maps.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn bo1_end_to_end_matches_the_book() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage", "Nuke"]);
        draft.begin(&notifier).await;
        assert_eq!(draft.state(), MatchState::InProgress);

        let a = actor_for(&alpha());
        let b = actor_for(&bravo());

        draft.ban_map(&notifier, &a, "Inferno", false).await.unwrap();
        assert_eq!(draft.pool().remaining(), vec!["Mirage", "Nuke"]);

        draft.ban_map(&notifier, &b, "Mirage", false).await.unwrap();
        assert_eq!(draft.pool().remaining(), vec!["Nuke"]);

        draft.choose_side(&notifier, &b, "attack", false).await.unwrap();
        assert_eq!(draft.state(), MatchState::Complete);

        let summary = draft.summary().unwrap();
        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.results[0].map, "Nuke");
        assert_eq!(summary.results[0].attack.name, "Bravo");
        assert_eq!(summary.results[0].defend.name, "Alpha");
    }

    #[tokio::test]
    async fn bo2_side_choice_applies_to_both_maps() {
        let notifier = RecordingNotifier::new();
        let mut draft = MatchDraft::with_slots(
            alpha(),
            bravo(),
            MatchFormat::Bo2,
            ["Dust2", "Cache", "Overpass", "Train"],
        )
        .unwrap();
        draft.begin(&notifier).await;

        let a = actor_for(&alpha());
        let b = actor_for(&bravo());

        draft.ban_map(&notifier, &a, "Dust2", false).await.unwrap();
        draft.ban_map(&notifier, &b, "Cache", false).await.unwrap();
        draft.pick_map(&notifier, &a, "Overpass", false).await.unwrap();
        draft.pick_map(&notifier, &b, "Train", false).await.unwrap();
        draft.choose_side(&notifier, &b, "defend", false).await.unwrap();

        let summary = draft.summary().unwrap();
        let maps: Vec<_> = summary.results.iter().map(|r| r.map.as_str()).collect();
        assert_eq!(maps, vec!["Overpass", "Train"]);
        for result in &summary.results {
            assert_eq!(result.defend.name, "Bravo");
            assert_eq!(result.attack.name, "Alpha");
        }
    }

    #[tokio::test]
    async fn bo3_seven_maps_leaves_one_decider() {
        let notifier = RecordingNotifier::new();
        let maps = ["m1", "m2", "m3", "m4", "m5", "m6", "m7"];
        let mut draft =
            MatchDraft::with_slots(alpha(), bravo(), MatchFormat::Bo3, maps).unwrap();
        draft.begin(&notifier).await;

        let actors = [actor_for(&alpha()), actor_for(&bravo())];
        // Walk the whole sequence, always taking the first remaining map.
        for i in 0.. {
            let step = match draft
                .format()
                .sequence(maps.len())
                .unwrap()
                .next_step(draft.log().len())
            {
                Some(Step::Action(step)) => step,
                _ => break,
            };
            let actor = &actors[step.slot.index()];
            let target = draft.pool().remaining()[0].clone();
            match step.kind {
                ActionKind::Ban => draft.ban_map(&notifier, actor, &target, false).await.unwrap(),
                ActionKind::Pick => {
                    draft.pick_map(&notifier, actor, &target, false).await.unwrap()
                }
            }
            // Conservation law holds at every point.
            let total = draft.pool().remaining().len()
                + draft.pool().banned().len()
                + draft.pool().picked().len();
            assert_eq!(total, maps.len());
            assert!(i < maps.len());
        }

        assert_eq!(draft.pool().remaining_count(), 1);
        draft
            .choose_side(&notifier, &actors[1], "attack", false)
            .await
            .unwrap();
        let summary = draft.summary().unwrap();
        assert_eq!(summary.results.len(), 3);
        // Picks first in pick order, decider last.
        assert_eq!(summary.results[0].map, draft.log().picks()[0]);
        assert_eq!(summary.results[2].map, draft.pool().remaining()[0]);
    }

    #[tokio::test]
    async fn bo3_five_map_pool_is_playable() {
        let notifier = RecordingNotifier::new();
        let mut draft = MatchDraft::with_slots(
            alpha(),
            bravo(),
            MatchFormat::Bo3,
            ["a", "b", "c", "d", "e"],
        )
        .unwrap();
        draft.begin(&notifier).await;
        let a = actor_for(&alpha());
        let b = actor_for(&bravo());
        draft.ban_map(&notifier, &a, "a", false).await.unwrap();
        draft.ban_map(&notifier, &b, "b", false).await.unwrap();
        draft.pick_map(&notifier, &a, "c", false).await.unwrap();
        draft.pick_map(&notifier, &b, "d", false).await.unwrap();
        // Sequence exhausted, "e" is the decider.
        draft.choose_side(&notifier, &b, "defend", false).await.unwrap();
        let summary = draft.summary().unwrap();
        let maps: Vec<_> = summary.results.iter().map(|r| r.map.as_str()).collect();
        assert_eq!(maps, vec!["c", "d", "e"]);
    }

    #[tokio::test]
    async fn wrong_turn_is_refused_without_mutation() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage", "Nuke"]);
        draft.begin(&notifier).await;
        let before = notifier.len();

        let b = actor_for(&bravo());
        let err = draft.ban_map(&notifier, &b, "Inferno", false).await.unwrap_err();
        assert!(matches!(err, CoreError::NotYourTurn { .. }));
        assert_eq!(draft.pool().remaining_count(), 3);
        assert_eq!(draft.log().len(), 0);
        // Exactly one refusal line went out.
        assert_eq!(notifier.len(), before + 1);
        assert!(notifier.last().unwrap().contains("not your turn"));
    }

    #[tokio::test]
    async fn non_participant_is_always_refused() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage", "Nuke"]);
        draft.begin(&notifier).await;
        let err = draft
            .ban_map(&notifier, &outsider(), "Inferno", false)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotYourTurn { .. }));
    }

    #[tokio::test]
    async fn force_bypasses_ownership_only() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage", "Nuke"]);
        draft.begin(&notifier).await;
        let referee = referee();

        // A referee can ban on behalf of the current team...
        draft
            .ban_map(&notifier, &referee, "Inferno", true)
            .await
            .unwrap();
        assert_eq!(draft.log().len(), 1);
        // ...but cannot force a side choice before the sequence ends...
        let err = draft
            .choose_side(&notifier, &referee, "attack", true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotYourTurn { .. }));
        // ...and cannot force an unknown map through.
        let err = draft
            .ban_map(&notifier, &referee, "Inferno", true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownMap { .. }));
    }

    #[tokio::test]
    async fn force_cannot_change_the_action_kind() {
        let notifier = RecordingNotifier::new();
        let mut draft = MatchDraft::with_slots(
            alpha(),
            bravo(),
            MatchFormat::Bo2,
            ["Dust2", "Cache", "Overpass", "Train"],
        )
        .unwrap();
        draft.begin(&notifier).await;
        let referee = referee();
        draft.ban_map(&notifier, &referee, "Dust2", true).await.unwrap();
        draft.ban_map(&notifier, &referee, "Cache", true).await.unwrap();
        // Next step is a pick; a forced ban must still be refused.
        let err = draft
            .ban_map(&notifier, &referee, "Overpass", true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotYourTurn { .. }));
        assert_eq!(draft.pool().remaining_count(), 2);
    }

    #[tokio::test]
    async fn rejection_is_idempotent() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage", "Nuke"]);
        draft.begin(&notifier).await;
        let a = actor_for(&alpha());
        let b = actor_for(&bravo());
        draft.ban_map(&notifier, &a, "Inferno", false).await.unwrap();

        for _ in 0..3 {
            let err = draft.ban_map(&notifier, &b, "Inferno", false).await.unwrap_err();
            assert!(matches!(err, CoreError::UnknownMap { .. }));
            assert_eq!(draft.log().len(), 1);
            assert_eq!(draft.pool().remaining(), vec!["Mirage", "Nuke"]);
        }
    }

    #[tokio::test]
    async fn complete_match_refuses_everything() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage"]);
        draft.begin(&notifier).await;
        let a = actor_for(&alpha());
        draft.ban_map(&notifier, &a, "Inferno", false).await.unwrap();
        draft.choose_side(&notifier, &a, "defend", false).await.unwrap();
        assert_eq!(draft.state(), MatchState::Complete);

        for force in [false, true] {
            let err = draft
                .ban_map(&notifier, &a, "Mirage", force)
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::MatchAlreadyComplete));
            let err = draft
                .choose_side(&notifier, &a, "attack", force)
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::MatchAlreadyComplete));
        }
    }

    #[tokio::test]
    async fn invalid_side_is_refused_even_for_the_owner() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage"]);
        draft.begin(&notifier).await;
        let a = actor_for(&alpha());
        draft.ban_map(&notifier, &a, "Inferno", false).await.unwrap();
        let err = draft
            .choose_side(&notifier, &a, "sideways", false)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSide { .. }));
        assert_eq!(draft.state(), MatchState::InProgress);
    }

    #[tokio::test]
    async fn begin_is_idempotent() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage", "Nuke"]);
        draft.begin(&notifier).await;
        let announced = notifier.len();
        assert!(announced > 0);
        draft.begin(&notifier).await;
        assert_eq!(notifier.len(), announced);
    }

    #[tokio::test]
    async fn announcement_follows_the_commit() {
        let notifier = RecordingNotifier::new();
        let mut draft = bo1(&["Inferno", "Mirage", "Nuke"]);
        draft.begin(&notifier).await;
        let a = actor_for(&alpha());
        draft.ban_map(&notifier, &a, "Inferno", false).await.unwrap();
        let lines = notifier.lines();
        let ban_line = lines.iter().find(|l| l.contains("banned")).unwrap();
        assert!(ban_line.contains("Alpha"));
        assert!(ban_line.contains("Inferno"));
        // The follow-up names the next team to act.
        assert!(lines.last().unwrap().contains(&bravo().mention));
    }

    #[test]
    fn undersized_pool_prevents_match_creation() {
        let err =
            MatchDraft::with_slots(alpha(), bravo(), MatchFormat::Bo3, ["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, CoreError::ConfigurationError { .. }));
    }

    #[test]
    fn slot_assignment_is_deterministic_under_a_seed() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        let d1 = MatchDraft::new(
            alpha(),
            bravo(),
            MatchFormat::Bo1,
            ["Inferno", "Mirage"],
            &mut rng1,
        )
        .unwrap();
        let d2 = MatchDraft::new(
            alpha(),
            bravo(),
            MatchFormat::Bo1,
            ["Inferno", "Mirage"],
            &mut rng2,
        )
        .unwrap();
        assert_eq!(d1.team(TeamSlot::A), d2.team(TeamSlot::A));
        assert_eq!(d1.team(TeamSlot::B), d2.team(TeamSlot::B));
    }

    #[test]
    fn both_teams_are_in_match_regardless_of_slots() {
        let draft = bo1(&["Inferno", "Mirage"]);
        assert!(draft.is_in_match(&alpha().id));
        assert!(draft.is_in_match(&bravo().id));
        assert!(!draft.is_in_match(&TeamId::from("999")));
    }
}
