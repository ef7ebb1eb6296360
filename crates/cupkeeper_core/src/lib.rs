//! Cupkeeper Core - Match Draft Engine
//!
//! This crate implements the turn-based ban/pick/side-selection ritual that
//! precedes a tournament match: format rules for best-of-1/2/3, the map
//! pool, the append-only action log, and the state machine that ties them
//! together. It talks to the outside world only through the [`Notifier`]
//! trait; resolving identities, parsing commands and delivering messages is
//! the platform layer's job.

pub mod draft;
pub mod error;
pub mod format;
pub mod log;
pub mod notifier;
pub mod pool;
pub mod team;

pub use draft::{MatchDraft, MatchState, MatchSummary};
pub use error::{CoreError, Result};
pub use format::{ActionKind, DraftSequence, DraftStep, MatchFormat, Step};
pub use log::{Action, ActionLog, ActionRecord};
pub use notifier::{Notifier, NullNotifier, RecordingNotifier};
pub use pool::{MapPool, MapStatus};
pub use team::{Actor, Side, Team, TeamId, TeamSlot};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        Action, ActionKind, ActionLog, Actor, CoreError, DraftSequence, DraftStep, MapPool,
        MatchDraft, MatchFormat, MatchState, MatchSummary, Notifier, Result, Side, Step, Team,
        TeamId, TeamSlot,
    };
}
