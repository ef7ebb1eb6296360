use miette::Diagnostic;
use thiserror::Error;

/// Everything the draft engine can refuse to do.
///
/// All variants are local, recoverable conditions: a rejected action leaves
/// the match untouched and the refusal is relayed to the actor through the
/// `Notifier`. Only `ConfigurationError`/`DuplicateMap` are raised at match
/// construction and prevent the match from existing at all.
#[derive(Error, Diagnostic, Debug)]
pub enum CoreError {
    #[error("not your turn")]
    #[diagnostic(
        code(cupkeeper::draft::not_your_turn),
        help("Waiting for {team} to {action}. A referee can act on their behalf.")
    )]
    NotYourTurn { team: String, action: String },

    #[error("unknown map")]
    #[diagnostic(
        code(cupkeeper::draft::unknown_map),
        help("Maps still up for grabs: {}", remaining.join(", "))
    )]
    UnknownMap {
        map: String,
        remaining: Vec<String>,
    },

    #[error("invalid side")]
    #[diagnostic(
        code(cupkeeper::draft::invalid_side),
        help("Recognized sides are `attack` and `defend`")
    )]
    InvalidSide { side: String },

    #[error("match already complete")]
    #[diagnostic(
        code(cupkeeper::draft::match_complete),
        help("The draft is over; ask a referee to set up a new match if needed")
    )]
    MatchAlreadyComplete,

    #[error("map pool too small for {format}")]
    #[diagnostic(
        code(cupkeeper::draft::pool_too_small),
        help("{format} needs at least {minimum} maps, the configured pool has {pool_size}")
    )]
    ConfigurationError {
        format: String,
        pool_size: usize,
        minimum: usize,
    },

    #[error("duplicate map in pool")]
    #[diagnostic(
        code(cupkeeper::draft::duplicate_map),
        help("Map `{map}` appears more than once in the configured pool")
    )]
    DuplicateMap { map: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn not_your_turn(team: impl Into<String>, action: impl Into<String>) -> Self {
        Self::NotYourTurn {
            team: team.into(),
            action: action.into(),
        }
    }

    /// The one-line refusal sent back to the actor through the Notifier.
    pub fn refusal_text(&self) -> String {
        match self {
            Self::NotYourTurn { team, action } => {
                format!("it is not your turn! Waiting for {} to {}.", team, action)
            }
            Self::UnknownMap { map, remaining } => format!(
                "the map **{}** is not up for grabs. Remaining maps: {}.",
                map,
                remaining.join(", ")
            ),
            Self::InvalidSide { side } => format!(
                "`{}` is not a side. Use `attack` or `defend`.",
                side
            ),
            Self::MatchAlreadyComplete => {
                "this match is already settled, nothing left to decide!".to_string()
            }
            Self::ConfigurationError {
                format,
                pool_size,
                minimum,
            } => format!(
                "this match cannot be created: {} needs at least {} maps but the pool has {}.",
                format, minimum, pool_size
            ),
            Self::DuplicateMap { map } => format!(
                "this match cannot be created: map **{}** appears twice in the pool.",
                map
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_mentions_waiting_team() {
        let err = CoreError::not_your_turn("Team Rocket", "ban");
        assert!(err.refusal_text().contains("Team Rocket"));
        assert!(err.refusal_text().contains("ban"));
    }

    #[test]
    fn unknown_map_lists_remaining() {
        let err = CoreError::UnknownMap {
            map: "Pyramid".into(),
            remaining: vec!["D-17".into(), "Yard".into()],
        };
        let text = err.refusal_text();
        assert!(text.contains("Pyramid"));
        assert!(text.contains("D-17, Yard"));
    }
}
