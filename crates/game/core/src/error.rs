//! Error taxonomy for action resolution.
//!
//! Rejected actions never mutate state and never consume the turn; control
//! simply returns to the decision point. Invariant violations (HP/AP driven
//! negative) are clamped at the mutation boundary instead of surfacing here,
//! and `HeroLost` is a normal terminal outcome, not an error.

use crate::hero::PotionKind;
use crate::skills::SkillId;

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; an alternative action may succeed immediately.
    ///
    /// Examples: not enough AP, out of potions
    Recoverable,

    /// Invalid input; should not be retried without changes.
    ///
    /// Examples: unlearned skill, wrong combat phase
    Validation,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }
}

/// Errors that can occur while resolving a player action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    /// The engine is not in the phase this call requires.
    #[error("not the right combat phase for this action")]
    OutOfPhase,

    /// Skill has never been learned (rank 0).
    #[error("{0} has not been learned")]
    UnlearnedSkill(SkillId),

    /// No rank of the skill is affordable with current AP.
    #[error("not enough AP: need {needed}, have {available}")]
    InsufficientAp { needed: i32, available: i32 },

    /// Potion bag has none of the requested kind.
    #[error("no {0} potions left")]
    OutOfPotions(PotionKind),

    /// Heal rejected because HP is already full.
    #[error("already at full health")]
    AlreadyAtFullHealth,

    /// Death Defier is not owned by this hero.
    #[error("Death Defier is not known")]
    DeathDefierNotOwned,

    /// Death Defier is already primed.
    #[error("Death Defier is already active")]
    DeathDefierAlreadyPrimed,

    /// Death Defier has already been spent this run.
    #[error("Death Defier has already been used")]
    DeathDefierSpent,
}

impl ActionError {
    /// Returns the severity class of this rejection.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientAp { .. }
            | Self::OutOfPotions(_)
            | Self::AlreadyAtFullHealth
            | Self::DeathDefierAlreadyPrimed
            | Self::DeathDefierSpent => ErrorSeverity::Recoverable,
            Self::OutOfPhase | Self::UnlearnedSkill(_) | Self::DeathDefierNotOwned => {
                ErrorSeverity::Validation
            }
        }
    }
}
