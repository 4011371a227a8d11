//! Deterministic turn-based combat rules for an arena run.
//!
//! `arena-core` defines the canonical combat model: combatant bodies, the
//! status-effect ledger, the damage pipeline, the AP/skill economy, and the
//! turn sequencer that orchestrates them. All randomness flows through the
//! [`dice::Dice`] seam and all observable behavior is narrated as
//! [`event::CombatEvent`] values, so whole battles replay deterministically
//! in tests.
pub mod bonus;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod event;
pub mod hero;
pub mod monster;
pub mod skills;
pub mod status;

pub use bonus::{BonusBreakdown, BonusContext, BonusInputs, adrenaline_tier};
pub use combatant::{BlockTier, Combatant, DefenceOptions, DefenceReport};
pub use config::BalanceConfig;
pub use dice::{Dice, RngDice, SequenceDice, thread_dice};
pub use engine::{
    ActionProvider, BattleEngine, BattleOutcome, HeroTurnPhase, HudSnapshot, Phase, PlayerAction,
    TurnOutcome, TurnReport, start_battle,
};
pub use error::{ActionError, ErrorSeverity};
pub use event::CombatEvent;
pub use hero::{Hero, PotionBag, PotionKind};
pub use monster::{Monster, SpecialMove};
pub use skills::{
    HEAL_PERCENTS, MAX_RANK, SkillId, SkillSheet, UPGRADE_COSTS, WAR_CRY_EFFECTS, ap_cost,
    power_strike_scaled_base,
};
pub use status::{
    BerserkStatus, BlindStatus, BurnLedger, DeathDefierStatus, DefenceWarpStatus, PoisonStatus,
    StatusRegisters, StopReason, TurnStopStatus, WarCryStatus, WarpPhase,
};
