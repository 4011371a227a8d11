//! Combat event stream.
//!
//! The engine narrates everything observable through [`CombatEvent`] values
//! instead of printing. Frontends render them; tests assert on them.

use crate::combatant::BlockTier;
use crate::hero::PotionKind;
use crate::skills::SkillId;
use crate::status::{StopReason, WarpPhase};

/// One observable step of a battle, in resolution order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// Battle started; the coin flip decided who acts first.
    BattleOpened { hero_first: bool },

    // ===== hero offence =====
    HeroAttack {
        roll: i32,
        bonus: i32,
        damage: i32,
        blocked: i32,
        tier: BlockTier,
    },
    PowerStrike {
        rank: u8,
        roll: i32,
        scaled_base: i32,
        bonus: i32,
        damage: i32,
        blocked: i32,
        tier: BlockTier,
    },
    /// Offensive action swallowed whole by blindness.
    HeroMissed,

    // ===== enemy offence =====
    EnemyAttack {
        roll: i32,
        damage: i32,
        blocked: i32,
        tier: BlockTier,
    },
    SpecialMoveUsed {
        name: &'static str,
        damage: i32,
        self_heal: i32,
    },

    // ===== statuses =====
    PoisonApplied { amount: i32, turns: u32 },
    PoisonTick { damage: i32 },
    PoisonFaded,
    PoisonCured,
    BurnApplied { stacks: usize },
    BurnTick { damage: i32 },
    BurnsFaded,
    BurnsSoothed { stacks: usize },
    BlindApplied { turns: u32 },
    /// `full` distinguishes the long-blind recovery message.
    BlindCleared { full: bool },
    /// A stop landed on the hero; the action loss comes later.
    TurnStopApplied { turns: u32, reason: StopReason },
    /// The hero's action was lost to a pending stop.
    TurnStopped { reason: StopReason },
    /// Chain guard forced a pending stop to clear instead of costing a turn.
    StopShrugged,
    DefenceWarped { phase: WarpPhase, defence: i32 },

    // ===== hero state shifts =====
    AdrenalineShift { tier: i32 },
    BerserkTriggered { bonus: i32 },
    BerserkExtended { turns_left: u32 },
    BerserkFaded,
    WarCryShouted { bonus: i32, turns: u32 },
    WarCryFaded,
    DeathDefied,
    DeathDefierPrimed,

    // ===== recovery and items =====
    Healed { amount: i32 },
    PotionUsed { kind: PotionKind },
    SkillUsed { id: SkillId, rank: u8 },

    // ===== progression and terminals =====
    XpGained { amount: i32 },
    LevelUp { level: u32 },
    EnemyDefeated { xp: i32, gold: i32 },
    HeroDefeated,
    Fled,
}
