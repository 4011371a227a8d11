//! Shared combatant body: resource pools, attack range, defence mitigation.
//!
//! HP and AP are owned exclusively by their [`Combatant`] and mutated only
//! through the methods here; every mutation clamps at the pool boundary.
//! [`Combatant::apply_defence`] is a pure function of state — it never
//! touches HP, the caller applies the returned amount.

use crate::dice::Dice;

/// How much of an incoming hit the defence soaked, for flavor only.
///
/// Tiers are classified on the blocked-to-raw ratio before the minimum-1
/// rule, so a fully absorbed hit still reads as a full block even though
/// 1 damage lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockTier {
    /// Nothing blocked (or the attack bypassed defence entirely).
    None,
    /// Some damage turned aside (ratio below 50%).
    Weak,
    /// At least half blocked.
    Solid,
    /// At least three quarters blocked.
    Strong,
    /// The entire hit absorbed (true block, or blocked >= raw damage).
    Full,
}

impl BlockTier {
    /// Classify from blocked amount vs raw damage, integer-only.
    pub fn classify(blocked: i32, damage: i32) -> Self {
        if damage <= 0 || blocked <= 0 {
            Self::None
        } else if blocked >= damage {
            Self::Full
        } else if blocked * 4 >= damage * 3 {
            Self::Strong
        } else if blocked * 2 >= damage {
            Self::Solid
        } else {
            Self::Weak
        }
    }
}

/// Modifiers for a single defence application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefenceOptions {
    /// Attack bypasses armour (minimum-1 rule still applies).
    pub defence_break: bool,
    /// Explicit full block: the hit deals nothing.
    pub true_block: bool,
    /// Defender is berserk: incoming damage halved before mitigation.
    pub berserk_guard: bool,
}

/// Result of [`Combatant::apply_defence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenceReport {
    /// Damage the caller should apply to HP.
    pub actual: i32,
    /// Amount the defence soaked.
    pub blocked: i32,
    /// Flavor classification, observational only.
    pub tier: BlockTier,
}

/// Entity representation shared by heroes and monsters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    hp: i32,
    max_hp: i32,
    /// HP ceiling for effects allowed to overheal. Always >= max_hp.
    overheal_cap: i32,
    pub min_atk: i32,
    pub max_atk: i32,
    defence: i32,
    ap: i32,
    max_ap: i32,
}

impl Combatant {
    pub fn new(
        name: impl Into<String>,
        hp: i32,
        min_atk: i32,
        max_atk: i32,
        defence: i32,
        ap: i32,
    ) -> Self {
        Self {
            name: name.into(),
            hp,
            max_hp: hp,
            overheal_cap: hp,
            min_atk,
            max_atk,
            defence: defence.max(0),
            ap,
            max_ap: ap,
        }
    }

    // ===== HP pool =====

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn overheal_cap(&self) -> i32 {
        self.overheal_cap
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage, clamping HP at 0. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        debug_assert!(amount >= 0, "damage must be non-negative");
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        before - self.hp
    }

    /// Heal up to max_hp. Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        debug_assert!(amount >= 0, "heal must be non-negative");
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp.max(before));
        self.hp - before
    }

    /// Heal up to the overheal cap. Returns the HP actually restored.
    pub fn overheal(&mut self, amount: i32) -> i32 {
        debug_assert!(amount >= 0, "heal must be non-negative");
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.overheal_cap);
        self.hp - before
    }

    /// Force HP to an exact value within `[0, overheal_cap]`.
    ///
    /// Reserved for rule-level interventions (Death Defier, level-up heal).
    pub(crate) fn set_hp(&mut self, value: i32) {
        self.hp = value.clamp(0, self.overheal_cap);
    }

    /// Raise max HP, keeping current HP and the overheal cap consistent.
    pub fn grow_max_hp(&mut self, amount: i32) {
        debug_assert!(amount >= 0);
        self.max_hp += amount.max(0);
        self.overheal_cap = self.overheal_cap.max(self.max_hp);
    }

    pub fn set_overheal_cap(&mut self, cap: i32) {
        self.overheal_cap = cap.max(self.max_hp);
        self.hp = self.hp.min(self.overheal_cap);
    }

    // ===== AP pool =====

    pub fn ap(&self) -> i32 {
        self.ap
    }

    pub fn max_ap(&self) -> i32 {
        self.max_ap
    }

    /// Debit AP if affordable. Returns false (and mutates nothing) otherwise.
    pub fn try_spend_ap(&mut self, cost: i32) -> bool {
        debug_assert!(cost >= 0);
        if self.ap < cost {
            return false;
        }
        self.ap -= cost;
        true
    }

    /// Restore AP up to max_ap. Returns the AP actually restored.
    pub fn restore_ap(&mut self, amount: i32) -> i32 {
        debug_assert!(amount >= 0);
        let before = self.ap;
        self.ap = (self.ap + amount.max(0)).min(self.max_ap);
        self.ap - before
    }

    pub fn refill_ap(&mut self) {
        self.ap = self.max_ap;
    }

    // ===== Defence =====

    pub fn defence(&self) -> i32 {
        self.defence
    }

    /// Set defence, clamped so it never goes negative.
    pub fn set_defence(&mut self, value: i32) {
        self.defence = value.max(0);
    }

    // ===== Combat =====

    /// Basic attack roll within the combatant's range.
    pub fn attack_roll(&self, dice: &mut impl Dice) -> i32 {
        dice.roll(self.min_atk, self.max_atk)
    }

    /// Mitigate an incoming hit. Pure: does not mutate HP.
    ///
    /// Rule order: true block returns 0; a berserk defender halves the raw
    /// damage (floor, min 1); defence-break bypasses armour; otherwise
    /// `actual = max(1, damage - defence)` with the block-flavor tier taken
    /// from the pre-minimum blocked ratio.
    pub fn apply_defence(&self, damage: i32, opts: DefenceOptions) -> DefenceReport {
        if opts.true_block {
            return DefenceReport {
                actual: 0,
                blocked: damage.max(0),
                tier: BlockTier::Full,
            };
        }

        let mut damage = damage.max(0);
        if opts.berserk_guard {
            damage = (damage / 2).max(1);
        }

        if opts.defence_break {
            return DefenceReport {
                actual: damage.max(1),
                blocked: 0,
                tier: BlockTier::None,
            };
        }

        let blocked = self.defence.min(damage);
        DefenceReport {
            actual: (damage - self.defence).max(1),
            blocked,
            tier: BlockTier::classify(blocked, damage),
        }
    }
}
