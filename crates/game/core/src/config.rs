/// Balance constants and tunable parameters for the combat engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalanceConfig {
    /// Flat bonus granted on top of permanent rage when berserk triggers.
    pub berserk_base_bonus: i32,

    /// Turn-ticks a fresh berserk lasts (one player action + one enemy turn).
    pub berserk_duration: u32,

    /// Adrenaline value substituted into the Power Strike scaling context
    /// while berserk is active.
    ///
    /// This preserves the original balance patch numerically. It is a
    /// tunable policy constant, not a derived rule.
    pub power_strike_scaling_adrenaline: i32,
}

impl BalanceConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum simultaneous burn stacks on a hero.
    pub const MAX_BURN_STACKS: usize = 2;

    // ===== fixed rules =====
    /// HP percentage at or below which berserk triggers.
    pub const BERSERK_TRIGGER_PERCENT: i32 = 10;
    /// HP percentage above which the per-excursion berserk lockout resets.
    pub const BERSERK_RESET_PERCENT: i32 = 20;
    /// Highest adrenaline tier (one per quarter-HP band below 75%).
    pub const ADRENALINE_MAX_TIER: i32 = 3;
    /// Extra HP headroom above max_hp, as a percentage.
    pub const OVERHEAL_PERCENT: i32 = 10;
    /// Ranks above this cap confer no additional combat magnitude.
    pub const COMBAT_RANK_CAP: u8 = 5;
    /// Per-tick burn damage roll range.
    pub const BURN_TICK_MIN: i32 = 1;
    pub const BURN_TICK_MAX: i32 = 3;
    /// Burn stacks applied by attacks last this many ticks.
    pub const BURN_DURATION: u32 = 2;

    // ===== progression =====
    pub const STAT_POINTS_PER_LEVEL: u32 = 2;
    pub const SKILL_POINTS_PER_LEVEL: u32 = 2;
    /// XP threshold growth: next = current * 7 / 4 (integer 1.75x).
    pub const XP_CURVE_NUM: i32 = 7;
    pub const XP_CURVE_DEN: i32 = 4;

    // ===== potions =====
    pub const POTION_HEAL_PERCENT: i32 = 25;
    pub const POTION_SUPER_HEAL_PERCENT: i32 = 50;
    pub const POTION_AP_RESTORE: i32 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BERSERK_BASE_BONUS: i32 = 6;
    pub const DEFAULT_BERSERK_DURATION: u32 = 2;
    pub const DEFAULT_PS_SCALING_ADRENALINE: i32 = 3;

    pub fn new() -> Self {
        Self {
            berserk_base_bonus: Self::DEFAULT_BERSERK_BASE_BONUS,
            berserk_duration: Self::DEFAULT_BERSERK_DURATION,
            power_strike_scaling_adrenaline: Self::DEFAULT_PS_SCALING_ADRENALINE,
        }
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self::new()
    }
}
