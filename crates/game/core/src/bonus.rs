//! Flat damage-bonus policy.
//!
//! Every hero-dealt hit adds a context-dependent stack of flat bonuses on
//! top of its base roll. The stack is computed in one place so the contexts
//! cannot drift apart.

use crate::config::BalanceConfig;

/// Which computation is asking for bonuses.
///
/// Power Strike splits its damage into a scaled base and a flat-bonus part;
/// the scaling context deliberately swaps the berserk contribution for a
/// fixed adrenaline value so frenzy does not multiply through the scaler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusContext {
    BasicAttack,
    PowerStrikeHit,
    PowerStrikeScaling,
}

/// Raw inputs to the bonus computation, snapshotted from the hero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BonusInputs {
    pub adrenaline_tier: i32,
    pub rage: i32,
    pub berserk_active: bool,
    pub berserk_bonus: i32,
    pub war_cry_bonus: i32,
    pub equipment_bonus: i32,
}

/// Itemized flat-bonus stack for one hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusBreakdown {
    pub adrenaline: i32,
    pub rage: i32,
    pub berserk: i32,
    pub war_cry: i32,
    pub equipment: i32,
}

impl BonusBreakdown {
    pub fn total(&self) -> i32 {
        self.adrenaline + self.rage + self.berserk + self.war_cry + self.equipment
    }
}

/// Adrenaline tier from the hero's HP fraction, integer-only.
///
/// One tier per quarter of max HP lost below the 75% line:
/// at or below 25% -> 3, 50% -> 2, 75% -> 1, otherwise 0.
pub fn adrenaline_tier(hp: i32, max_hp: i32) -> i32 {
    if max_hp <= 0 {
        return 0;
    }
    if hp * 4 <= max_hp {
        BalanceConfig::ADRENALINE_MAX_TIER
    } else if hp * 2 <= max_hp {
        2
    } else if hp * 4 <= max_hp * 3 {
        1
    } else {
        0
    }
}

/// Assemble the bonus stack for the given context.
pub fn compute(inputs: BonusInputs, context: BonusContext, cfg: &BalanceConfig) -> BonusBreakdown {
    let mut out = BonusBreakdown {
        adrenaline: inputs.adrenaline_tier,
        rage: inputs.rage,
        berserk: if inputs.berserk_active {
            inputs.berserk_bonus
        } else {
            0
        },
        war_cry: inputs.war_cry_bonus,
        equipment: inputs.equipment_bonus,
    };
    if context == BonusContext::PowerStrikeScaling && inputs.berserk_active {
        out.berserk = 0;
        out.adrenaline = cfg.power_strike_scaling_adrenaline;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adrenaline_tiers_sit_on_quarter_bands() {
        assert_eq!(adrenaline_tier(30, 30), 0);
        assert_eq!(adrenaline_tier(23, 30), 0);
        assert_eq!(adrenaline_tier(22, 30), 1); // 22*4 <= 90
        assert_eq!(adrenaline_tier(15, 30), 2);
        assert_eq!(adrenaline_tier(7, 30), 3);
        assert_eq!(adrenaline_tier(0, 30), 3);
    }

    #[test]
    fn contexts_agree_while_not_berserk() {
        let cfg = BalanceConfig::default();
        let inputs = BonusInputs {
            adrenaline_tier: 2,
            rage: 1,
            war_cry_bonus: 3,
            equipment_bonus: 1,
            ..Default::default()
        };
        let hit = compute(inputs, BonusContext::PowerStrikeHit, &cfg);
        let scaling = compute(inputs, BonusContext::PowerStrikeScaling, &cfg);
        assert_eq!(hit, scaling);
        assert_eq!(hit.total(), 7);
    }

    #[test]
    fn scaling_context_swaps_berserk_for_fixed_adrenaline() {
        let cfg = BalanceConfig::default();
        let inputs = BonusInputs {
            adrenaline_tier: 3,
            rage: 2,
            berserk_active: true,
            berserk_bonus: 8,
            ..Default::default()
        };
        let hit = compute(inputs, BonusContext::PowerStrikeHit, &cfg);
        assert_eq!(hit.berserk, 8);
        let scaling = compute(inputs, BonusContext::PowerStrikeScaling, &cfg);
        assert_eq!(scaling.berserk, 0);
        assert_eq!(scaling.adrenaline, cfg.power_strike_scaling_adrenaline);
        assert_eq!(scaling.rage, 2);
    }
}
