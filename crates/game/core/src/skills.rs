//! Skill definitions, rank economics, and per-rank magnitude tables.
//!
//! Ranks run 1..=10 but combat magnitude is capped at rank 5; ranks past
//! the cap are prestige only. Skill points invest one threshold at a time
//! into a per-skill bank, so partial progress toward an expensive rank is
//! never lost.

use crate::config::BalanceConfig;

/// Identity of a learnable skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillId {
    #[strum(serialize = "Heal")]
    Heal,
    #[strum(serialize = "Power Strike")]
    PowerStrike,
    #[strum(serialize = "War Cry")]
    WarCry,
    #[strum(serialize = "Death Defier")]
    DeathDefier,
}

impl SkillId {
    /// Ranked skills progress 1..=10; Death Defier is a one-shot passive.
    pub const fn is_ranked(self) -> bool {
        !matches!(self, Self::DeathDefier)
    }

    const fn index(self) -> Option<usize> {
        match self {
            Self::Heal => Some(0),
            Self::PowerStrike => Some(1),
            Self::WarCry => Some(2),
            Self::DeathDefier => None,
        }
    }
}

/// Highest attainable rank.
pub const MAX_RANK: u8 = 10;

/// Skill points needed to climb from rank `i` to rank `i + 1`.
pub const UPGRADE_COSTS: [u32; MAX_RANK as usize] = [1, 1, 2, 3, 4, 5, 6, 7, 8, 10];

/// Heal percentages of max HP by usable rank (index = rank - 1).
pub const HEAL_PERCENTS: [i32; 5] = [10, 20, 35, 50, 75];

/// War Cry (attack bonus, duration in actions) by usable rank.
pub const WAR_CRY_EFFECTS: [(i32, u32); 5] = [(1, 3), (2, 3), (3, 3), (3, 4), (5, 3)];

/// AP cost of casting a ranked skill at the given usable rank.
pub const fn ap_cost(rank: u8) -> i32 {
    match rank {
        0 => 0,
        1 | 2 => 1,
        3 | 4 => 2,
        _ => 3,
    }
}

/// Power Strike base damage after per-rank scaling, floor division, min 1.
///
/// # Formula
/// - rank 1: `roll / 2`
/// - rank 2: `roll / 2` rounded up
/// - rank 3: `roll * 3 / 4`
/// - rank 4: `roll * 3 / 4` rounded up
/// - rank 5+: full roll
pub fn power_strike_scaled_base(roll: i32, rank: u8) -> i32 {
    let scaled = match rank {
        0 | 1 => roll / 2,
        2 => (roll + 1) / 2,
        3 => roll * 3 / 4,
        4 => (roll * 3 + 3) / 4,
        _ => roll,
    };
    scaled.max(1)
}

/// Result of investing points into a skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvestOutcome {
    /// Ranks gained by this investment.
    pub ranks_gained: u8,
    /// Points now banked toward the next rank.
    pub banked: u32,
}

/// Ranks and banked points for the three ranked skills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSheet {
    ranks: [u8; 3],
    banks: [u32; 3],
}

impl SkillSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rank(&self, id: SkillId) -> u8 {
        id.index().map(|i| self.ranks[i]).unwrap_or(0)
    }

    /// Rank actually used for combat magnitude: capped at the combat cap.
    pub fn usable_rank(&self, id: SkillId) -> u8 {
        self.rank(id).min(BalanceConfig::COMBAT_RANK_CAP)
    }

    pub fn knows(&self, id: SkillId) -> bool {
        self.rank(id) > 0
    }

    pub fn banked(&self, id: SkillId) -> u32 {
        id.index().map(|i| self.banks[i]).unwrap_or(0)
    }

    /// Points still needed before the next rank threshold is met.
    pub fn points_to_next_rank(&self, id: SkillId) -> Option<u32> {
        let i = id.index()?;
        let rank = self.ranks[i] as usize;
        if rank >= MAX_RANK as usize {
            return None;
        }
        Some(UPGRADE_COSTS[rank].saturating_sub(self.banks[i]))
    }

    /// Invest points into a ranked skill. Points bank toward the next rank,
    /// thresholds consume the bank, and overflow carries toward the rank
    /// after. Points aimed past rank 10 are refused (outcome is zeroed and
    /// the caller keeps them).
    pub fn invest(&mut self, id: SkillId, points: u32) -> InvestOutcome {
        let Some(i) = id.index() else {
            return InvestOutcome::default();
        };
        if self.ranks[i] >= MAX_RANK || points == 0 {
            return InvestOutcome::default();
        }

        self.banks[i] += points;
        let mut gained = 0u8;
        while self.ranks[i] < MAX_RANK {
            let cost = UPGRADE_COSTS[self.ranks[i] as usize];
            if self.banks[i] < cost {
                break;
            }
            self.banks[i] -= cost;
            self.ranks[i] += 1;
            gained += 1;
        }
        // A maxed skill keeps no bank.
        if self.ranks[i] >= MAX_RANK {
            self.banks[i] = 0;
        }
        InvestOutcome {
            ranks_gained: gained,
            banked: self.banks[i],
        }
    }

    /// Highest usable rank of the skill castable with the given AP, if any.
    pub fn highest_affordable(&self, id: SkillId, ap: i32) -> Option<u8> {
        let usable = self.usable_rank(id);
        (1..=usable).rev().find(|&rank| ap_cost(rank) <= ap)
    }

    #[cfg(test)]
    pub(crate) fn with_rank(id: SkillId, rank: u8) -> Self {
        let mut sheet = Self::default();
        if let Some(i) = id.index() {
            sheet.ranks[i] = rank;
        }
        sheet
    }
}
