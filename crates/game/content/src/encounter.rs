//! Tier-weighted encounter selection and the five-round arena driver.

use arena_core::{
    ActionProvider, BalanceConfig, BattleOutcome, Dice, Hero, Monster, start_battle,
};

use crate::roster::{MonsterKind, TIER_FOUR, TIER_ONE, TIER_THREE, TIER_TWO};

/// Rounds in one arena run; the last one is always a boss.
pub const ARENA_ROUNDS: u32 = 5;

/// Per-round tier weights, in percent. Later rounds shift the mass toward
/// the higher tiers; round 5 skips the table and fields a boss.
const ROUND_WEIGHTS: [&[(u8, u32)]; 4] = [
    &[(1, 80), (2, 20)],
    &[(1, 60), (2, 40)],
    &[(1, 10), (2, 80), (3, 10)],
    &[(2, 10), (3, 90)],
];

/// Pick the monster tier for a round.
pub fn round_tier(round: u32, dice: &mut impl Dice) -> u8 {
    if round >= ARENA_ROUNDS {
        return 4;
    }
    let weights = ROUND_WEIGHTS[(round.max(1) - 1) as usize];
    let roll = dice.roll(1, 100) as u32;
    let mut cumulative = 0;
    for &(tier, weight) in weights {
        cumulative += weight;
        if roll <= cumulative {
            return tier;
        }
    }
    // Weights sum to 100, so this only covers a short table.
    weights[weights.len() - 1].0
}

fn tier_pool(tier: u8) -> &'static [MonsterKind] {
    match tier {
        1 => TIER_ONE,
        2 => TIER_TWO,
        3 => TIER_THREE,
        _ => TIER_FOUR,
    }
}

/// Roll the tier for the round and spawn a random monster from its pool.
pub fn select_arena_enemy(round: u32, dice: &mut impl Dice) -> Monster {
    let tier = round_tier(round, dice);
    let pool = tier_pool(tier);
    let index = dice.roll(0, pool.len() as i32 - 1) as usize;
    pool[index].spawn()
}

/// How an arena run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The hero cleared all rounds and felled the boss.
    Champion,
    Defeated { round: u32 },
}

/// Drive a full five-round arena run.
///
/// Each cleared round pays out the monster's XP, gold, and essences, then
/// clears combat-scoped statuses and refills AP. A hero who owns Death
/// Defier gets the spent save back once, just before the boss round.
pub fn run_arena<D: Dice>(
    hero: &mut Hero,
    provider: &mut dyn ActionProvider,
    dice: &mut D,
    cfg: &BalanceConfig,
) -> RunOutcome {
    for round in 1..=ARENA_ROUNDS {
        if round == ARENA_ROUNDS && hero.status.death_defier.owned && hero.status.death_defier.used
        {
            hero.status.death_defier.used = false;
            tracing::debug!("death defier restored for the final round");
        }

        let mut enemy = select_arena_enemy(round, dice);
        tracing::debug!(round, enemy = %enemy.base.name, "arena round begins");

        match start_battle(hero, &mut enemy, provider, dice, cfg) {
            BattleOutcome::HeroLost => return RunOutcome::Defeated { round },
            BattleOutcome::HeroWon | BattleOutcome::SequenceWon => {
                let mut events = Vec::new();
                hero.gain_xp(enemy.xp, &mut events);
                hero.gain_gold(enemy.gold);
                hero.essences.extend(enemy.essences.iter().cloned());
                provider.observe(&events);
                hero.reset_between_fights();
            }
        }
    }
    RunOutcome::Champion
}
