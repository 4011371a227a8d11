//! The monster roster: stat blocks, specials, and tier placement.

use arena_core::{Combatant, Monster, SpecialMove};

/// Every monster the arena can field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonsterKind {
    #[strum(serialize = "green slime")]
    GreenSlime,
    #[strum(serialize = "young goblin")]
    YoungGoblin,
    #[strum(serialize = "imp")]
    Imp,
    #[strum(serialize = "brittle skeleton")]
    BrittleSkeleton,
    #[strum(serialize = "wolf pup")]
    WolfPup,
    #[strum(serialize = "red slime")]
    RedSlime,
    #[strum(serialize = "noob ghost")]
    NoobGhost,
    #[strum(serialize = "javelina")]
    Javelina,
    #[strum(serialize = "goblin archer")]
    GoblinArcher,
    #[strum(serialize = "dire wolf pup")]
    DireWolfPup,
    #[strum(serialize = "wolf pup rider")]
    WolfPupRider,
    #[strum(serialize = "fallen warrior")]
    FallenWarrior,
}

/// Tier pools used by the round-weighted encounter tables.
pub const TIER_ONE: &[MonsterKind] = &[
    MonsterKind::GreenSlime,
    MonsterKind::YoungGoblin,
    MonsterKind::Imp,
    MonsterKind::BrittleSkeleton,
    MonsterKind::WolfPup,
];

pub const TIER_TWO: &[MonsterKind] = &[
    MonsterKind::RedSlime,
    MonsterKind::NoobGhost,
    MonsterKind::Javelina,
    MonsterKind::GoblinArcher,
    MonsterKind::DireWolfPup,
];

pub const TIER_THREE: &[MonsterKind] = &[MonsterKind::WolfPupRider];

/// Boss pool for the final round.
pub const TIER_FOUR: &[MonsterKind] = &[MonsterKind::FallenWarrior];

impl MonsterKind {
    pub const fn tier(self) -> u8 {
        match self {
            Self::GreenSlime
            | Self::YoungGoblin
            | Self::Imp
            | Self::BrittleSkeleton
            | Self::WolfPup => 1,
            Self::RedSlime
            | Self::NoobGhost
            | Self::Javelina
            | Self::GoblinArcher
            | Self::DireWolfPup => 2,
            Self::WolfPupRider => 3,
            Self::FallenWarrior => 4,
        }
    }

    /// Build a fresh combat-ready monster of this kind.
    pub fn spawn(self) -> Monster {
        match self {
            Self::GreenSlime => {
                Monster::new(Combatant::new("green slime", 10, 1, 2, 0, 1), 5, 0)
                    .with_special(SpecialMove::PoisonSpit)
                    .with_essence("green slime essence")
            }
            Self::YoungGoblin => {
                Monster::new(Combatant::new("young goblin", 8, 1, 3, 1, 1), 7, 0)
                    .with_special(SpecialMove::CheapShot)
                    .with_essence("young goblin essence")
            }
            Self::Imp => Monster::new(Combatant::new("imp", 9, 2, 4, 0, 1), 7, 0)
                .with_special(SpecialMove::SneakAttack)
                .with_essence("imp essence"),
            Self::BrittleSkeleton => {
                Monster::new(Combatant::new("brittle skeleton", 12, 2, 5, 1, 1), 9, 0)
                    .with_special(SpecialMove::SkeletonThrust)
                    .with_essence("skeleton essence")
            }
            Self::WolfPup => Monster::new(Combatant::new("wolf pup", 13, 3, 5, 2, 2), 13, 0)
                .with_special(SpecialMove::ViciousBite)
                .with_essence("wolf essence"),
            Self::RedSlime => Monster::new(Combatant::new("red slime", 16, 2, 4, 1, 2), 16, 0)
                .with_special(SpecialMove::FireSpit)
                .with_essence("red slime essence"),
            Self::NoobGhost => {
                let mut ghost = Monster::new(Combatant::new("noob ghost", 16, 3, 6, 0, 2), 13, 0)
                    .with_special(SpecialMove::LifeLeech)
                    .with_essence("ghost essence");
                // Life Leech can overheal up to 150% so drain is never wasted.
                ghost.base.set_overheal_cap(24);
                ghost
            }
            Self::Javelina => Monster::new(Combatant::new("javelina", 18, 3, 6, 2, 2), 18, 0)
                .with_special(SpecialMove::ImpactBite)
                .with_essence("javelina essence"),
            Self::GoblinArcher => {
                Monster::new(Combatant::new("goblin archer", 15, 3, 5, 1, 2), 17, 0)
                    .with_special(SpecialMove::ParalyzingShot)
                    .with_essence("goblin archer essence")
            }
            Self::DireWolfPup => {
                Monster::new(Combatant::new("dire wolf pup", 16, 4, 6, 2, 2), 19, 0)
                    .with_special(SpecialMove::DevouringBite)
                    .with_essence("dire wolf pup essence")
            }
            Self::WolfPupRider => {
                Monster::new(Combatant::new("wolf pup rider", 21, 3, 7, 3, 2), 23, 0)
                    .with_special(SpecialMove::BlindingCharge)
                    .with_essence("young goblin essence")
                    .with_essence("wolf pup essence")
            }
            Self::FallenWarrior => {
                Monster::new(Combatant::new("fallen warrior", 43, 5, 9, 3, 4), 43, 0)
                    .with_special(SpecialMove::DefenceWarp)
                    .with_essence("fallen warrior essence")
                    .boss()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_kind_spawns_with_a_special_and_an_essence() {
        for kind in MonsterKind::iter() {
            let monster = kind.spawn();
            assert!(monster.special.is_some(), "{kind} has no special");
            assert!(!monster.essences.is_empty(), "{kind} drops no essence");
            assert!(monster.base.hp() > 0);
            assert!(monster.base.min_atk <= monster.base.max_atk);
        }
    }

    #[test]
    fn only_the_fallen_warrior_is_a_boss() {
        for kind in MonsterKind::iter() {
            let monster = kind.spawn();
            assert_eq!(monster.is_boss, kind == MonsterKind::FallenWarrior);
        }
    }

    #[test]
    fn tier_pools_cover_the_roster_exactly_once() {
        let pooled = TIER_ONE.len() + TIER_TWO.len() + TIER_THREE.len() + TIER_FOUR.len();
        assert_eq!(pooled, MonsterKind::iter().count());
        for kind in MonsterKind::iter() {
            let pool = match kind.tier() {
                1 => TIER_ONE,
                2 => TIER_TWO,
                3 => TIER_THREE,
                _ => TIER_FOUR,
            };
            assert!(pool.contains(&kind));
        }
    }

    #[test]
    fn ghost_carries_an_overheal_pool() {
        let ghost = MonsterKind::NoobGhost.spawn();
        assert_eq!(ghost.base.overheal_cap(), 24);
    }
}
