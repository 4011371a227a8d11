//! Monsters: a combatant body, rewards, and at most one special move.
//!
//! Monster AP is a per-fight budget spent only on special moves and never
//! restored, so "once per fight" specials fall out of a 1-AP pool rather
//! than bespoke flags.

use crate::combatant::Combatant;
use crate::hero::Hero;

/// Closed set of monster special moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialMove {
    /// Small physical hit plus a 2-damage, 2-turn poison. First turn only.
    #[strum(serialize = "Poison Spit")]
    PoisonSpit,
    /// Physical hit, true fire damage, and a burn stack.
    #[strum(serialize = "Fire Spit")]
    FireSpit,
    /// Long blind plus a max-damage hit that ignores defence. Once per fight.
    #[strum(serialize = "Cheap Shot")]
    CheapShot,
    /// Physical hit that paralyzes and leaves the hero unable to brace.
    #[strum(serialize = "Paralyzing Shot")]
    ParalyzingShot,
    /// Guaranteed max damage, +1 against an undefended hero.
    #[strum(serialize = "Sneak Attack")]
    SneakAttack,
    /// Flat 6 damage ignoring defence, +1 against an undefended hero.
    #[strum(serialize = "Skeleton Thrust")]
    SkeletonThrust,
    /// Physical hit plus a 1-5 bite that ignores defence.
    #[strum(serialize = "Vicious Bite")]
    ViciousBite,
    /// Physical hit that heals the biter for half the damage dealt.
    #[strum(serialize = "Devouring Bite")]
    DevouringBite,
    /// Physical hit plus a defence-ignoring drain that overheals the caster.
    #[strum(serialize = "Life Leech")]
    LifeLeech,
    /// 4-8 direct damage; blinds and stops the hero unless already blind.
    #[strum(serialize = "Blinding Charge")]
    BlindingCharge,
    /// 4-6 physical hit with a 2-4 follow-up bite against weak defence.
    #[strum(serialize = "Impact Bite")]
    ImpactBite,
    /// Heavy strike that destabilises the hero's armour in phases.
    #[strum(serialize = "Defence Warp")]
    DefenceWarp,
}

impl SpecialMove {
    /// Percent chance the move is attempted on an eligible turn.
    pub const fn trigger_chance(self) -> u32 {
        match self {
            // Guaranteed when eligible; eligibility itself is the gate.
            Self::PoisonSpit | Self::CheapShot | Self::SneakAttack | Self::SkeletonThrust => 100,
            Self::BlindingCharge | Self::DefenceWarp => 33,
            _ => 50,
        }
    }

    /// Only usable on the monster's first combat turn.
    pub const fn first_turn_only(self) -> bool {
        matches!(self, Self::PoisonSpit)
    }

    /// Usable once per fight regardless of remaining AP.
    pub const fn once_per_fight(self) -> bool {
        matches!(self, Self::CheapShot)
    }

    /// Situational decline: some moves refuse to fire when they cannot
    /// accomplish anything, before any chance roll is made.
    pub fn declines(self, monster: &Monster, hero: &Hero) -> bool {
        match self {
            // Never waste AP on a stop that cannot stick.
            Self::ParalyzingShot => {
                hero.status.turn_stop.is_pending() || hero.status.turn_stop.chain_guard
            }
            // Lifesteal is pointless at full health.
            Self::DevouringBite => monster.base.hp() >= monster.base.max_hp(),
            _ => false,
        }
    }
}

/// One enemy combatant, created fresh per fight.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub base: Combatant,
    pub xp: i32,
    pub gold: i32,
    pub essences: Vec<String>,
    pub special: Option<SpecialMove>,
    /// Completed enemy turns this fight; drives first-turn specials.
    pub turns_taken: u32,
    /// Set once a once-per-fight special has fired.
    pub special_spent: bool,
    /// Defeating a boss ends the whole sequence, not just the fight.
    pub is_boss: bool,
}

impl Monster {
    pub fn new(base: Combatant, xp: i32, gold: i32) -> Self {
        Self {
            base,
            xp,
            gold,
            essences: Vec::new(),
            special: None,
            turns_taken: 0,
            special_spent: false,
            is_boss: false,
        }
    }

    pub fn with_special(mut self, special: SpecialMove) -> Self {
        self.special = Some(special);
        self
    }

    pub fn with_essence(mut self, essence: impl Into<String>) -> Self {
        self.essences.push(essence.into());
        self
    }

    pub fn boss(mut self) -> Self {
        self.is_boss = true;
        self
    }

    /// The special this monster would attempt right now, before the chance
    /// roll: checks AP, first-turn and once-per-fight gates, and declines.
    pub fn eligible_special(&self, hero: &Hero) -> Option<SpecialMove> {
        let special = self.special?;
        if self.base.ap() < 1 {
            return None;
        }
        if special.first_turn_only() && self.turns_taken > 0 {
            return None;
        }
        if special.once_per_fight() && self.special_spent {
            return None;
        }
        if special.declines(self, hero) {
            return None;
        }
        Some(special)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StopReason;

    fn slime() -> Monster {
        Monster::new(Combatant::new("green slime", 10, 1, 2, 0, 1), 5, 0)
            .with_special(SpecialMove::PoisonSpit)
    }

    #[test]
    fn first_turn_specials_expire_after_turn_one() {
        let hero = Hero::warrior("Galvin");
        let mut monster = slime();
        assert_eq!(monster.eligible_special(&hero), Some(SpecialMove::PoisonSpit));
        monster.turns_taken = 1;
        assert_eq!(monster.eligible_special(&hero), None);
    }

    #[test]
    fn specials_need_ap() {
        let hero = Hero::warrior("Galvin");
        let mut monster = slime();
        monster.base.try_spend_ap(1);
        assert_eq!(monster.eligible_special(&hero), None);
    }

    #[test]
    fn once_per_fight_specials_do_not_repeat() {
        let hero = Hero::warrior("Galvin");
        let mut goblin = Monster::new(Combatant::new("young goblin", 8, 1, 3, 1, 1), 7, 0)
            .with_special(SpecialMove::CheapShot);
        assert_eq!(goblin.eligible_special(&hero), Some(SpecialMove::CheapShot));
        goblin.special_spent = true;
        assert_eq!(goblin.eligible_special(&hero), None);
    }

    #[test]
    fn paralyzing_shot_declines_against_a_stopped_hero() {
        let mut hero = Hero::warrior("Galvin");
        let archer = Monster::new(Combatant::new("goblin archer", 15, 3, 5, 1, 2), 17, 0)
            .with_special(SpecialMove::ParalyzingShot);
        assert!(archer.eligible_special(&hero).is_some());

        hero.status.turn_stop.apply(1, StopReason::Paralyzed);
        assert_eq!(archer.eligible_special(&hero), None);

        // Chain guard alone also declines it.
        hero.status.turn_stop.resolve();
        assert!(hero.status.turn_stop.chain_guard);
        assert_eq!(archer.eligible_special(&hero), None);
    }

    #[test]
    fn devouring_bite_declines_at_full_health() {
        let hero = Hero::warrior("Galvin");
        let mut wolf = Monster::new(Combatant::new("dire wolf pup", 16, 4, 6, 2, 2), 19, 0)
            .with_special(SpecialMove::DevouringBite);
        assert_eq!(wolf.eligible_special(&hero), None);
        wolf.base.take_damage(3);
        assert_eq!(wolf.eligible_special(&hero), Some(SpecialMove::DevouringBite));
    }
}
