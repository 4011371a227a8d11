//! Enemy turn resolution: special-move attempt, plain attack fallback,
//! and the end-of-turn defence-warp advance.

use crate::combatant::DefenceOptions;
use crate::dice::Dice;
use crate::event::CombatEvent;
use crate::monster::SpecialMove;
use crate::status::StopReason;

use super::{BattleEngine, Phase, TurnOutcome, TurnReport};

impl<D: Dice> BattleEngine<'_, D> {
    /// Resolve one full enemy turn.
    pub fn resolve_enemy_turn(&mut self) -> TurnReport {
        debug_assert_eq!(self.phase, Phase::EnemyTurn);
        let mut events = Vec::new();

        let special = self.enemy.eligible_special(self.hero).filter(|special| {
            special.trigger_chance() >= 100 || self.dice.chance(special.trigger_chance())
        });
        match special {
            Some(special) => {
                self.enemy.base.try_spend_ap(1);
                if special.once_per_fight() {
                    self.enemy.special_spent = true;
                }
                tracing::debug!(enemy = %self.enemy.base.name, %special, "special move fired");
                self.resolve_special(special, &mut events);
            }
            None => self.plain_attack(&mut events),
        }

        self.enemy.turns_taken += 1;
        if self.hero_fatality(&mut events) {
            return TurnReport {
                outcome: TurnOutcome::HeroDefeated,
                events,
                turn_spent: true,
            };
        }

        if let Some((warp_phase, defence)) = self.hero.status.defence_warp.advance() {
            self.hero.base.set_defence(defence);
            events.push(CombatEvent::DefenceWarped {
                phase: warp_phase,
                defence,
            });
        }
        if self.hero.status.berserk.tick() {
            events.push(CombatEvent::BerserkFaded);
        }
        self.hero.note_berserk_pending();

        self.phase = Phase::HeroUpkeep;
        TurnReport::cont(events, true)
    }

    /// Plain attack roll; a paralysis-vulnerable hero eats the maximum.
    fn plain_attack(&mut self, events: &mut Vec<CombatEvent>) {
        let roll = if self.hero.status.paralyze_vulnerable {
            self.hero.status.paralyze_vulnerable = false;
            self.enemy.base.max_atk
        } else {
            self.enemy.base.attack_roll(self.dice)
        };
        let report = self.hero.mitigate(roll, DefenceOptions::default());
        self.hero.base.take_damage(report.actual);
        events.push(CombatEvent::EnemyAttack {
            roll,
            damage: report.actual,
            blocked: report.blocked,
            tier: report.tier,
        });
    }

    /// Mitigated physical component shared by most specials.
    fn special_physical(&mut self, roll: i32) -> i32 {
        let report = self.hero.mitigate(roll, DefenceOptions::default());
        self.hero.base.take_damage(report.actual);
        report.actual
    }

    /// Unmitigated damage component. Returns the HP actually lost.
    fn special_direct(&mut self, amount: i32) -> i32 {
        self.hero.base.take_damage(amount)
    }

    fn resolve_special(&mut self, special: SpecialMove, events: &mut Vec<CombatEvent>) {
        let name: &'static str = match special {
            SpecialMove::PoisonSpit => "Poison Spit",
            SpecialMove::FireSpit => "Fire Spit",
            SpecialMove::CheapShot => "Cheap Shot",
            SpecialMove::ParalyzingShot => "Paralyzing Shot",
            SpecialMove::SneakAttack => "Sneak Attack",
            SpecialMove::SkeletonThrust => "Skeleton Thrust",
            SpecialMove::ViciousBite => "Vicious Bite",
            SpecialMove::DevouringBite => "Devouring Bite",
            SpecialMove::LifeLeech => "Life Leech",
            SpecialMove::BlindingCharge => "Blinding Charge",
            SpecialMove::ImpactBite => "Impact Bite",
            SpecialMove::DefenceWarp => "Defence Warp",
        };

        match special {
            SpecialMove::PoisonSpit => {
                let roll = self.dice.roll(1, 3);
                let damage = self.special_physical(roll);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
                self.hero.status.poison.apply(2, 2);
                events.push(CombatEvent::PoisonApplied { amount: 2, turns: 2 });
            }
            SpecialMove::FireSpit => {
                let roll = self.enemy.base.attack_roll(self.dice);
                let physical = self.special_physical(roll);
                // True fire damage bypasses defence entirely.
                let fire_roll = self.dice.roll(2, 3);
                let fire = self.special_direct(fire_roll);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage: physical + fire,
                    self_heal: 0,
                });
                self.hero.status.burns.apply();
                events.push(CombatEvent::BurnApplied {
                    stacks: self.hero.status.burns.stack_count(),
                });
            }
            SpecialMove::CheapShot => {
                self.hero.status.blind.apply(3, true);
                events.push(CombatEvent::BlindApplied { turns: 3 });
                let damage = self.special_direct(self.enemy.base.max_atk);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
            }
            SpecialMove::ParalyzingShot => {
                let roll = self.enemy.base.attack_roll(self.dice);
                let damage = self.special_physical(roll);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
                self.hero.status.turn_stop.apply(1, StopReason::Paralyzed);
                events.push(CombatEvent::TurnStopApplied {
                    turns: 1,
                    reason: StopReason::Paralyzed,
                });
                // Leaves the hero unable to brace against the next hit.
                self.hero.status.paralyze_vulnerable = true;
            }
            SpecialMove::SneakAttack => {
                let mut damage = self.enemy.base.max_atk;
                if self.hero.base.defence() == 0 {
                    damage += 1;
                }
                let damage = self.special_direct(damage);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
            }
            SpecialMove::SkeletonThrust => {
                let mut damage = 6;
                if self.hero.base.defence() == 0 {
                    damage += 1;
                }
                let damage = self.special_direct(damage);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
            }
            SpecialMove::ViciousBite => {
                let roll = self.dice.roll(2, 5);
                let physical = self.special_physical(roll);
                let bite_roll = self.dice.roll(1, 5);
                let bite = self.special_direct(bite_roll);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage: physical + bite,
                    self_heal: 0,
                });
            }
            SpecialMove::DevouringBite => {
                let roll = self.enemy.base.attack_roll(self.dice);
                let damage = self.special_physical(roll);
                let healed = self.enemy.base.heal(damage / 2);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: healed,
                });
            }
            SpecialMove::LifeLeech => {
                let roll = self.enemy.base.attack_roll(self.dice);
                let physical = self.special_physical(roll);
                // Drain keys off the original roll, not the mitigated hit,
                // and never heals more than the hero actually lost.
                let drained = self.special_direct((roll / 2).max(1));
                let healed = self.enemy.base.overheal(drained);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage: physical + drained,
                    self_heal: healed,
                });
            }
            SpecialMove::BlindingCharge => {
                let roll = self.dice.roll(4, 8);
                let damage = self.special_direct(roll);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
                // An already-blind hero just takes the hit.
                if !self.hero.status.blind.is_active() {
                    self.hero.status.blind.apply(1, false);
                    events.push(CombatEvent::BlindApplied { turns: 1 });
                    self.hero.status.turn_stop.apply(1, StopReason::Blinded);
                    events.push(CombatEvent::TurnStopApplied {
                        turns: 1,
                        reason: StopReason::Blinded,
                    });
                }
            }
            SpecialMove::ImpactBite => {
                let roll = self.dice.roll(4, 6);
                let mut damage = self.special_physical(roll);
                if self.hero.base.defence() <= 1 && self.hero.base.is_alive() {
                    let bite_roll = self.dice.roll(2, 4);
                    damage += self.special_direct(bite_roll);
                }
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
            }
            SpecialMove::DefenceWarp => {
                let max = self.enemy.base.max_atk;
                let roll = self.dice.roll(max, max + 2);
                let damage = self.special_physical(roll);
                events.push(CombatEvent::SpecialMoveUsed {
                    name,
                    damage,
                    self_heal: 0,
                });
                // Nothing to warp on a fully absorbed hit or a bare hero.
                let warp_active = self.hero.status.defence_warp.is_active();
                if damage > 0 && (self.hero.base.defence() > 0 || warp_active) {
                    self.hero.status.defence_warp.trigger(self.hero.base.defence());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::config::BalanceConfig;
    use crate::dice::SequenceDice;
    use crate::hero::Hero;
    use crate::monster::Monster;
    use crate::status::WarpPhase;

    fn engine_dice_enemy_first() -> SequenceDice {
        let mut dice = SequenceDice::new();
        dice.push_chance(false); // coin flip: enemy first
        dice
    }

    fn run_open(hero: &mut Hero, enemy: &mut Monster, dice: &mut SequenceDice) -> TurnReport {
        let mut engine = BattleEngine::new(hero, enemy, dice, BalanceConfig::default());
        engine.open()
    }

    #[test]
    fn poison_spit_fires_only_on_the_first_turn() {
        let mut hero = Hero::warrior("Galvin");
        let mut slime = Monster::new(Combatant::new("green slime", 10, 1, 2, 0, 1), 5, 0)
            .with_special(SpecialMove::PoisonSpit);
        let mut dice = engine_dice_enemy_first();
        dice.push_roll(2); // spit physical roll

        let report = run_open(&mut hero, &mut slime, &mut dice);
        assert!(report.events.contains(&CombatEvent::PoisonApplied {
            amount: 2,
            turns: 2,
        }));
        assert!(hero.status.poison.active);
        assert_eq!(hero.base.hp(), 28);
        assert_eq!(slime.base.ap(), 0);
        assert_eq!(slime.turns_taken, 1);
    }

    #[test]
    fn cheap_shot_blinds_and_ignores_defence() {
        let mut hero = Hero::warrior("Galvin");
        hero.base.set_defence(5);
        let mut goblin = Monster::new(Combatant::new("young goblin", 8, 1, 3, 1, 1), 7, 0)
            .with_special(SpecialMove::CheapShot);
        let mut dice = engine_dice_enemy_first();

        let report = run_open(&mut hero, &mut goblin, &mut dice);
        assert!(report.events.contains(&CombatEvent::BlindApplied { turns: 3 }));
        assert!(hero.status.blind.long);
        // Max damage 3 straight through the 5 defence.
        assert_eq!(hero.base.hp(), 27);
        assert!(goblin.special_spent);
    }

    #[test]
    fn paralyzing_shot_stops_and_exposes_the_hero() {
        let mut hero = Hero::warrior("Galvin");
        let mut archer = Monster::new(Combatant::new("goblin archer", 15, 3, 5, 1, 2), 17, 0)
            .with_special(SpecialMove::ParalyzingShot);
        let mut dice = engine_dice_enemy_first();
        dice.push_chance(true); // 50% trigger
        dice.push_roll(4);

        let report = run_open(&mut hero, &mut archer, &mut dice);
        assert!(report.events.contains(&CombatEvent::TurnStopApplied {
            turns: 1,
            reason: StopReason::Paralyzed,
        }));
        assert!(hero.status.turn_stop.is_pending());
        assert!(hero.status.paralyze_vulnerable);
        assert_eq!(hero.base.hp(), 26);
    }

    #[test]
    fn paralysis_vulnerability_forces_a_max_roll_once() {
        let mut hero = Hero::warrior("Galvin");
        hero.status.paralyze_vulnerable = true;
        let mut wolf = Monster::new(Combatant::new("wolf pup", 13, 3, 5, 2, 0), 13, 0);
        let mut dice = engine_dice_enemy_first();

        let report = run_open(&mut hero, &mut wolf, &mut dice);
        assert!(report.events.contains(&CombatEvent::EnemyAttack {
            roll: 5,
            damage: 5,
            blocked: 0,
            tier: crate::combatant::BlockTier::None,
        }));
        assert!(!hero.status.paralyze_vulnerable);
    }

    #[test]
    fn life_leech_overheals_the_caster() {
        let mut hero = Hero::warrior("Galvin");
        let mut ghost = Monster::new(Combatant::new("noob ghost", 16, 3, 6, 0, 2), 13, 0)
            .with_special(SpecialMove::LifeLeech);
        ghost.base.set_overheal_cap(24);
        let mut dice = engine_dice_enemy_first();
        dice.push_chance(true);
        dice.push_roll(6);

        let report = run_open(&mut hero, &mut ghost, &mut dice);
        // Physical 6 plus drain 3; ghost overheals from 16 to 19.
        assert!(report.events.contains(&CombatEvent::SpecialMoveUsed {
            name: "Life Leech",
            damage: 9,
            self_heal: 3,
        }));
        assert_eq!(ghost.base.hp(), 19);
        assert_eq!(hero.base.hp(), 21);
    }

    #[test]
    fn devouring_bite_heals_half_the_damage_dealt() {
        let mut hero = Hero::warrior("Galvin");
        let mut wolf = Monster::new(Combatant::new("dire wolf pup", 16, 4, 6, 2, 2), 19, 0)
            .with_special(SpecialMove::DevouringBite);
        wolf.base.take_damage(6); // wounded, so the move is eligible
        let mut dice = engine_dice_enemy_first();
        dice.push_chance(true);
        dice.push_roll(6);

        let report = run_open(&mut hero, &mut wolf, &mut dice);
        assert!(report.events.contains(&CombatEvent::SpecialMoveUsed {
            name: "Devouring Bite",
            damage: 6,
            self_heal: 3,
        }));
        assert_eq!(wolf.base.hp(), 13);
    }

    #[test]
    fn blinding_charge_skips_the_blind_on_an_already_blind_hero() {
        let mut hero = Hero::warrior("Galvin");
        hero.status.blind.apply(2, true);
        let mut rider = Monster::new(Combatant::new("wolf pup rider", 21, 3, 7, 3, 2), 23, 0)
            .with_special(SpecialMove::BlindingCharge);
        let mut dice = engine_dice_enemy_first();
        dice.push_chance(true);
        dice.push_roll(6);

        let report = run_open(&mut hero, &mut rider, &mut dice);
        assert!(report.events.contains(&CombatEvent::SpecialMoveUsed {
            name: "Blinding Charge",
            damage: 6,
            self_heal: 0,
        }));
        assert!(!report
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::BlindApplied { .. })));
        assert_eq!(hero.status.blind.turns_left, 2);
        assert!(!hero.status.turn_stop.is_pending());
    }

    #[test]
    fn defence_warp_collapses_armour_after_the_same_enemy_turn() {
        let mut hero = Hero::warrior("Galvin");
        hero.base.set_defence(4);
        let mut fallen = Monster::new(Combatant::new("fallen warrior", 43, 5, 9, 3, 4), 43, 0)
            .with_special(SpecialMove::DefenceWarp)
            .boss();
        let mut dice = engine_dice_enemy_first();
        dice.push_chance(true); // 33% trigger
        dice.push_roll(10); // warp roll, 9..=11

        let report = run_open(&mut hero, &mut fallen, &mut dice);
        // 10 - 4 defence = 6 damage, then the warp advance zeroes defence.
        assert_eq!(hero.base.hp(), 24);
        assert!(report.events.contains(&CombatEvent::DefenceWarped {
            phase: WarpPhase::Collapsed,
            defence: 0,
        }));
        assert_eq!(hero.base.defence(), 0);

        // Two more enemy turns stabilise and then restore.
        let mut engine = BattleEngine::new(&mut hero, &mut fallen, &mut dice, BalanceConfig::default());
        engine.phase = Phase::EnemyTurn;
        let report = engine.resolve_enemy_turn();
        assert!(report.events.contains(&CombatEvent::DefenceWarped {
            phase: WarpPhase::Stabilising,
            defence: 2,
        }));
        engine.phase = Phase::EnemyTurn;
        let report = engine.resolve_enemy_turn();
        assert!(report.events.contains(&CombatEvent::DefenceWarped {
            phase: WarpPhase::Restored,
            defence: 4,
        }));
        assert_eq!(hero.base.defence(), 4);
    }

    #[test]
    fn declined_chance_falls_back_to_a_plain_attack() {
        let mut hero = Hero::warrior("Galvin");
        let mut slime = Monster::new(Combatant::new("red slime", 16, 2, 4, 1, 2), 16, 0)
            .with_special(SpecialMove::FireSpit);
        let mut dice = engine_dice_enemy_first();
        dice.push_chance(false); // fire spit chance fails
        dice.push_roll(3);

        let report = run_open(&mut hero, &mut slime, &mut dice);
        assert!(report.events.contains(&CombatEvent::EnemyAttack {
            roll: 3,
            damage: 3,
            blocked: 0,
            tier: crate::combatant::BlockTier::None,
        }));
        assert_eq!(slime.base.ap(), 2); // no AP spent on a declined special
    }
}
