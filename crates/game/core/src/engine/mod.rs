//! Battle engine: the alternating two-party turn sequencer.
//!
//! The engine owns no I/O. It borrows the hero, the enemy, and a dice
//! source for the duration of one fight, resolves discrete steps on
//! demand, and narrates everything through [`CombatEvent`] values.
//!
//! Call order per fight: [`BattleEngine::open`] once, then alternate
//! [`BattleEngine::begin_hero_turn`] / [`BattleEngine::resolve_player_action`]
//! with [`BattleEngine::resolve_enemy_turn`] until a terminal outcome.
//! [`start_battle`] drives that loop against an [`ActionProvider`].

mod enemy;

use crate::bonus::{BonusBreakdown, BonusContext};
use crate::combatant::DefenceOptions;
use crate::config::BalanceConfig;
use crate::dice::Dice;
use crate::error::ActionError;
use crate::event::CombatEvent;
use crate::hero::{Hero, PotionKind};
use crate::monster::Monster;
use crate::skills::{self, SkillId};
use crate::status::PoisonTick;

/// Where the engine currently sits in the turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Opening,
    HeroUpkeep,
    HeroAction,
    EnemyTurn,
    Over,
}

/// One discrete hero decision.
///
/// Skill casts auto-select the highest rank the current AP affords.
/// Every accepted action spends the turn, potions and Death Defier
/// priming included; only rejected actions leave the engine waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    UseSkill { id: SkillId },
    UsePotion { kind: PotionKind },
    Flee,
    Restart,
}

/// Resolution-level outcome of one engine step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    EnemyDefeated,
    /// A boss fell; the whole sequence is won, not just this fight.
    SequenceWon,
    HeroDefeated,
    Fled,
    /// Developer restart shortcut surfaced as data for the caller's loop.
    RestartRequested,
}

/// Events plus the outcome of one resolved step.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub events: Vec<CombatEvent>,
    /// Whether this step consumed the hero's turn.
    pub turn_spent: bool,
}

impl TurnReport {
    fn cont(events: Vec<CombatEvent>, turn_spent: bool) -> Self {
        Self {
            outcome: TurnOutcome::Continue,
            events,
            turn_spent,
        }
    }
}

/// What the hero-turn upkeep decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroTurnPhase {
    /// Upkeep done; the engine is waiting for one [`PlayerAction`].
    ActionRequired,
    /// The action was lost to a turn-stop; play passes to the enemy.
    ActionLost,
    /// Upkeep damage killed the hero with no save left.
    Defeated,
}

/// Read-only view of the battle for action selection and rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub hero_name: String,
    pub hero_hp: i32,
    pub hero_max_hp: i32,
    pub hero_ap: i32,
    pub hero_max_ap: i32,
    pub adrenaline_tier: i32,
    /// Flat damage bonuses a plain attack would carry right now.
    pub attack_bonuses: BonusBreakdown,
    pub berserk_active: bool,
    pub blind_turns: u32,
    pub poison_active: bool,
    pub burn_stacks: usize,
    pub enemy_name: String,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
}

/// Turn sequencer for a single fight.
pub struct BattleEngine<'a, D: Dice> {
    hero: &'a mut Hero,
    enemy: &'a mut Monster,
    dice: &'a mut D,
    cfg: BalanceConfig,
    phase: Phase,
}

impl<'a, D: Dice> BattleEngine<'a, D> {
    pub fn new(hero: &'a mut Hero, enemy: &'a mut Monster, dice: &'a mut D, cfg: BalanceConfig) -> Self {
        Self {
            hero,
            enemy,
            dice,
            cfg,
            phase: Phase::Opening,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            hero_name: self.hero.base.name.clone(),
            hero_hp: self.hero.base.hp(),
            hero_max_hp: self.hero.base.max_hp(),
            hero_ap: self.hero.base.ap(),
            hero_max_ap: self.hero.base.max_ap(),
            adrenaline_tier: self.hero.adrenaline_tier(),
            attack_bonuses: self.hero.damage_bonuses(BonusContext::BasicAttack, &self.cfg),
            berserk_active: self.hero.status.berserk.active,
            blind_turns: self.hero.status.blind.turns_left,
            poison_active: self.hero.status.poison.active,
            burn_stacks: self.hero.status.burns.stack_count(),
            enemy_name: self.enemy.base.name.clone(),
            enemy_hp: self.enemy.base.hp(),
            enemy_max_hp: self.enemy.base.max_hp(),
        }
    }

    /// Open the battle: coin-flip the initiative and, when the enemy wins
    /// it, resolve its opening strike immediately.
    pub fn open(&mut self) -> TurnReport {
        debug_assert_eq!(self.phase, Phase::Opening);
        let hero_first = self.dice.coin_flip();
        let mut events = vec![CombatEvent::BattleOpened { hero_first }];
        if let Some(shift) = self.hero.update_adrenaline() {
            events.push(shift);
        }
        if hero_first {
            self.phase = Phase::HeroUpkeep;
            return TurnReport::cont(events, false);
        }

        self.phase = Phase::EnemyTurn;
        let mut report = self.resolve_enemy_turn();
        events.append(&mut report.events);
        TurnReport {
            outcome: report.outcome,
            events,
            turn_spent: false,
        }
    }

    /// Run the fixed hero-turn upkeep: turn-stop, then (if acting) poison
    /// and burn ticks with interleaved death checks, berserk trigger, and
    /// the adrenaline update.
    pub fn begin_hero_turn(&mut self) -> (HeroTurnPhase, Vec<CombatEvent>) {
        debug_assert_eq!(self.phase, Phase::HeroUpkeep);
        let mut events = Vec::new();

        let stop = &mut self.hero.status.turn_stop;
        if stop.remaining > 0 && stop.chain_guard {
            events.push(CombatEvent::StopShrugged);
        }
        if let Some(reason) = self.hero.status.turn_stop.resolve() {
            events.push(CombatEvent::TurnStopped { reason });
            tracing::debug!(%reason, "hero action lost to turn stop");
            self.phase = Phase::EnemyTurn;
            return (HeroTurnPhase::ActionLost, events);
        }

        // DoT ticks happen only on turns the hero actually acts.
        match self.hero.status.poison.tick() {
            PoisonTick::Inactive | PoisonTick::Absorbed => {}
            PoisonTick::Damage { amount, expired } => {
                self.hero.base.take_damage(amount);
                events.push(CombatEvent::PoisonTick { damage: amount });
                if expired {
                    events.push(CombatEvent::PoisonFaded);
                }
                if self.hero_fatality(&mut events) {
                    return (HeroTurnPhase::Defeated, events);
                }
            }
        }

        let burn = self.hero.status.burns.tick(self.dice);
        if burn.total > 0 {
            self.hero.base.take_damage(burn.total);
            events.push(CombatEvent::BurnTick { damage: burn.total });
            if self.hero_fatality(&mut events) {
                return (HeroTurnPhase::Defeated, events);
            }
        }
        if burn.all_faded {
            events.push(CombatEvent::BurnsFaded);
        }

        if let Some(trigger) = self.hero.check_berserk_trigger(&self.cfg) {
            events.push(trigger);
        }
        if let Some(shift) = self.hero.update_adrenaline() {
            events.push(shift);
        }

        self.phase = Phase::HeroAction;
        (HeroTurnPhase::ActionRequired, events)
    }

    /// Resolve one hero decision. Rejected actions mutate nothing and leave
    /// the engine waiting for another action.
    pub fn resolve_player_action(&mut self, action: PlayerAction) -> Result<TurnReport, ActionError> {
        if self.phase != Phase::HeroAction {
            return Err(ActionError::OutOfPhase);
        }
        match action {
            PlayerAction::Attack => Ok(self.hero_attack()),
            PlayerAction::UseSkill { id } => self.use_skill(id),
            PlayerAction::UsePotion { kind } => self.use_potion(kind),
            PlayerAction::Flee => {
                self.phase = Phase::Over;
                Ok(TurnReport {
                    outcome: TurnOutcome::Fled,
                    events: vec![CombatEvent::Fled],
                    turn_spent: true,
                })
            }
            PlayerAction::Restart => {
                self.phase = Phase::Over;
                Ok(TurnReport {
                    outcome: TurnOutcome::RestartRequested,
                    events: Vec::new(),
                    turn_spent: true,
                })
            }
        }
    }

    // ===== hero offence =====

    fn hero_attack(&mut self) -> TurnReport {
        let mut events = Vec::new();
        match self.hero.status.blind.outgoing_multiplier() {
            None => events.push(CombatEvent::HeroMissed),
            Some((num, den)) => {
                let roll = self.hero.base.attack_roll(self.dice);
                let bonus = self
                    .hero
                    .damage_bonuses(BonusContext::BasicAttack, &self.cfg)
                    .total();
                let raw = (roll + bonus) * num / den;
                let report = self.enemy.base.apply_defence(raw, DefenceOptions::default());
                self.enemy.base.take_damage(report.actual);
                events.push(CombatEvent::HeroAttack {
                    roll,
                    bonus,
                    damage: report.actual,
                    blocked: report.blocked,
                    tier: report.tier,
                });
            }
        }
        self.finish_hero_action(events)
    }

    fn use_skill(&mut self, id: SkillId) -> Result<TurnReport, ActionError> {
        if id == SkillId::DeathDefier {
            return self.prime_death_defier();
        }
        if !self.hero.skills.knows(id) {
            return Err(ActionError::UnlearnedSkill(id));
        }
        let ap = self.hero.base.ap();
        let Some(rank) = self.hero.skills.highest_affordable(id, ap) else {
            return Err(ActionError::InsufficientAp {
                needed: skills::ap_cost(1),
                available: ap,
            });
        };

        match id {
            SkillId::Heal => {
                if self.hero.base.hp() >= self.hero.base.max_hp() {
                    return Err(ActionError::AlreadyAtFullHealth);
                }
                self.hero.base.try_spend_ap(skills::ap_cost(rank));
                let percent = skills::HEAL_PERCENTS[rank as usize - 1];
                let amount = (self.hero.base.max_hp() * percent + 99) / 100;
                let healed = self.hero.base.heal(amount);
                let mut events = vec![
                    CombatEvent::SkillUsed { id, rank },
                    CombatEvent::Healed { amount: healed },
                ];
                if let Some(shift) = self.hero.update_adrenaline() {
                    events.push(shift);
                }
                Ok(self.finish_hero_action(events))
            }
            SkillId::PowerStrike => {
                self.hero.base.try_spend_ap(skills::ap_cost(rank));
                let mut events = vec![CombatEvent::SkillUsed { id, rank }];
                match self.hero.status.blind.outgoing_multiplier() {
                    None => events.push(CombatEvent::HeroMissed),
                    Some((num, den)) => {
                        let roll = self.hero.base.attack_roll(self.dice);
                        let hit_bonus = self
                            .hero
                            .damage_bonuses(BonusContext::PowerStrikeHit, &self.cfg)
                            .total();
                        let scaling_bonus = self
                            .hero
                            .damage_bonuses(BonusContext::PowerStrikeScaling, &self.cfg)
                            .total();
                        let scaled = skills::power_strike_scaled_base(roll + scaling_bonus, rank);
                        let raw = (roll + hit_bonus + scaled) * num / den;
                        let report = self.enemy.base.apply_defence(raw, DefenceOptions::default());
                        self.enemy.base.take_damage(report.actual);
                        events.push(CombatEvent::PowerStrike {
                            rank,
                            roll,
                            scaled_base: scaled,
                            bonus: hit_bonus,
                            damage: report.actual,
                            blocked: report.blocked,
                            tier: report.tier,
                        });
                    }
                }
                Ok(self.finish_hero_action(events))
            }
            SkillId::WarCry => {
                self.hero.base.try_spend_ap(skills::ap_cost(rank));
                let (bonus, turns) = skills::WAR_CRY_EFFECTS[rank as usize - 1];
                self.hero.status.war_cry.apply(bonus, turns);
                let events = vec![
                    CombatEvent::SkillUsed { id, rank },
                    CombatEvent::WarCryShouted { bonus, turns },
                ];
                Ok(self.finish_hero_action(events))
            }
            SkillId::DeathDefier => unreachable!("handled above"),
        }
    }

    /// Prime the Death Defier save. Free for heroes who unlocked the free
    /// activation, 1 AP otherwise.
    fn prime_death_defier(&mut self) -> Result<TurnReport, ActionError> {
        let dd = &self.hero.status.death_defier;
        if !dd.owned {
            return Err(ActionError::DeathDefierNotOwned);
        }
        if dd.used {
            return Err(ActionError::DeathDefierSpent);
        }
        if dd.primed {
            return Err(ActionError::DeathDefierAlreadyPrimed);
        }
        if !dd.free_activation {
            if self.hero.base.ap() < 1 {
                return Err(ActionError::InsufficientAp {
                    needed: 1,
                    available: self.hero.base.ap(),
                });
            }
            self.hero.base.try_spend_ap(1);
        }
        self.hero.status.death_defier.primed = true;
        Ok(self.finish_hero_action(vec![CombatEvent::DeathDefierPrimed]))
    }

    fn use_potion(&mut self, kind: PotionKind) -> Result<TurnReport, ActionError> {
        if self.hero.potions.count(kind) == 0 {
            return Err(ActionError::OutOfPotions(kind));
        }
        let mut events = Vec::new();
        match kind {
            PotionKind::Heal | PotionKind::SuperHeal => {
                if self.hero.base.hp() >= self.hero.base.max_hp() {
                    return Err(ActionError::AlreadyAtFullHealth);
                }
                let percent = if kind == PotionKind::Heal {
                    BalanceConfig::POTION_HEAL_PERCENT
                } else {
                    BalanceConfig::POTION_SUPER_HEAL_PERCENT
                };
                self.hero.potions.try_take(kind);
                let amount = (self.hero.base.max_hp() * percent + 99) / 100;
                let healed = self.hero.base.heal(amount);
                events.push(CombatEvent::PotionUsed { kind });
                events.push(CombatEvent::Healed { amount: healed });
                if let Some(shift) = self.hero.update_adrenaline() {
                    events.push(shift);
                }
            }
            PotionKind::Ap => {
                self.hero.potions.try_take(kind);
                self.hero.base.restore_ap(BalanceConfig::POTION_AP_RESTORE);
                events.push(CombatEvent::PotionUsed { kind });
            }
            PotionKind::Antidote => {
                self.hero.potions.try_take(kind);
                events.push(CombatEvent::PotionUsed { kind });
                if self.hero.status.poison.cure() {
                    events.push(CombatEvent::PoisonCured);
                }
            }
            PotionKind::BurnCream => {
                self.hero.potions.try_take(kind);
                let stacks = self.hero.status.burns.clear();
                events.push(CombatEvent::PotionUsed { kind });
                events.push(CombatEvent::BurnsSoothed { stacks });
            }
        }
        Ok(self.finish_hero_action(events))
    }

    /// Post-action bookkeeping for a turn-spending hero action: kill check,
    /// berserk kill-extension, then the acted-turn status ticks.
    fn finish_hero_action(&mut self, mut events: Vec<CombatEvent>) -> TurnReport {
        if !self.enemy.base.is_alive() {
            if self.hero.status.berserk.active {
                self.hero.status.berserk.turns_left += 1;
                events.push(CombatEvent::BerserkExtended {
                    turns_left: self.hero.status.berserk.turns_left,
                });
            }
            events.push(CombatEvent::EnemyDefeated {
                xp: self.enemy.xp,
                gold: self.enemy.gold,
            });
            self.phase = Phase::Over;
            let outcome = if self.enemy.is_boss {
                TurnOutcome::SequenceWon
            } else {
                TurnOutcome::EnemyDefeated
            };
            return TurnReport {
                outcome,
                events,
                turn_spent: true,
            };
        }

        if let Some(full) = self.hero.status.blind.tick_after_action() {
            events.push(CombatEvent::BlindCleared { full });
        }
        if self.hero.status.war_cry.tick() {
            events.push(CombatEvent::WarCryFaded);
        }
        if self.hero.status.berserk.tick() {
            events.push(CombatEvent::BerserkFaded);
        }

        self.phase = Phase::EnemyTurn;
        TurnReport::cont(events, true)
    }

    /// Shared death check: spend the primed save or end the fight.
    /// Returns true when the hero is defeated.
    fn hero_fatality(&mut self, events: &mut Vec<CombatEvent>) -> bool {
        if self.hero.base.is_alive() {
            return false;
        }
        if self.hero.try_death_defier() {
            events.push(CombatEvent::DeathDefied);
            false
        } else {
            events.push(CombatEvent::HeroDefeated);
            self.phase = Phase::Over;
            true
        }
    }
}

// ===== non-interactive driver =====

/// Supplies hero decisions to [`start_battle`].
pub trait ActionProvider {
    fn next_action(&mut self, hud: &HudSnapshot) -> PlayerAction;

    /// Called with every batch of events as they resolve.
    fn observe(&mut self, _events: &[CombatEvent]) {}
}

/// Fight-level result of [`start_battle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    HeroWon,
    HeroLost,
    SequenceWon,
}

/// Rejected actions before the driver stops re-querying and forces a
/// plain attack, so a misbehaving provider cannot wedge the loop.
const MAX_REJECTIONS: u32 = 8;

/// Drive one fight to completion against the given provider.
///
/// Fleeing and restart requests both end the run as a loss: the arena does
/// not forgive deserters.
pub fn start_battle<D: Dice>(
    hero: &mut Hero,
    enemy: &mut Monster,
    provider: &mut dyn ActionProvider,
    dice: &mut D,
    cfg: &BalanceConfig,
) -> BattleOutcome {
    let mut engine = BattleEngine::new(hero, enemy, dice, cfg.clone());
    tracing::debug!(enemy = %engine.enemy.base.name, "battle opened");

    let report = engine.open();
    provider.observe(&report.events);
    if report.outcome == TurnOutcome::HeroDefeated {
        return BattleOutcome::HeroLost;
    }

    loop {
        let (turn, events) = engine.begin_hero_turn();
        provider.observe(&events);
        match turn {
            HeroTurnPhase::Defeated => return BattleOutcome::HeroLost,
            HeroTurnPhase::ActionLost => {}
            HeroTurnPhase::ActionRequired => {
                let mut rejections = 0;
                loop {
                    let action = if rejections < MAX_REJECTIONS {
                        provider.next_action(&engine.hud())
                    } else {
                        tracing::warn!("provider kept sending invalid actions, forcing attack");
                        PlayerAction::Attack
                    };
                    match engine.resolve_player_action(action) {
                        Ok(report) => {
                            provider.observe(&report.events);
                            match report.outcome {
                                TurnOutcome::Continue => {
                                    if report.turn_spent {
                                        break;
                                    }
                                }
                                TurnOutcome::EnemyDefeated => return BattleOutcome::HeroWon,
                                TurnOutcome::SequenceWon => return BattleOutcome::SequenceWon,
                                TurnOutcome::HeroDefeated => return BattleOutcome::HeroLost,
                                TurnOutcome::Fled => {
                                    tracing::warn!("hero fled the arena, counting as a loss");
                                    return BattleOutcome::HeroLost;
                                }
                                TurnOutcome::RestartRequested => {
                                    tracing::warn!("restart requested mid-fight, counting as a loss");
                                    return BattleOutcome::HeroLost;
                                }
                            }
                        }
                        Err(err) => {
                            tracing::debug!(
                                error = %err,
                                severity = err.severity().as_str(),
                                "action rejected"
                            );
                            rejections += 1;
                        }
                    }
                }
            }
        }

        let report = engine.resolve_enemy_turn();
        provider.observe(&report.events);
        if report.outcome == TurnOutcome::HeroDefeated {
            return BattleOutcome::HeroLost;
        }
    }
}
