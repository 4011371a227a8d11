//! The hero: combatant body plus progression, skills, statuses, and items.

use crate::bonus::{self, BonusBreakdown, BonusContext, BonusInputs};
use crate::combatant::{Combatant, DefenceOptions, DefenceReport};
use crate::config::BalanceConfig;
use crate::event::CombatEvent;
use crate::skills::{self, InvestOutcome, SkillId, SkillSheet};
use crate::status::StatusRegisters;

/// Consumable kinds the hero can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PotionKind {
    #[strum(serialize = "healing")]
    Heal,
    #[strum(serialize = "super healing")]
    SuperHeal,
    #[strum(serialize = "action")]
    Ap,
    #[strum(serialize = "antidote")]
    Antidote,
    #[strum(serialize = "burn cream")]
    BurnCream,
}

impl PotionKind {
    const fn index(self) -> usize {
        match self {
            Self::Heal => 0,
            Self::SuperHeal => 1,
            Self::Ap => 2,
            Self::Antidote => 3,
            Self::BurnCream => 4,
        }
    }
}

/// Counted potion inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotionBag {
    counts: [u32; 5],
}

impl PotionBag {
    pub fn count(&self, kind: PotionKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn add(&mut self, kind: PotionKind, amount: u32) {
        self.counts[kind.index()] += amount;
    }

    /// Remove one potion of the kind. Returns false when none are left.
    pub fn try_take(&mut self, kind: PotionKind) -> bool {
        let slot = &mut self.counts[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Player character state: the combatant body plus everything that makes
/// the hero more than a stat block.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hero {
    pub base: Combatant,
    pub level: u32,
    pub xp: i32,
    /// XP needed to reach the next level; grows by the integer 1.75x curve.
    pub xp_to_level: i32,
    pub stat_points: u32,
    pub skill_points: u32,
    pub gold: i32,
    /// Permanent flat damage bonus, grown by kills and events.
    pub rage: i32,
    /// Flat damage from worn equipment.
    pub equipment_bonus: i32,
    pub skills: SkillSheet,
    pub status: StatusRegisters,
    pub potions: PotionBag,
    pub essences: Vec<String>,
    /// Last adrenaline tier reported, so shifts emit exactly one event.
    adrenaline_tier: i32,
}

impl Hero {
    /// Standard warrior start: 30 HP, 1-5 attack, 3 AP, one healing potion.
    pub fn warrior(name: impl Into<String>) -> Self {
        let mut base = Combatant::new(name, 30, 1, 5, 0, 3);
        base.set_overheal_cap(30 + 30 * BalanceConfig::OVERHEAL_PERCENT / 100);
        let mut potions = PotionBag::default();
        potions.add(PotionKind::Heal, 1);
        Self {
            base,
            level: 1,
            xp: 0,
            xp_to_level: 10,
            stat_points: 0,
            skill_points: 0,
            gold: 0,
            rage: 0,
            equipment_bonus: 0,
            skills: SkillSheet::new(),
            status: StatusRegisters::default(),
            potions,
            essences: Vec::new(),
            adrenaline_tier: 0,
        }
    }

    // ===== adrenaline and berserk =====

    pub fn adrenaline_tier(&self) -> i32 {
        self.adrenaline_tier
    }

    /// Recompute the adrenaline tier from current HP. Emits a shift event
    /// unless berserk currently owns the hero's damage narrative.
    pub fn update_adrenaline(&mut self) -> Option<CombatEvent> {
        let tier = bonus::adrenaline_tier(self.base.hp(), self.base.max_hp());
        let changed = tier != self.adrenaline_tier;
        self.adrenaline_tier = tier;

        // Climbing back above the reset line re-arms the berserk lockout.
        if !self.status.berserk.active
            && self.base.hp() * 100 > self.base.max_hp() * BalanceConfig::BERSERK_RESET_PERCENT
        {
            self.status.berserk.used = false;
        }

        if changed && !self.status.berserk.active && !self.status.berserk.pending {
            Some(CombatEvent::AdrenalineShift { tier })
        } else {
            None
        }
    }

    /// Trigger berserk if HP has fallen to the critical line and the
    /// per-excursion lockout allows it.
    pub fn check_berserk_trigger(&mut self, cfg: &BalanceConfig) -> Option<CombatEvent> {
        if !self.base.is_alive()
            || self.status.berserk.active
            || self.status.berserk.used
            || self.base.hp() * 100 > self.base.max_hp() * BalanceConfig::BERSERK_TRIGGER_PERCENT
        {
            return None;
        }
        let bonus = cfg.berserk_base_bonus + self.rage;
        self.status.berserk.active = true;
        self.status.berserk.bonus = bonus;
        self.status.berserk.turns_left = cfg.berserk_duration;
        self.status.berserk.used = true;
        self.status.berserk.pending = false;
        Some(CombatEvent::BerserkTriggered { bonus })
    }

    /// Flag a berserk trigger that will fire at the next upkeep, so the
    /// intervening adrenaline shift stays quiet.
    pub fn note_berserk_pending(&mut self) {
        let berserk = &mut self.status.berserk;
        if !berserk.active
            && !berserk.used
            && self.base.is_alive()
            && self.base.hp() * 100 <= self.base.max_hp() * BalanceConfig::BERSERK_TRIGGER_PERCENT
        {
            berserk.pending = true;
        }
    }

    // ===== damage in and out =====

    /// Snapshot the inputs to the flat-bonus computation.
    fn bonus_inputs(&self) -> BonusInputs {
        BonusInputs {
            adrenaline_tier: self.adrenaline_tier,
            rage: self.rage,
            berserk_active: self.status.berserk.active,
            berserk_bonus: self.status.berserk.bonus,
            war_cry_bonus: self.status.war_cry.bonus,
            equipment_bonus: self.equipment_bonus,
        }
    }

    /// Flat damage bonuses for one hit in the given context.
    pub fn damage_bonuses(&self, context: BonusContext, cfg: &BalanceConfig) -> BonusBreakdown {
        bonus::compute(self.bonus_inputs(), context, cfg)
    }

    /// Mitigate an incoming hit, folding in the berserk guard automatically.
    pub fn mitigate(&self, damage: i32, mut opts: DefenceOptions) -> DefenceReport {
        opts.berserk_guard = self.status.berserk.active;
        self.base.apply_defence(damage, opts)
    }

    /// Spend the primed Death Defier if HP just hit zero. Returns true when
    /// the hero is saved at 1 HP.
    pub fn try_death_defier(&mut self) -> bool {
        if self.base.is_alive() {
            return false;
        }
        if self.status.death_defier.try_consume() {
            self.base.set_hp(1);
            true
        } else {
            false
        }
    }

    // ===== progression =====

    /// Award XP and resolve any level-ups. Each level fully heals, raises
    /// the threshold by the 1.75x curve, and grants stat and skill points.
    pub fn gain_xp(&mut self, amount: i32, events: &mut Vec<CombatEvent>) {
        if amount <= 0 {
            return;
        }
        self.xp += amount;
        events.push(CombatEvent::XpGained { amount });
        while self.xp >= self.xp_to_level {
            self.xp -= self.xp_to_level;
            self.xp_to_level =
                self.xp_to_level * BalanceConfig::XP_CURVE_NUM / BalanceConfig::XP_CURVE_DEN;
            self.level += 1;
            self.stat_points += BalanceConfig::STAT_POINTS_PER_LEVEL;
            self.skill_points += BalanceConfig::SKILL_POINTS_PER_LEVEL;
            // Full heal; existing overheal is never clawed back.
            if self.base.hp() < self.base.max_hp() {
                self.base.set_hp(self.base.max_hp());
            }
            events.push(CombatEvent::LevelUp { level: self.level });
        }
    }

    pub fn gain_gold(&mut self, amount: i32) {
        self.gold += amount.max(0);
    }

    /// Put earned skill points into a ranked skill. Returns None when the
    /// skill cannot take points or none are available; otherwise the points
    /// are spent (banked progress included).
    pub fn invest_skill_points(&mut self, id: SkillId, points: u32) -> Option<InvestOutcome> {
        if !id.is_ranked() || self.skills.rank(id) >= skills::MAX_RANK {
            return None;
        }
        let points = points.min(self.skill_points);
        if points == 0 {
            return None;
        }
        self.skill_points -= points;
        Some(self.skills.invest(id, points))
    }

    /// Unlock the Death Defier passive.
    pub fn learn_death_defier(&mut self, free_activation: bool) {
        self.status.death_defier.owned = true;
        self.status.death_defier.free_activation = free_activation;
    }

    /// Clear combat-scoped state after a fight: statuses, AP, adrenaline.
    pub fn reset_between_fights(&mut self) {
        if let Some(defence) = self.status.reset_between_fights() {
            self.base.set_defence(defence);
        }
        self.base.refill_ap();
        self.adrenaline_tier = bonus::adrenaline_tier(self.base.hp(), self.base.max_hp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warrior_starts_with_the_standard_kit() {
        let hero = Hero::warrior("Galvin");
        assert_eq!(hero.base.hp(), 30);
        assert_eq!(hero.base.overheal_cap(), 33);
        assert_eq!(hero.base.max_ap(), 3);
        assert_eq!(hero.potions.count(PotionKind::Heal), 1);
        assert_eq!(hero.xp_to_level, 10);
    }

    #[test]
    fn berserk_triggers_at_the_critical_line_with_rage() {
        let cfg = BalanceConfig::default();
        let mut hero = Hero::warrior("Galvin");
        hero.rage = 2;
        hero.base.take_damage(27); // 3 of 30 HP
        let event = hero.check_berserk_trigger(&cfg);
        assert_eq!(event, Some(CombatEvent::BerserkTriggered { bonus: 8 }));
        assert!(hero.status.berserk.active);
        assert_eq!(hero.status.berserk.turns_left, cfg.berserk_duration);

        // Active or locked-out berserk does not re-trigger.
        assert_eq!(hero.check_berserk_trigger(&cfg), None);
        hero.status.berserk.deactivate();
        assert_eq!(hero.check_berserk_trigger(&cfg), None);
    }

    #[test]
    fn berserk_lockout_resets_only_above_twenty_percent() {
        let cfg = BalanceConfig::default();
        let mut hero = Hero::warrior("Galvin");
        hero.base.take_damage(27);
        hero.check_berserk_trigger(&cfg);
        hero.status.berserk.deactivate();

        // Healing to 18% is not enough to re-arm.
        hero.base.heal(2); // 5 of 30
        hero.update_adrenaline();
        assert!(hero.status.berserk.used);

        hero.base.heal(2); // 7 of 30, above 20%
        hero.update_adrenaline();
        assert!(!hero.status.berserk.used);
    }

    #[test]
    fn adrenaline_shift_is_suppressed_while_berserk() {
        let mut hero = Hero::warrior("Galvin");
        hero.base.take_damage(20);
        hero.status.berserk.active = true;
        assert_eq!(hero.update_adrenaline(), None);
        assert_eq!(hero.adrenaline_tier(), 2); // 10 of 30 HP

        hero.status.berserk.active = false;
        hero.base.take_damage(5);
        assert!(matches!(
            hero.update_adrenaline(),
            Some(CombatEvent::AdrenalineShift { tier: 3 })
        ));
    }

    #[test]
    fn death_defier_saves_at_one_hp_once() {
        let mut hero = Hero::warrior("Galvin");
        hero.status.death_defier.owned = true;
        hero.status.death_defier.primed = true;

        hero.base.take_damage(40);
        assert!(hero.try_death_defier());
        assert_eq!(hero.base.hp(), 1);

        hero.base.take_damage(5);
        assert!(!hero.try_death_defier());
        assert_eq!(hero.base.hp(), 0);
    }

    #[test]
    fn xp_levels_heal_and_grow_the_threshold() {
        let mut hero = Hero::warrior("Galvin");
        hero.base.take_damage(12);
        let mut events = Vec::new();
        hero.gain_xp(12, &mut events);

        assert_eq!(hero.level, 2);
        assert_eq!(hero.xp, 2);
        assert_eq!(hero.xp_to_level, 17); // 10 * 7 / 4
        assert_eq!(hero.base.hp(), 30);
        assert_eq!(hero.stat_points, 2);
        assert_eq!(hero.skill_points, 2);
        assert!(events.contains(&CombatEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn skill_point_investment_spends_only_what_is_available() {
        let mut hero = Hero::warrior("Galvin");
        hero.skill_points = 2;
        let out = hero.invest_skill_points(SkillId::Heal, 5).unwrap();
        assert_eq!(out.ranks_gained, 2); // costs 1 + 1
        assert_eq!(hero.skill_points, 0);
        assert!(hero.invest_skill_points(SkillId::Heal, 1).is_none());
        assert!(hero.invest_skill_points(SkillId::DeathDefier, 1).is_none());
    }

    #[test]
    fn between_fight_reset_refills_ap_and_restores_warped_defence() {
        let mut hero = Hero::warrior("Galvin");
        hero.base.set_defence(4);
        hero.status.defence_warp.trigger(4);
        hero.status.defence_warp.advance();
        hero.base.set_defence(0);
        hero.base.try_spend_ap(3);

        hero.reset_between_fights();
        assert_eq!(hero.base.defence(), 4);
        assert_eq!(hero.base.ap(), 3);
    }
}
