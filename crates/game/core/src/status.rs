//! Per-hero status-effect ledger.
//!
//! Every register is fully initialized on every hero; "inactive" is always a
//! zero/default value, never an absent field. Each status ticks at most once
//! per qualifying turn — the turn sequencer owns the tick order, the
//! registers own their own bookkeeping.

use arrayvec::ArrayVec;

use crate::config::BalanceConfig;
use crate::dice::Dice;

/// Why the hero's action was stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    Stunned,
    Paralyzed,
    Blinded,
}

/// Poison: flat per-tick damage that ignores defence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoisonStatus {
    pub active: bool,
    pub amount: i32,
    pub turns_left: u32,
    /// The application turn deals no damage.
    pub skip_first_tick: bool,
}

/// Outcome of one poison tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoisonTick {
    Inactive,
    /// Application-turn tick absorbed by the skip flag.
    Absorbed,
    Damage { amount: i32, expired: bool },
}

impl PoisonStatus {
    pub fn apply(&mut self, amount: i32, turns: u32) {
        self.active = true;
        self.amount = amount;
        self.turns_left = turns;
        self.skip_first_tick = true;
    }

    pub fn cure(&mut self) -> bool {
        let was_active = self.active;
        *self = Self::default();
        was_active
    }

    pub fn tick(&mut self) -> PoisonTick {
        if !self.active {
            return PoisonTick::Inactive;
        }
        if self.skip_first_tick {
            self.skip_first_tick = false;
            return PoisonTick::Absorbed;
        }
        let amount = self.amount;
        self.turns_left = self.turns_left.saturating_sub(1);
        let expired = self.turns_left == 0;
        if expired {
            self.active = false;
            self.amount = 0;
        }
        PoisonTick::Damage { amount, expired }
    }
}

/// One burn stack with its own timer and skip flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BurnStack {
    pub turns_left: u32,
    pub skip_first_tick: bool,
}

/// Ordered ledger of at most [`BalanceConfig::MAX_BURN_STACKS`] burn stacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BurnLedger {
    stacks: ArrayVec<BurnStack, { BalanceConfig::MAX_BURN_STACKS }>,
}

/// Outcome of one burn tick over all stacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BurnTick {
    /// Sum of all per-stack rolls, applied once.
    pub total: i32,
    /// Individual rolls, one per stack that ticked.
    pub rolls: ArrayVec<i32, { BalanceConfig::MAX_BURN_STACKS }>,
    /// Stacks that expired this tick.
    pub expired: usize,
    /// True when the last remaining stacks faded this tick.
    pub all_faded: bool,
}

impl BurnLedger {
    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Add a fresh stack; when full, the weakest stack is replaced.
    pub fn apply(&mut self) {
        let fresh = BurnStack {
            turns_left: BalanceConfig::BURN_DURATION,
            skip_first_tick: true,
        };
        if self.stacks.is_full() {
            if let Some(weakest) = self
                .stacks
                .iter_mut()
                .min_by_key(|stack| stack.turns_left)
            {
                *weakest = fresh;
            }
        } else {
            self.stacks.push(fresh);
        }
    }

    pub fn clear(&mut self) -> usize {
        let count = self.stacks.len();
        self.stacks.clear();
        count
    }

    /// Tick every stack independently: skip flags absorb the application
    /// turn, active stacks each roll their damage, expired stacks drop.
    pub fn tick(&mut self, dice: &mut impl Dice) -> BurnTick {
        if self.stacks.is_empty() {
            return BurnTick::default();
        }

        let before = self.stacks.len();
        let mut result = BurnTick::default();
        let mut survivors: ArrayVec<BurnStack, { BalanceConfig::MAX_BURN_STACKS }> =
            ArrayVec::new();

        for mut stack in self.stacks.drain(..) {
            if stack.skip_first_tick {
                stack.skip_first_tick = false;
                survivors.push(stack);
                continue;
            }
            let roll = dice.roll(BalanceConfig::BURN_TICK_MIN, BalanceConfig::BURN_TICK_MAX);
            result.total += roll;
            result.rolls.push(roll);
            stack.turns_left = stack.turns_left.saturating_sub(1);
            if stack.turns_left > 0 {
                survivors.push(stack);
            } else {
                result.expired += 1;
            }
        }

        self.stacks = survivors;
        result.all_faded = before > 0 && self.stacks.is_empty() && result.expired > 0;
        result
    }
}

/// Blindness: degrades outgoing damage, ticks only on acted turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlindStatus {
    pub turns_left: u32,
    /// Set by long blinds; earns a distinct full-clear message at 0.
    pub long: bool,
}

impl BlindStatus {
    pub fn apply(&mut self, turns: u32, long: bool) {
        self.turns_left = turns;
        self.long = long;
    }

    pub fn is_active(&self) -> bool {
        self.turns_left > 0
    }

    /// Outgoing damage multiplier as (numerator, denominator).
    ///
    /// None means the attack misses entirely (3+ turns remaining).
    pub fn outgoing_multiplier(&self) -> Option<(i32, i32)> {
        match self.turns_left {
            0 => Some((1, 1)),
            1 => Some((3, 4)),
            2 => Some((1, 2)),
            _ => None,
        }
    }

    /// Decrement after a completed player action. Returns Some(full_clear)
    /// when the blindness ends this tick.
    pub fn tick_after_action(&mut self) -> Option<bool> {
        if self.turns_left == 0 {
            return None;
        }
        self.turns_left -= 1;
        if self.turns_left == 0 {
            let full = self.long;
            self.long = false;
            Some(full)
        } else {
            None
        }
    }
}

/// Turn-stop with the anti-chain guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnStopStatus {
    pub remaining: u32,
    pub reason: Option<StopReason>,
    /// Set when the previous eligible turn was lost; forces the next one
    /// through so the hero never loses two actions in a row.
    pub chain_guard: bool,
}

impl TurnStopStatus {
    /// Stack a stop; durations do not add, the longer one wins.
    pub fn apply(&mut self, turns: u32, reason: StopReason) {
        self.remaining = self.remaining.max(turns);
        self.reason = Some(reason);
    }

    pub fn is_pending(&self) -> bool {
        self.remaining > 0
    }

    /// Resolve at the top of a hero turn. Returns the stop reason when the
    /// action is lost this turn.
    pub fn resolve(&mut self) -> Option<StopReason> {
        if self.remaining == 0 {
            self.chain_guard = false;
            return None;
        }
        if self.chain_guard {
            // Lost last turn already: force-clear and act.
            self.remaining = 0;
            self.reason = None;
            self.chain_guard = false;
            return None;
        }
        self.remaining -= 1;
        self.chain_guard = true;
        self.reason
    }
}

/// Berserk: critical-HP frenzy with a per-excursion lockout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BerserkStatus {
    pub active: bool,
    pub bonus: i32,
    pub turns_left: u32,
    /// Already fired during this low-HP excursion; resets only once HP
    /// climbs back above the reset threshold.
    pub used: bool,
    pub pending: bool,
}

impl BerserkStatus {
    pub fn deactivate(&mut self) {
        self.active = false;
        self.bonus = 0;
        self.turns_left = 0;
        self.pending = false;
    }

    /// One turn-tick. Returns true when the frenzy fades.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.turns_left = self.turns_left.saturating_sub(1);
        if self.turns_left == 0 {
            self.deactivate();
            true
        } else {
            false
        }
    }
}

/// Phases of the defence-warp debuff, advanced once per completed enemy turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarpPhase {
    /// Defence forced to zero.
    Collapsed,
    /// Defence at half the stored original.
    Stabilising,
    /// Original defence restored; the debuff clears.
    Restored,
}

/// Three-phase armour destabilisation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenceWarpStatus {
    phase: Option<u8>,
    original_defence: i32,
}

impl DefenceWarpStatus {
    pub fn is_active(&self) -> bool {
        self.phase.is_some()
    }

    pub fn phase(&self) -> Option<u8> {
        self.phase
    }

    /// Start the warp, or reset an active one back to phase 0 without
    /// overwriting the stored original defence.
    pub fn trigger(&mut self, current_defence: i32) -> bool {
        let restarted = self.phase.is_some();
        if !restarted {
            self.original_defence = current_defence;
        }
        self.phase = Some(0);
        restarted
    }

    /// Advance one phase. Returns the phase entered and the defence value
    /// the hero should now have, or None when no warp is active.
    pub fn advance(&mut self) -> Option<(WarpPhase, i32)> {
        let phase = self.phase?;
        match phase {
            0 => {
                self.phase = Some(1);
                Some((WarpPhase::Collapsed, 0))
            }
            1 => {
                self.phase = Some(2);
                let half = if self.original_defence > 0 {
                    (self.original_defence / 2).max(1)
                } else {
                    0
                };
                Some((WarpPhase::Stabilising, half))
            }
            _ => {
                let original = self.original_defence;
                *self = Self::default();
                Some((WarpPhase::Restored, original))
            }
        }
    }

    /// Drop the warp and return the defence to restore, if any was stored.
    pub fn clear(&mut self) -> Option<i32> {
        let restore = self.phase.map(|_| self.original_defence);
        *self = Self::default();
        restore
    }
}

/// War Cry: flat attack bonus for a fixed duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarCryStatus {
    pub bonus: i32,
    pub turns_left: u32,
    /// The cast turn does not count against the duration.
    pub skip_first_tick: bool,
}

impl WarCryStatus {
    pub fn is_active(&self) -> bool {
        self.turns_left > 0
    }

    /// Recast-friendly: overwrites the bonus and resets the duration.
    pub fn apply(&mut self, bonus: i32, turns: u32) {
        self.bonus = bonus;
        self.turns_left = turns;
        self.skip_first_tick = true;
    }

    /// Tick after a completed player action. Returns true when it fades.
    pub fn tick(&mut self) -> bool {
        if self.turns_left == 0 {
            return false;
        }
        if self.skip_first_tick {
            self.skip_first_tick = false;
            return false;
        }
        self.turns_left -= 1;
        if self.turns_left == 0 {
            self.bonus = 0;
            true
        } else {
            false
        }
    }
}

/// Death Defier: one save-from-death per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathDefierStatus {
    /// The hero owns the passive at all.
    pub owned: bool,
    /// Unlocked in a way that makes priming free.
    pub free_activation: bool,
    /// Primed right now.
    pub primed: bool,
    /// Already consumed this run.
    pub used: bool,
}

impl DeathDefierStatus {
    /// Consume the save if it applies. HP adjustment is the caller's job.
    pub fn try_consume(&mut self) -> bool {
        if self.owned && self.primed && !self.used {
            self.used = true;
            self.primed = false;
            true
        } else {
            false
        }
    }
}

/// The complete status register set carried by every hero.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusRegisters {
    pub poison: PoisonStatus,
    pub burns: BurnLedger,
    pub blind: BlindStatus,
    pub turn_stop: TurnStopStatus,
    pub berserk: BerserkStatus,
    pub defence_warp: DefenceWarpStatus,
    pub war_cry: WarCryStatus,
    pub death_defier: DeathDefierStatus,
    /// Set by paralysing attacks: the next plain enemy hit rolls maximum.
    pub paralyze_vulnerable: bool,
}

impl StatusRegisters {
    /// Clear everything that is combat-scoped. Berserk lockout and the
    /// Death Defier run-state persist across fights.
    pub fn reset_between_fights(&mut self) -> Option<i32> {
        self.poison = PoisonStatus::default();
        self.burns.clear();
        self.blind = BlindStatus::default();
        self.turn_stop = TurnStopStatus::default();
        self.war_cry = WarCryStatus::default();
        self.paralyze_vulnerable = false;
        self.berserk.deactivate();
        self.defence_warp.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SequenceDice;

    #[test]
    fn poison_skips_the_application_turn_then_expires() {
        let mut poison = PoisonStatus::default();
        poison.apply(2, 2);
        assert_eq!(poison.tick(), PoisonTick::Absorbed);
        assert_eq!(
            poison.tick(),
            PoisonTick::Damage {
                amount: 2,
                expired: false
            }
        );
        assert_eq!(
            poison.tick(),
            PoisonTick::Damage {
                amount: 2,
                expired: true
            }
        );
        assert!(!poison.active);
        assert_eq!(poison.tick(), PoisonTick::Inactive);
    }

    #[test]
    fn burn_stacks_tick_independently_and_replace_the_weakest() {
        let mut dice = SequenceDice::with_rolls([3, 2, 1]);
        let mut burns = BurnLedger::default();
        burns.apply();
        // Application turn: the skip flag absorbs the tick.
        let tick = burns.tick(&mut dice);
        assert_eq!(tick.total, 0);
        assert_eq!(burns.stack_count(), 1);

        // Second stack applied; first one is now live.
        burns.apply();
        let tick = burns.tick(&mut dice);
        assert_eq!(tick.total, 3);
        assert_eq!(tick.rolls.len(), 1);

        // Ledger is full: a third application replaces the weakest stack.
        burns.apply();
        assert_eq!(burns.stack_count(), 2);
        let tick = burns.tick(&mut dice);
        // Only the older live stack ticks; the fresh one is skipping.
        assert_eq!(tick.rolls.len(), 1);
    }

    #[test]
    fn burn_expiry_reports_all_faded() {
        let mut dice = SequenceDice::with_rolls([1, 1]);
        let mut burns = BurnLedger::default();
        burns.apply();
        burns.tick(&mut dice); // skip
        burns.tick(&mut dice); // turns 2 -> 1
        let tick = burns.tick(&mut dice); // turns 1 -> 0
        assert_eq!(tick.expired, 1);
        assert!(tick.all_faded);
        assert!(burns.is_empty());
    }

    #[test]
    fn chain_guard_never_allows_two_consecutive_lost_turns() {
        let mut stop = TurnStopStatus::default();
        stop.apply(3, StopReason::Paralyzed);
        assert_eq!(stop.resolve(), Some(StopReason::Paralyzed));
        // Guard set: the very next turn must go through, clearing the stop.
        assert_eq!(stop.resolve(), None);
        assert!(!stop.is_pending());
        assert_eq!(stop.resolve(), None);
    }

    #[test]
    fn turn_stop_durations_do_not_stack() {
        let mut stop = TurnStopStatus::default();
        stop.apply(2, StopReason::Stunned);
        stop.apply(1, StopReason::Paralyzed);
        assert_eq!(stop.remaining, 2);
        assert_eq!(stop.reason, Some(StopReason::Paralyzed));
    }

    #[test]
    fn blind_multiplier_follows_remaining_turns() {
        let mut blind = BlindStatus::default();
        blind.apply(3, true);
        assert_eq!(blind.outgoing_multiplier(), None);
        assert_eq!(blind.tick_after_action(), None);
        assert_eq!(blind.outgoing_multiplier(), Some((1, 2)));
        assert_eq!(blind.tick_after_action(), None);
        assert_eq!(blind.outgoing_multiplier(), Some((3, 4)));
        assert_eq!(blind.tick_after_action(), Some(true));
        assert_eq!(blind.outgoing_multiplier(), Some((1, 1)));
    }

    #[test]
    fn defence_warp_walks_its_three_phases() {
        let mut warp = DefenceWarpStatus::default();
        assert!(!warp.trigger(4));
        assert_eq!(warp.advance(), Some((WarpPhase::Collapsed, 0)));
        assert_eq!(warp.advance(), Some((WarpPhase::Stabilising, 2)));
        assert_eq!(warp.advance(), Some((WarpPhase::Restored, 4)));
        assert!(!warp.is_active());
        assert_eq!(warp.advance(), None);
    }

    #[test]
    fn retriggering_a_warp_resets_to_phase_zero() {
        let mut warp = DefenceWarpStatus::default();
        warp.trigger(4);
        warp.advance(); // phase 0 consumed, defence zeroed
        assert!(warp.trigger(0)); // re-trigger while collapsed
        assert_eq!(warp.advance(), Some((WarpPhase::Collapsed, 0)));
        // Original defence survives the reset.
        warp.advance();
        assert_eq!(warp.advance(), Some((WarpPhase::Restored, 4)));
    }

    #[test]
    fn war_cry_skip_flag_absorbs_the_cast_turn() {
        let mut cry = WarCryStatus::default();
        cry.apply(2, 3);
        assert!(!cry.tick()); // cast turn
        assert_eq!(cry.turns_left, 3);
        assert!(!cry.tick());
        assert!(!cry.tick());
        assert!(cry.tick()); // fades
        assert_eq!(cry.bonus, 0);
    }

    #[test]
    fn recasting_war_cry_overwrites_rather_than_stacks() {
        let mut cry = WarCryStatus::default();
        cry.apply(2, 3);
        cry.tick();
        cry.tick();
        cry.apply(5, 3);
        assert_eq!(cry.bonus, 5);
        assert_eq!(cry.turns_left, 3);
        assert!(cry.skip_first_tick);
    }

    #[test]
    fn death_defier_fires_once() {
        let mut dd = DeathDefierStatus {
            owned: true,
            primed: true,
            ..Default::default()
        };
        assert!(dd.try_consume());
        assert!(dd.used);
        assert!(!dd.primed);
        dd.primed = true; // even re-primed, a used defier stays spent
        assert!(!dd.try_consume());
    }

    #[test]
    fn between_fight_reset_preserves_run_state() {
        let mut status = StatusRegisters::default();
        status.poison.apply(2, 3);
        status.burns.apply();
        status.blind.apply(3, true);
        status.death_defier.owned = true;
        status.death_defier.used = true;
        status.berserk.used = true;

        status.reset_between_fights();

        assert!(!status.poison.active);
        assert!(status.burns.is_empty());
        assert!(!status.blind.is_active());
        assert!(status.death_defier.used);
        assert!(status.berserk.used);
    }
}
