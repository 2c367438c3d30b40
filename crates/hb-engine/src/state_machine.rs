//! Unit lifecycle transitions.
//!
//! Each function is a pure decision over a snapshot of unit-relevant facts;
//! the scheduler applies the returned state directly. Keeping the
//! transition table as free functions over plain booleans (rather than a
//! method on `Unit` threading borrows through) mirrors the "pure function
//! of accumulated values" style used for the rest of the pipeline.

use hb_types::enums::CastPhase;
use hb_types::unit::{CastState, UnitState};

/// Inputs the AI-decision and execute-actions phases need to decide a
/// unit's next state. Distance/range/mana are pre-computed by the caller
/// since they depend on the live arena and grid.
#[derive(Debug, Clone, Copy)]
pub struct TransitionInputs {
    pub has_target: bool,
    pub in_attack_range: bool,
    pub mana_full: bool,
    pub silenced: bool,
    pub mid_attack_windup: bool,
    pub target_dead: bool,
}

/// Applies a stun, wrapping whatever state the unit was previously in.
/// Re-stunning an already-stunned unit simply refreshes the duration —
/// the prior state underneath is preserved, not re-wrapped.
pub fn enter_stun(current: UnitState, remaining_ticks: u32) -> UnitState {
    match current {
        UnitState::Stunned { prior, .. } => UnitState::Stunned { prior, remaining_ticks },
        other => UnitState::Stunned { prior: Box::new(other), remaining_ticks },
    }
}

/// Ticks down a stun by one; returns the restored prior state once it
/// expires, or `None` if the stun should remain active.
pub fn tick_stun(state: &UnitState) -> Option<UnitState> {
    match state {
        UnitState::Stunned { prior, remaining_ticks } if *remaining_ticks <= 1 => {
            Some((**prior).clone())
        }
        UnitState::Stunned { prior, remaining_ticks } => Some(UnitState::Stunned {
            prior: prior.clone(),
            remaining_ticks: remaining_ticks - 1,
        }),
        _ => None,
    }
}

/// The non-stunned, non-dead transition table over the Idle/Moving/
/// Attacking/Casting graph. Callers handle Dead and Stunned
/// separately since those are orthogonal overlays, not table entries.
pub fn next_combat_state(current: &UnitState, inputs: TransitionInputs) -> UnitState {
    if inputs.mana_full && !inputs.silenced && !current.is_casting() {
        return UnitState::Casting(CastState {
            phase: CastPhase::CastStart,
            ticks_in_phase: 0,
            mana_spent_at_entry: 0.0,
        });
    }

    match current {
        UnitState::Casting(cast) => UnitState::Casting(*cast),
        UnitState::Attacking if inputs.target_dead => UnitState::Idle,
        UnitState::Attacking if !inputs.in_attack_range => UnitState::Moving,
        UnitState::Attacking if inputs.mid_attack_windup => UnitState::Attacking,
        _ if !inputs.has_target => UnitState::Idle,
        _ if inputs.in_attack_range => UnitState::Attacking,
        _ => UnitState::Moving,
    }
}

/// Advances a `Casting` state by one tick through its three phases,
/// returning the new state and whether `effect_point` was just reached
/// (the caller resolves the ability's effects exactly once, on that edge).
pub fn advance_cast(cast: CastState, cast_time_ticks: u32) -> (UnitState, bool) {
    let effect_point_tick = cast_time_ticks / 2;
    let ticks_in_phase = cast.ticks_in_phase + 1;

    let (phase, reached_effect_point) = if ticks_in_phase >= cast_time_ticks {
        (CastPhase::CastEnd, false)
    } else if ticks_in_phase >= effect_point_tick && cast.phase != CastPhase::EffectPoint {
        (CastPhase::EffectPoint, true)
    } else {
        (cast.phase, false)
    };

    (
        UnitState::Casting(CastState { phase, ticks_in_phase, mana_spent_at_entry: cast.mana_spent_at_entry }),
        reached_effect_point,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(has_target: bool, in_range: bool, mana_full: bool) -> TransitionInputs {
        TransitionInputs {
            has_target,
            in_attack_range: in_range,
            mana_full,
            silenced: false,
            mid_attack_windup: false,
            target_dead: false,
        }
    }

    #[test]
    fn idle_with_far_target_moves() {
        let next = next_combat_state(&UnitState::Idle, inputs(true, false, false));
        assert_eq!(next, UnitState::Moving);
    }

    #[test]
    fn idle_with_near_target_attacks() {
        let next = next_combat_state(&UnitState::Idle, inputs(true, true, false));
        assert_eq!(next, UnitState::Attacking);
    }

    #[test]
    fn mana_full_enters_casting_even_mid_attack() {
        let next = next_combat_state(&UnitState::Attacking, inputs(true, true, true));
        assert!(next.is_casting());
    }

    #[test]
    fn silenced_unit_never_casts() {
        let mut i = inputs(true, true, true);
        i.silenced = true;
        let next = next_combat_state(&UnitState::Attacking, i);
        assert_eq!(next, UnitState::Attacking);
    }

    #[test]
    fn stun_wraps_and_restores_prior_state() {
        let stunned = enter_stun(UnitState::Attacking, 10);
        assert!(stunned.is_stunned());

        let mut state = stunned;
        for _ in 0..9 {
            state = tick_stun(&state).unwrap();
            assert!(state.is_stunned());
        }
        let restored = tick_stun(&state).unwrap();
        assert_eq!(restored, UnitState::Attacking);
    }

    #[test]
    fn restunning_refreshes_without_double_wrapping() {
        let stunned = enter_stun(UnitState::Moving, 5);
        let restunned = enter_stun(stunned, 20);
        if let UnitState::Stunned { prior, remaining_ticks } = restunned {
            assert_eq!(*prior, UnitState::Moving);
            assert_eq!(remaining_ticks, 20);
        } else {
            panic!("expected Stunned");
        }
    }

    #[test]
    fn cast_reaches_effect_point_at_midpoint() {
        let mut cast = CastState { phase: CastPhase::CastStart, ticks_in_phase: 0, mana_spent_at_entry: 0.0 };
        let mut hit_effect_point = false;
        for _ in 0..15 {
            let (state, reached) = advance_cast(cast, 15);
            if reached {
                hit_effect_point = true;
            }
            if let UnitState::Casting(c) = state {
                cast = c;
            }
        }
        assert!(hit_effect_point);
        assert_eq!(cast.phase, CastPhase::CastEnd);
    }
}
