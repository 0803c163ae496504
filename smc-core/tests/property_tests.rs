//! Property tests for lifecycle invariants.
//!
//! Uses proptest to verify, over arbitrary setup sequences and price paths:
//! 1. Intents alternate OPEN/CLOSE and a CLOSE always matches the open side
//! 2. An opposite-side setup while a position is open always ends the tick flat
//! 3. The bar budget is absorbing: flat and silent forever once exceeded
//! 4. Trailing stops only tighten

mod common;

use common::hourly;
use proptest::prelude::*;
use smc_core::domain::{Bar, PositionState, Side};
use smc_core::position_management::{
    ExitReason, IntentAction, LifecycleParams, OrderIntent, PositionLifecycleManager,
};
use smc_core::signals::SignalDecision;

// ── Strategies ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Step {
    long_setup: bool,
    short_setup: bool,
    change: f64,
    spread: f64,
}

fn arb_step() -> impl Strategy<Value = Step> {
    (
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.2),
        -3.0..3.0_f64,
        0.1..4.0_f64,
    )
        .prop_map(|(long_setup, short_setup, change, spread)| Step {
            long_setup,
            short_setup,
            change,
            spread,
        })
}

fn arb_params() -> impl Strategy<Value = LifecycleParams> {
    (
        0.5..10.0_f64,
        0.5..5.0_f64,
        any::<bool>(),
        prop::option::of(5usize..80),
    )
        .prop_map(|(tp, sl, trailing, bar_budget)| LifecycleParams {
            take_profit_pct: tp,
            stop_loss_pct: sl,
            trailing,
            bar_budget,
        })
}

struct Tick {
    before: PositionState,
    after: PositionState,
    decision: SignalDecision,
    intent: Option<OrderIntent>,
    trailing_stop: Option<f64>,
}

fn drive(params: LifecycleParams, steps: &[Step]) -> Vec<Tick> {
    let mut pm = PositionLifecycleManager::new(params);
    let mut price = 100.0;
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let open = price;
            price = (price + step.change).max(1.0);
            let bar: Bar = hourly(
                i,
                (
                    open,
                    open.max(price) + step.spread,
                    (open.min(price) - step.spread).max(0.5),
                    price,
                ),
                1000.0,
            );
            let gate = pm.gate(i);
            let decision = SignalDecision {
                long_setup: step.long_setup,
                short_setup: step.short_setup,
                long_entry: step.long_setup && gate.long,
                short_entry: step.short_setup && gate.short,
            };
            let before = pm.state();
            let intent = pm.on_bar(&bar, i, &decision);
            Tick {
                before,
                after: pm.state(),
                decision,
                intent,
                trailing_stop: pm.bracket().and_then(|b| b.trailing_stop()),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn intents_alternate_and_match_sides(
        params in arb_params(),
        steps in prop::collection::vec(arb_step(), 1..200),
    ) {
        let ticks = drive(params, &steps);
        let mut open_side: Option<Side> = None;
        for tick in &ticks {
            match &tick.intent {
                Some(intent) if intent.action == IntentAction::Open => {
                    prop_assert!(open_side.is_none());
                    prop_assert_eq!(tick.after, PositionState::from(intent.side));
                    open_side = Some(intent.side);
                }
                Some(intent) => {
                    prop_assert_eq!(Some(intent.side), open_side);
                    prop_assert!(tick.after.is_flat());
                    open_side = None;
                }
                None => prop_assert_eq!(tick.before, tick.after),
            }
            prop_assert_eq!(tick.after.side(), open_side);
        }
    }

    #[test]
    fn opposite_setup_always_flattens(
        params in arb_params(),
        steps in prop::collection::vec(arb_step(), 1..200),
    ) {
        for tick in drive(params, &steps) {
            let opposite = match tick.before {
                PositionState::LongOpen => tick.decision.short_setup,
                PositionState::ShortOpen => tick.decision.long_setup,
                PositionState::Flat => false,
            };
            if opposite {
                prop_assert!(tick.after.is_flat());
            }
        }
    }

    #[test]
    fn budget_is_absorbing(
        budget in 5usize..60,
        steps in prop::collection::vec(arb_step(), 70..150),
    ) {
        let params = LifecycleParams {
            bar_budget: Some(budget),
            ..Default::default()
        };
        let ticks = drive(params, &steps);
        let budget_closes = ticks
            .iter()
            .filter(|t| {
                t.intent.as_ref().and_then(|i| i.reason) == Some(ExitReason::BudgetExhausted)
            })
            .count();
        prop_assert!(budget_closes <= 1);

        for tick in &ticks[budget + 1..] {
            prop_assert!(tick.after.is_flat());
            prop_assert!(tick.intent.as_ref().map_or(true, |i| i.action == IntentAction::Close));
        }
        for tick in &ticks[budget + 2..] {
            prop_assert!(tick.intent.is_none());
        }
    }

    #[test]
    fn trailing_stop_only_tightens(
        steps in prop::collection::vec(arb_step(), 1..200),
    ) {
        let params = LifecycleParams {
            trailing: true,
            bar_budget: None,
            ..Default::default()
        };
        let ticks = drive(params, &steps);
        for pair in ticks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            // Same position on both ticks
            if next.intent.is_some() || prev.after.is_flat() {
                continue;
            }
            if let (Some(a), Some(b)) = (prev.trailing_stop, next.trailing_stop) {
                match prev.after {
                    PositionState::LongOpen => prop_assert!(b >= a),
                    PositionState::ShortOpen => prop_assert!(b <= a),
                    PositionState::Flat => {}
                }
            }
            if prev.trailing_stop.is_some() {
                prop_assert!(next.trailing_stop.is_some());
            }
        }
    }
}
