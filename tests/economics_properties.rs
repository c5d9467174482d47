//! 계산 엔진의 성질 기반 회귀 테스트.
use proptest::prelude::*;
use swap_economics_toolbox::economics::{
    cashflow::{irr, npv, payback_months},
    compute_all, resolve, swaps_per_day, StressToggle,
};
use swap_economics_toolbox::inputs::Inputs;

fn arb_inputs() -> impl Strategy<Value = Inputs> {
    (
        (0.5f64..20.0, 0.05f64..5.0, -3.0f64..-0.1, 1.0f64..20.0),
        (0.0f64..100.0, 1.0f64..90.0, 1u32..100, 1u32..20),
        (100.0f64..3_000.0, 0.0f64..40.0, 0.0f64..2.0, 0u32..120),
        (0.7f64..1.3, any::<[bool; 6]>()),
    )
        .prop_map(
            |((price, swaps, elasticity, baseline), (util, swap_min, batteries, hubs), (capex, commission, servicing, horizon), (price_mult, toggles))| {
                let mut inputs = Inputs::default();
                inputs.pricing.price_per_swap = price;
                inputs.pricing.swaps_per_battery_per_day = swaps;
                inputs.pricing.elasticity_coefficient = elasticity;
                inputs.baselines.baseline_price = baseline;
                inputs.scale.utilization_target_pct = util;
                inputs.scale.swap_time_minutes = swap_min;
                inputs.scale.batteries_per_hub = batteries;
                inputs.scale.hubs_in_model = hubs;
                inputs.battery.battery_capex = capex;
                inputs.hub.agent_commission_pct_of_gross = commission;
                inputs.battery.servicing_cost_per_cycle = servicing;
                inputs.finance.analysis_horizon_months = horizon;
                inputs.sensitivity.price_multiplier = price_mult;
                for (toggle, on) in StressToggle::ALL.iter().zip(toggles) {
                    toggle.set(&mut inputs.stress, on);
                }
                inputs
            },
        )
}

proptest! {
    #[test]
    fn compute_all_is_deterministic(inputs in arb_inputs()) {
        let a = compute_all(&inputs);
        let b = compute_all(&inputs.clone());
        prop_assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn realized_swaps_never_exceed_capacity(inputs in arb_inputs()) {
        let d = swaps_per_day(&resolve(&inputs));
        prop_assert!(d.per_day <= d.cap);
        prop_assert!((0.0..=1.0).contains(&d.utilization_ratio));
    }

    #[test]
    fn higher_price_means_fewer_swaps(
        p1 in 1.0f64..10.0,
        bump in 0.01f64..5.0,
        base in 0.1f64..5.0,
        elasticity in -3.0f64..-0.1,
    ) {
        let mut inputs = Inputs::default();
        inputs.pricing.swaps_per_battery_per_day = base;
        inputs.pricing.elasticity_coefficient = elasticity;
        inputs.scale.utilization_target_pct = 100.0;
        inputs.scale.swap_time_minutes = 1.0;
        inputs.pricing.price_per_swap = p1;
        let low = swaps_per_day(&resolve(&inputs)).per_day;
        inputs.pricing.price_per_swap = p1 + bump;
        let high = swaps_per_day(&resolve(&inputs)).per_day;
        prop_assert!(high < low, "p1={} low={} high={}", p1, low, high);
    }

    #[test]
    fn irr_zeroes_npv_for_outflow_then_constant_inflows(
        outflow in 1_000.0f64..100_000.0,
        months in 12usize..120,
        coverage in 0.6f64..3.0,
    ) {
        let inflow = outflow * coverage / months as f64;
        let cash: Vec<f64> = std::iter::once(-outflow)
            .chain(std::iter::repeat(inflow).take(months))
            .collect();
        if let Some(r) = irr(&cash).rate() {
            prop_assert!(npv(&cash, r).abs() < 1e-4, "r={} npv={}", r, npv(&cash, r));
        }
    }

    #[test]
    fn payback_is_smallest_non_negative_prefix(cash in prop::collection::vec(-100.0f64..100.0, 0..48)) {
        let mut running = 0.0;
        let prefix: Vec<f64> = cash.iter().map(|c| { running += c; running }).collect();
        match payback_months(&cash) {
            Some(i) => {
                prop_assert!(prefix[i] >= 0.0);
                prop_assert!(prefix[..i].iter().all(|c| *c < 0.0));
            }
            None => prop_assert!(prefix.iter().all(|c| *c < 0.0)),
        }
    }

    #[test]
    fn toggle_order_and_repetition_do_not_matter(flags in any::<[bool; 6]>()) {
        let mut forward = Inputs::default();
        for (toggle, on) in StressToggle::ALL.iter().zip(flags) {
            toggle.set(&mut forward.stress, on);
        }
        let mut backward = Inputs::default();
        for (toggle, on) in StressToggle::ALL.iter().zip(flags).rev() {
            toggle.set(&mut backward.stress, on);
            toggle.set(&mut backward.stress, on);
        }
        prop_assert_eq!(resolve(&forward), resolve(&backward));
    }
}

#[test]
fn fleet_cumulative_ends_at_total_fleet_cash() {
    let c = compute_all(&Inputs::default());
    let total: f64 = c.fleet.cash_series.iter().sum();
    let last = *c.fleet.cumulative_cash.last().expect("non-empty");
    assert!((last - total).abs() < 1e-6);
    assert_eq!(c.fleet.cash_series.len(), c.hub_cash_series.len());
}
