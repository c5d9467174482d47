use serde::{Deserialize, Serialize};

use super::effective::EffectiveParameters;

/// 배터리 1개의 월간 경제성. 허브 운영비는 이 단계에서 배분하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerBatteryMonthly {
    pub swaps_per_day: f64,
    pub swaps_per_month: f64,
    pub revenue: f64,
    pub commission: f64,
    pub servicing: f64,
    /// 고장/도난 기대 손실의 월 환산액
    pub attrition_cost: f64,
    /// 현금 기준 공헌이익 (운영비, 감가상각 제외)
    pub contribution_margin: f64,
    /// 비현금 마모 지표. 공헌이익/회수 계산에는 쓰지 않는다.
    pub depreciation_economic: f64,
    /// 사이클당 마진 [USD/회]
    pub per_cycle_margin: f64,
    /// capex 회수에 필요한 사이클 수. 사이클 마진이 0 이하이면 `None`.
    pub breakeven_cycles: Option<f64>,
    /// 배터리 회수 기간 [월]. 공헌이익이 0 이하이면 `None`.
    pub payback_months_battery: Option<u32>,
}

/// 스왑 1회당 마진: 가격 - 수수료 - 정비비.
pub fn per_cycle_margin(e: &EffectiveParameters) -> f64 {
    e.price - e.commission_pct / 100.0 * e.price - e.servicing_per_cycle
}

/// 배터리 capex를 회수하는 데 필요한 사이클 수.
pub fn breakeven_cycles(capex: f64, per_cycle_margin: f64) -> Option<f64> {
    (per_cycle_margin > 0.0).then(|| capex / per_cycle_margin)
}

/// 배터리 capex 회수 기간 [월], 올림.
///
/// 공헌이익이 0 이하이거나 결과가 `u32` 범위를 넘으면 `None`.
pub fn battery_payback_months(capex: f64, contribution_margin: f64) -> Option<u32> {
    if contribution_margin <= 0.0 {
        return None;
    }
    let months = (capex / contribution_margin).ceil();
    (months.is_finite() && months <= f64::from(u32::MAX)).then(|| months.max(0.0) as u32)
}

/// 배터리 1개의 월간 수익/비용을 계산한다.
pub fn per_battery(e: &EffectiveParameters, swaps_per_day: f64) -> PerBatteryMonthly {
    let swaps_per_month = swaps_per_day * e.days_per_month;
    let revenue = swaps_per_month * e.price;
    let commission = revenue * (e.commission_pct / 100.0);
    let servicing = swaps_per_month * e.servicing_per_cycle;
    let attrition_cost = (e.replace_pct / 100.0) * e.capex_batt / 12.0;
    let contribution_margin = revenue - commission - servicing - attrition_cost;
    let depreciation_economic = (e.capex_batt / e.life.max(1.0)) * swaps_per_month;
    let margin = per_cycle_margin(e);
    let payback_months_battery = battery_payback_months(e.capex_batt, contribution_margin);

    PerBatteryMonthly {
        swaps_per_day,
        swaps_per_month,
        revenue,
        commission,
        servicing,
        attrition_cost,
        contribution_margin,
        depreciation_economic,
        per_cycle_margin: margin,
        breakeven_cycles: breakeven_cycles(e.capex_batt, margin),
        payback_months_battery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economics::effective::resolve;
    use crate::inputs::Inputs;

    #[test]
    fn breakeven_for_three_dollar_margin() {
        let cycles = breakeven_cycles(800.0, 3.0).unwrap();
        assert!((cycles - 266.666_666).abs() < 1e-3);
    }

    #[test]
    fn reference_battery_month() {
        let e = resolve(&Inputs::default());
        let pb = per_battery(&e, 0.9);
        // 0.9 * 26 = 23.4 회/월
        assert!((pb.swaps_per_month - 23.4).abs() < 1e-9);
        assert!((pb.revenue - 93.6).abs() < 1e-9);
        assert!((pb.commission - 16.848).abs() < 1e-9);
        assert!((pb.servicing - 9.36).abs() < 1e-9);
        assert!((pb.attrition_cost - 800.0 * 0.01 / 12.0).abs() < 1e-9);
        let expected = 93.6 - 16.848 - 9.36 - 800.0 * 0.01 / 12.0;
        assert!((pb.contribution_margin - expected).abs() < 1e-9);
        assert!((pb.depreciation_economic - 800.0 / 1200.0 * 23.4).abs() < 1e-9);
        // 4.0 - 0.72 - 0.4
        assert!((pb.per_cycle_margin - 2.88).abs() < 1e-12);
        assert_eq!(pb.payback_months_battery, Some((800.0 / expected).ceil() as u32));
    }

    #[test]
    fn non_positive_margin_leaves_breakeven_and_payback_undefined() {
        let mut e = resolve(&Inputs::default());
        e.servicing_per_cycle = 10.0;
        let pb = per_battery(&e, 0.9);
        assert!(pb.per_cycle_margin <= 0.0);
        assert_eq!(pb.breakeven_cycles, None);
        assert_eq!(pb.payback_months_battery, None);
    }

    #[test]
    fn tiny_margin_payback_is_out_of_range() {
        assert_eq!(battery_payback_months(800.0, 66.725), Some(12));
        // 800 / 1e-7 = 8e9개월 > u32::MAX
        assert_eq!(battery_payback_months(800.0, 1e-7), None);
        assert_eq!(battery_payback_months(800.0, f64::MIN_POSITIVE), None);
        assert_eq!(battery_payback_months(800.0, 0.0), None);
    }

    #[test]
    fn tiny_contribution_does_not_saturate_battery_payback() {
        let mut e = resolve(&Inputs::default());
        // 사이클당 1e-9 USD 남도록 정비비를 맞추고 교체율은 0으로 둔다.
        e.replace_pct = 0.0;
        e.servicing_per_cycle = per_cycle_margin(&e) + e.servicing_per_cycle - 1e-9;
        let pb = per_battery(&e, 0.9);
        assert!(pb.contribution_margin > 0.0);
        assert_eq!(pb.payback_months_battery, None);
    }

    #[test]
    fn zero_life_is_floored_for_depreciation() {
        let mut e = resolve(&Inputs::default());
        e.life = 0.0;
        let pb = per_battery(&e, 1.0);
        assert!(pb.depreciation_economic.is_finite());
    }
}
