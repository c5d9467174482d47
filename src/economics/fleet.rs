use serde::{Deserialize, Serialize};

use super::cashflow;
use super::effective::EffectiveParameters;
use super::hub::PerHubMonthly;

/// 함대(전체 허브) KPI. 모든 허브는 동일하고 0개월에 동시에 개설된다고 가정한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetKpis {
    pub hubs: u32,
    pub ebitda_monthly: f64,
    /// 허브 현금흐름 × 허브 수 (0개월 투자 포함)
    pub cash_series: Vec<f64>,
    pub npv_horizon: f64,
    /// 차트용 누적 현금
    pub cumulative_cash: Vec<f64>,
}

/// 허브 1곳의 결과를 허브 수만큼 확장한다.
pub fn fleet(e: &EffectiveParameters, per_hub: &PerHubMonthly, cash_series: &[f64]) -> FleetKpis {
    let hubs = e.hubs_in_model;
    let scale = f64::from(hubs);
    let fleet_cash: Vec<f64> = cash_series.iter().map(|v| v * scale).collect();
    let npv_horizon = cashflow::npv(&fleet_cash, e.monthly_discount_rate());
    let cumulative_cash = cashflow::cumulative(&fleet_cash);
    FleetKpis {
        hubs,
        ebitda_monthly: per_hub.ebitda * scale,
        cash_series: fleet_cash,
        npv_horizon,
        cumulative_cash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economics::effective::resolve;
    use crate::economics::hub::per_hub;
    use crate::inputs::Inputs;

    #[test]
    fn fleet_scales_every_month_including_capex() {
        let e = resolve(&Inputs::default());
        let hp = per_hub(&e, 0.9, 0.0);
        let f = fleet(&e, &hp.per_hub, &hp.cash_series);
        assert_eq!(f.hubs, 5);
        assert_eq!(f.cash_series[0], hp.cash_series[0] * 5.0);
        assert!((f.ebitda_monthly - hp.per_hub.ebitda * 5.0).abs() < 1e-9);
        assert!((f.npv_horizon - hp.npv_total * 5.0).abs() < 1e-6);
        assert_eq!(f.cumulative_cash.len(), hp.cash_series.len());
        let last = *f.cumulative_cash.last().unwrap();
        let total: f64 = f.cash_series.iter().sum();
        assert!((last - total).abs() < 1e-6);
    }

    #[test]
    fn zero_hubs_yield_zero_fleet() {
        let mut e = resolve(&Inputs::default());
        e.hubs_in_model = 0;
        let hp = per_hub(&e, 0.9, 0.0);
        let f = fleet(&e, &hp.per_hub, &hp.cash_series);
        assert_eq!(f.ebitda_monthly, 0.0);
        assert_eq!(f.npv_horizon, 0.0);
        assert!(f.cumulative_cash.iter().all(|c| *c == 0.0));
    }
}
