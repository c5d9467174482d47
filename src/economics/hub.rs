use serde::{Deserialize, Serialize};

use super::battery::per_battery;
use super::cashflow::{self, IrrOutcome};
use super::effective::EffectiveParameters;

/// 허브 1곳의 월간 경제성.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerHubMonthly {
    pub revenue: f64,
    pub commission: f64,
    pub servicing: f64,
    pub attrition: f64,
    /// 허브 운영비 (허브당 1회 차감)
    pub opex: f64,
    pub ebitda: f64,
    /// 누적 현금이 0 이상이 되는 첫 달. 분석 기간 내 회수가 없으면 `None`.
    pub payback_months: Option<usize>,
    /// 월간 IRR과 수렴 정보
    pub irr: IrrOutcome,
    /// 연 환산 IRR: (1+r)^12 - 1
    pub irr_annualized: Option<f64>,
    pub utilization_ratio: f64,
}

/// 허브 단위 계산 결과와 현금흐름 투영.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubProjection {
    pub per_hub: PerHubMonthly,
    /// [0개월 초기 투자, 1..=horizon 월간 EBITDA]
    pub cash_series: Vec<f64>,
    pub npv_total: f64,
}

/// 0개월 초기 투자 + 분석 기간 동안 일정한 월간 EBITDA로 이루어진 현금흐름.
pub fn project_cash_series(e: &EffectiveParameters, monthly_ebitda: f64) -> Vec<f64> {
    let initial_outflow = -(e.capex_hub + e.capex_batt * f64::from(e.batteries_per_hub));
    std::iter::once(initial_outflow)
        .chain(std::iter::repeat(monthly_ebitda).take(e.horizon_months as usize))
        .collect()
}

/// 배터리 단위 값을 허브 규모로 올리고 현금흐름 지표를 계산한다.
pub fn per_hub(e: &EffectiveParameters, swaps_per_day: f64, utilization_ratio: f64) -> HubProjection {
    let batteries = f64::from(e.batteries_per_hub);
    let pb = per_battery(e, swaps_per_day);
    let revenue = pb.revenue * batteries;
    let commission = pb.commission * batteries;
    let servicing = pb.servicing * batteries;
    let attrition = pb.attrition_cost * batteries;
    let opex = e.hub_opex;
    let ebitda = revenue - commission - servicing - attrition - opex;

    let cash_series = project_cash_series(e, ebitda);
    let npv_total = cashflow::npv(&cash_series, e.monthly_discount_rate());
    let irr = cashflow::irr(&cash_series);
    let irr_annualized = irr.rate().map(|r| (1.0 + r).powi(12) - 1.0);

    HubProjection {
        per_hub: PerHubMonthly {
            revenue,
            commission,
            servicing,
            attrition,
            opex,
            ebitda,
            payback_months: cashflow::payback_months(&cash_series),
            irr,
            irr_annualized,
            utilization_ratio,
        },
        cash_series,
        npv_total,
    }
}
