use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::battery::{per_battery, PerBatteryMonthly};
use super::demand::{swaps_per_day, DemandResult};
use super::effective::{resolve, EffectiveParameters};
use super::fleet::{fleet, FleetKpis};
use super::hub::{per_hub, PerHubMonthly};
use crate::inputs::Inputs;

/// 합격/불합격 판정 기준.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    /// 허브 회수 기간 기준 [월] (미만이면 합격)
    pub breakeven_months: usize,
    /// 허브 월간 EBITDA 기준 [USD] (초과하면 합격)
    pub hub_ebitda_usd: f64,
    /// 허브 capex 상각 기간 [월]. 월 상각액 표시에 쓴다.
    pub amortisation_months_hub: u32,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            breakeven_months: 18,
            hub_ebitda_usd: 500.0,
            amortisation_months_hub: 60,
        }
    }
}

/// KPI 배지.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiBadges {
    pub hub_ebitda: f64,
    pub breakeven_months: Option<usize>,
    pub fleet_npv: f64,
}

/// 세 가지 기준 판정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassFail {
    pub breakeven_under_target: bool,
    pub hub_ebitda_gt_target: bool,
    pub npv_positive: bool,
}

impl PassFail {
    pub fn all_pass(&self) -> bool {
        self.breakeven_under_target && self.hub_ebitda_gt_target && self.npv_positive
    }
}

/// 한 번의 계산으로 얻는 전체 결과 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computed {
    pub effective: EffectiveParameters,
    pub demand: DemandResult,
    pub per_battery: PerBatteryMonthly,
    pub per_hub: PerHubMonthly,
    /// 허브 1곳의 현금흐름
    pub hub_cash_series: Vec<f64>,
    pub hub_npv: f64,
    pub fleet: FleetKpis,
    /// 허브 capex 월 상각액 [USD] (비현금, 현금흐름에는 넣지 않는다)
    pub hub_capex_amortisation: f64,
    pub badges: KpiBadges,
    /// 판정에 쓴 기준값
    pub targets: Targets,
    pub pass_fail: PassFail,
}

/// 입력과 결과를 함께 묶은 내보내기 단위.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub inputs: Inputs,
    pub computed: Computed,
}

impl Snapshot {
    pub fn new(inputs: Inputs, targets: &Targets) -> Self {
        let computed = compute_with_targets(&inputs, targets);
        Self { inputs, computed }
    }
}

/// 기본 기준으로 전체 계산을 수행한다.
pub fn compute_all(inputs: &Inputs) -> Computed {
    compute_with_targets(inputs, &Targets::default())
}

/// 유효 파라미터 → 수요 → 배터리/허브 → 함대 → 판정 순서로 계산한다.
///
/// 같은 입력이면 항상 같은 결과를 돌려준다.
pub fn compute_with_targets(inputs: &Inputs, targets: &Targets) -> Computed {
    let effective = resolve(inputs);
    debug!(
        price = effective.price,
        life = effective.life,
        demand_multiplier = effective.demand_multiplier,
        "resolved effective parameters"
    );

    let demand = swaps_per_day(&effective);
    debug!(
        per_day = demand.per_day,
        cap = demand.cap,
        utilization_ratio = demand.utilization_ratio,
        "demand"
    );

    let per_battery = per_battery(&effective, demand.per_day);
    if per_battery.breakeven_cycles.is_none() {
        warn!(
            per_cycle_margin = per_battery.per_cycle_margin,
            "per-cycle margin is not positive; battery breakeven unreachable"
        );
    }

    let projection = per_hub(&effective, demand.per_day, demand.utilization_ratio);
    if !projection.per_hub.irr.is_defined() {
        warn!(
            iterations = projection.per_hub.irr.iterations,
            "hub IRR undefined for this cash series"
        );
    }

    let fleet = fleet(&effective, &projection.per_hub, &projection.cash_series);
    let badges = KpiBadges {
        hub_ebitda: projection.per_hub.ebitda,
        breakeven_months: projection.per_hub.payback_months,
        fleet_npv: fleet.npv_horizon,
    };
    let hub_capex_amortisation =
        effective.capex_hub / f64::from(targets.amortisation_months_hub.max(1));
    let pass_fail = PassFail {
        breakeven_under_target: projection
            .per_hub
            .payback_months
            .is_some_and(|m| m < targets.breakeven_months),
        hub_ebitda_gt_target: projection.per_hub.ebitda > targets.hub_ebitda_usd,
        npv_positive: fleet.npv_horizon > 0.0,
    };

    Computed {
        effective,
        demand,
        per_battery,
        per_hub: projection.per_hub,
        hub_cash_series: projection.cash_series,
        hub_npv: projection.npv_total,
        fleet,
        hub_capex_amortisation,
        badges,
        targets: targets.clone(),
        pass_fail,
    }
}
