use serde::{Deserialize, Serialize};

use crate::inputs::{Inputs, StressTests};

/// 민감도/스트레스가 모두 반영된 유효 파라미터.
///
/// 매 계산마다 [`resolve`]로 새로 만들며 저장하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveParameters {
    /// 유효 스왑 가격 [USD]
    pub price: f64,
    /// 수수료율 [%]
    pub commission_pct: f64,
    /// 월간 교체율 [%/월]
    pub replace_pct: f64,
    /// 유효 배터리 수명 [사이클]
    pub life: f64,
    pub capex_batt: f64,
    pub capex_hub: f64,
    /// 허브 월간 운영비 [USD/월]
    pub hub_opex: f64,
    /// 목표 가동률 [%]
    pub utilization_target_pct: f64,
    pub servicing_per_cycle: f64,
    /// 스트레스에 의한 수요 배수 (기본 1)
    pub demand_multiplier: f64,
    pub days_per_month: f64,
    pub base_swaps_per_day: f64,
    pub elasticity_coefficient: f64,
    pub swap_time_mins: f64,
    pub batteries_per_hub: u32,
    pub hubs_in_model: u32,
    /// 연간 할인율 [%]
    pub discount_rate_pct: f64,
    pub horizon_months: u32,
    pub baseline_price: f64,
}

impl EffectiveParameters {
    /// 월간 할인율(소수). 연율 % / 100 / 12.
    pub fn monthly_discount_rate(&self) -> f64 {
        self.discount_rate_pct / 100.0 / 12.0
    }
}

/// 개별 스트레스 테스트 토글.
///
/// `ALL`의 순서가 선언 순서이자 적용 순서다. 같은 필드를 건드리는 토글은
/// 이 순서대로 곱해진다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum StressToggle {
    DemandShock,
    LifeDrop,
    FxCapex,
    HubOpexShock,
    TheftDamage,
    PriceVsFuel,
}

impl StressToggle {
    pub const ALL: [StressToggle; 6] = [
        StressToggle::DemandShock,
        StressToggle::LifeDrop,
        StressToggle::FxCapex,
        StressToggle::HubOpexShock,
        StressToggle::TheftDamage,
        StressToggle::PriceVsFuel,
    ];

    /// 화면/리포트 표시용 라벨.
    pub fn label(self) -> &'static str {
        match self {
            StressToggle::DemandShock => "Demand −10%",
            StressToggle::LifeDrop => "Life −20%",
            StressToggle::FxCapex => "FX −15% (capex↑)",
            StressToggle::HubOpexShock => "Hub opex +20%",
            StressToggle::TheftDamage => "Theft/damage +2%/mo",
            StressToggle::PriceVsFuel => "Price −10% vs fuel",
        }
    }

    pub fn is_enabled(self, stress: &StressTests) -> bool {
        match self {
            StressToggle::DemandShock => stress.demand_shock_10,
            StressToggle::LifeDrop => stress.life_drop_20,
            StressToggle::FxCapex => stress.fx_minus_15_capex,
            StressToggle::HubOpexShock => stress.hub_opex_plus_20,
            StressToggle::TheftDamage => stress.theft_damage_plus_2pct,
            StressToggle::PriceVsFuel => stress.price_minus_10_vs_fuel,
        }
    }

    pub fn set(self, stress: &mut StressTests, enabled: bool) {
        let slot = match self {
            StressToggle::DemandShock => &mut stress.demand_shock_10,
            StressToggle::LifeDrop => &mut stress.life_drop_20,
            StressToggle::FxCapex => &mut stress.fx_minus_15_capex,
            StressToggle::HubOpexShock => &mut stress.hub_opex_plus_20,
            StressToggle::TheftDamage => &mut stress.theft_damage_plus_2pct,
            StressToggle::PriceVsFuel => &mut stress.price_minus_10_vs_fuel,
        };
        *slot = enabled;
    }

    /// 토글이 담당하는 필드에만 효과를 적용한다.
    fn apply(self, mut e: EffectiveParameters) -> EffectiveParameters {
        match self {
            StressToggle::DemandShock => e.demand_multiplier *= 0.9,
            StressToggle::LifeDrop => e.life *= 0.8,
            StressToggle::FxCapex => {
                e.capex_batt *= 1.15;
                e.capex_hub *= 1.15;
            }
            StressToggle::HubOpexShock => e.hub_opex *= 1.2,
            StressToggle::TheftDamage => e.replace_pct += 2.0,
            StressToggle::PriceVsFuel => e.price *= 0.9,
        }
        e
    }
}

/// 해석 단계. 민감도가 먼저, 스트레스가 그 위에 적용된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveStep {
    Sensitivity,
    Stress(StressToggle),
}

const RESOLVE_ORDER: [ResolveStep; 7] = [
    ResolveStep::Sensitivity,
    ResolveStep::Stress(StressToggle::DemandShock),
    ResolveStep::Stress(StressToggle::LifeDrop),
    ResolveStep::Stress(StressToggle::FxCapex),
    ResolveStep::Stress(StressToggle::HubOpexShock),
    ResolveStep::Stress(StressToggle::TheftDamage),
    ResolveStep::Stress(StressToggle::PriceVsFuel),
];

impl ResolveStep {
    fn apply(self, inputs: &Inputs, e: EffectiveParameters) -> EffectiveParameters {
        match self {
            ResolveStep::Sensitivity => apply_sensitivity(inputs, e),
            ResolveStep::Stress(toggle) if toggle.is_enabled(&inputs.stress) => toggle.apply(e),
            ResolveStep::Stress(_) => e,
        }
    }
}

fn base_parameters(inputs: &Inputs) -> EffectiveParameters {
    EffectiveParameters {
        price: inputs.pricing.price_per_swap,
        commission_pct: inputs.hub.agent_commission_pct_of_gross,
        replace_pct: inputs.battery.failure_replacement_rate_monthly_pct,
        life: inputs.battery.expected_life_cycles,
        capex_batt: inputs.battery.battery_capex,
        capex_hub: inputs.hub.hub_capex,
        hub_opex: inputs.hub.hub_opex_per_month,
        utilization_target_pct: inputs.scale.utilization_target_pct,
        servicing_per_cycle: inputs.battery.servicing_cost_per_cycle,
        demand_multiplier: 1.0,
        days_per_month: inputs.pricing.hub_active_days_per_month,
        base_swaps_per_day: inputs.pricing.swaps_per_battery_per_day,
        elasticity_coefficient: inputs.pricing.elasticity_coefficient,
        swap_time_mins: inputs.scale.swap_time_minutes,
        batteries_per_hub: inputs.scale.batteries_per_hub,
        hubs_in_model: inputs.scale.hubs_in_model,
        discount_rate_pct: inputs.finance.discount_rate_pct,
        horizon_months: inputs.finance.analysis_horizon_months,
        baseline_price: inputs.baselines.baseline_price,
    }
}

fn apply_sensitivity(inputs: &Inputs, mut e: EffectiveParameters) -> EffectiveParameters {
    let s = &inputs.sensitivity;
    e.price *= s.price_multiplier;
    e.life *= s.life_multiplier;
    if let Some(v) = s.commission_pct_override {
        e.commission_pct = v;
    }
    if let Some(v) = s.replacement_pct_override {
        e.replace_pct = v;
    }
    if let Some(v) = s.utilization_target_pct_override {
        e.utilization_target_pct = v;
    }
    e
}

/// 기본 가정에 민감도 조정과 스트레스 토글을 정해진 순서로 적용한다.
pub fn resolve(inputs: &Inputs) -> EffectiveParameters {
    RESOLVE_ORDER
        .iter()
        .fold(base_parameters(inputs), |e, step| step.apply(inputs, e))
}

/// 현재 활성화된 민감도 조정/스트레스 토글을 사람이 읽을 수 있는 라벨로 나열한다.
pub fn describe_active_effects(inputs: &Inputs) -> Vec<String> {
    let s = &inputs.sensitivity;
    let mut out = Vec::new();
    if s.price_multiplier != 1.0 {
        out.push(format!("Price x{:.2}", s.price_multiplier));
    }
    if s.life_multiplier != 1.0 {
        out.push(format!("Life x{:.2}", s.life_multiplier));
    }
    if let Some(v) = s.utilization_target_pct_override {
        out.push(format!("Utilization {v}%"));
    }
    if let Some(v) = s.commission_pct_override {
        out.push(format!("Commission {v}%"));
    }
    if let Some(v) = s.replacement_pct_override {
        out.push(format!("Replacement {v}%"));
    }
    out.extend(
        StressToggle::ALL
            .iter()
            .filter(|t| t.is_enabled(&inputs.stress))
            .map(|t| t.label().to_string()),
    );
    out
}
