use serde::{Deserialize, Serialize};

/// 가격/수요 가정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDemand {
    /// 스왑 1회 가격 [USD]
    pub price_per_swap: f64,
    /// 배터리 1개당 하루 스왑 수(기준 가격 기준)
    pub swaps_per_battery_per_day: f64,
    /// 허브 월간 운영일 [일/월]
    pub hub_active_days_per_month: f64,
    /// 가격 탄력성 계수(음수, 예: -1.0)
    pub elasticity_coefficient: f64,
}

/// 배터리 비용/성능 가정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryCosts {
    /// 배터리 1개 취득가 [USD]
    pub battery_capex: f64,
    /// 기대 수명 [사이클]
    pub expected_life_cycles: f64,
    /// 고장/도난 교체율 [%/월]
    pub failure_replacement_rate_monthly_pct: f64,
    /// 사이클당 정비비 [USD]
    pub servicing_cost_per_cycle: f64,
}

/// 허브 비용 가정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubCosts {
    /// 허브 설치비 [USD]
    pub hub_capex: f64,
    /// 허브 월간 운영비 [USD/월]
    pub hub_opex_per_month: f64,
    /// 대리점 수수료 [% of gross]
    pub agent_commission_pct_of_gross: f64,
}

/// 규모/운영 가정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleOps {
    pub batteries_per_hub: u32,
    pub hubs_in_model: u32,
    /// 목표 가동률 [%] (0~100)
    pub utilization_target_pct: f64,
    /// 스왑 1회 소요 시간 [분]
    pub swap_time_minutes: f64,
}

/// 재무 가정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finance {
    /// 연간 할인율 [%]
    pub discount_rate_pct: f64,
    /// 분석 기간 [월]
    pub analysis_horizon_months: u32,
}

/// 민감도 조정값. 값이 있는 override는 기본 가정을 대체한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub price_multiplier: f64,
    pub life_multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization_target_pct_override: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_pct_override: Option<f64>,
    /// 월간 교체율 override [%/월]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_pct_override: Option<f64>,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            price_multiplier: 1.0,
            life_multiplier: 1.0,
            utilization_target_pct_override: None,
            commission_pct_override: None,
            replacement_pct_override: None,
        }
    }
}

/// 스트레스 테스트 토글. 선언 순서가 곧 적용 순서다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressTests {
    /// 수요 -10%
    pub demand_shock_10: bool,
    /// 배터리 수명 -20%
    pub life_drop_20: bool,
    /// 환율 -15% (capex +15%)
    pub fx_minus_15_capex: bool,
    /// 허브 운영비 +20%
    pub hub_opex_plus_20: bool,
    /// 도난/파손 교체율 +2%p
    pub theft_damage_plus_2pct: bool,
    /// 연료 대비 가격 -10%
    pub price_minus_10_vs_fuel: bool,
}

/// 탄력성 모델의 기준점.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baselines {
    /// 기준 수요가 관측된 가격 [USD]
    pub baseline_price: f64,
}

/// 한 번의 계산에 필요한 전체 가정 묶음.
///
/// 엔진은 범위를 검증하지 않는다. 호출 측이 필요하면 [`Inputs::validate`]로
/// 경고를 확인한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub pricing: PricingDemand,
    pub battery: BatteryCosts,
    pub hub: HubCosts,
    pub scale: ScaleOps,
    pub finance: Finance,
    #[serde(default)]
    pub sensitivity: Sensitivity,
    #[serde(default)]
    pub stress: StressTests,
    pub baselines: Baselines,
}

impl Default for Inputs {
    fn default() -> Self {
        let price = 4.0;
        Self {
            pricing: PricingDemand {
                price_per_swap: price,
                swaps_per_battery_per_day: 0.9,
                hub_active_days_per_month: 26.0,
                elasticity_coefficient: -1.0,
            },
            battery: BatteryCosts {
                battery_capex: 800.0,
                expected_life_cycles: 1200.0,
                failure_replacement_rate_monthly_pct: 1.0,
                servicing_cost_per_cycle: 0.4,
            },
            hub: HubCosts {
                hub_capex: 15_000.0,
                hub_opex_per_month: 400.0,
                agent_commission_pct_of_gross: 18.0,
            },
            scale: ScaleOps {
                batteries_per_hub: 30,
                hubs_in_model: 5,
                utilization_target_pct: 85.0,
                swap_time_minutes: 30.0,
            },
            finance: Finance {
                discount_rate_pct: 18.0,
                analysis_horizon_months: 36,
            },
            sensitivity: Sensitivity::default(),
            stress: StressTests::default(),
            baselines: Baselines {
                baseline_price: price,
            },
        }
    }
}

/// 입력 범위 점검 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputWarning {
    /// 탄력성 계수가 음수가 아님
    NonNegativeElasticity,
    /// 가동률이 0~100 범위를 벗어남
    UtilizationOutOfRange,
    /// 배터리/허브 수 또는 분석 기간이 0
    ZeroCount(&'static str),
    /// 가격이 0 이하
    NonPositivePrice,
}

impl std::fmt::Display for InputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputWarning::NonNegativeElasticity => {
                write!(f, "탄력성 계수는 음수여야 합니다 (가격 상승 시 수요 감소).")
            }
            InputWarning::UtilizationOutOfRange => {
                write!(f, "가동률은 0~100% 범위여야 합니다.")
            }
            InputWarning::ZeroCount(field) => write!(f, "{field} 값은 1 이상이어야 합니다."),
            InputWarning::NonPositivePrice => write!(f, "스왑 가격은 0보다 커야 합니다."),
        }
    }
}

impl Inputs {
    /// 입력 범위를 점검하여 경고 목록을 반환한다. 계산 엔진은 이 결과를 사용하지 않는다.
    pub fn validate(&self) -> Vec<InputWarning> {
        let mut out = Vec::new();
        if self.pricing.elasticity_coefficient >= 0.0 {
            out.push(InputWarning::NonNegativeElasticity);
        }
        let util_values = std::iter::once(self.scale.utilization_target_pct)
            .chain(self.sensitivity.utilization_target_pct_override);
        for util in util_values {
            if !(0.0..=100.0).contains(&util) {
                out.push(InputWarning::UtilizationOutOfRange);
                break;
            }
        }
        if self.scale.batteries_per_hub == 0 {
            out.push(InputWarning::ZeroCount("batteries_per_hub"));
        }
        if self.scale.hubs_in_model == 0 {
            out.push(InputWarning::ZeroCount("hubs_in_model"));
        }
        if self.finance.analysis_horizon_months == 0 {
            out.push(InputWarning::ZeroCount("analysis_horizon_months"));
        }
        if self.pricing.price_per_swap <= 0.0 {
            out.push(InputWarning::NonPositivePrice);
        }
        out
    }
}
