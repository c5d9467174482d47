use serde::{Deserialize, Serialize};

use super::effective::EffectiveParameters;

/// 가격/기준가 하한. 0 나눗셈과 음수 밑 거듭제곱을 막는다.
const PRICE_FLOOR: f64 = 0.01;
const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// 수요 모델 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandResult {
    /// 실현 스왑 수 [회/일/배터리]
    pub per_day: f64,
    /// 가동률 상한 [회/일]
    pub cap: f64,
    /// 실현/상한 (상한이 0이면 0)
    pub utilization_ratio: f64,
}

/// 고정 탄력성 모델: Q' = Q * (P/P0)^ε.
pub fn price_elasticity_multiplier(price: f64, baseline: f64, elasticity: f64) -> f64 {
    let ratio = (price / baseline.max(PRICE_FLOOR)).max(PRICE_FLOOR);
    ratio.powf(elasticity)
}

/// 목표 가동률과 스왑 시간으로 하루 최대 스왑 수를 구한다.
pub fn utilization_cap_per_day(utilization_pct: f64, swap_time_minutes: f64) -> f64 {
    let util_frac = (utilization_pct / 100.0).clamp(0.0, 1.0);
    util_frac * MINUTES_PER_DAY / swap_time_minutes.max(1.0)
}

/// 배터리 1개의 하루 실현 스왑 수를 계산한다. 상한은 절대 넘지 않는다.
pub fn swaps_per_day(e: &EffectiveParameters) -> DemandResult {
    let mult = price_elasticity_multiplier(e.price, e.baseline_price, e.elasticity_coefficient);
    let physical = e.base_swaps_per_day * mult * e.demand_multiplier;
    let cap = utilization_cap_per_day(e.utilization_target_pct, e.swap_time_mins);
    let per_day = physical.min(cap);
    let utilization_ratio = if cap > 0.0 { per_day / cap } else { 0.0 };
    DemandResult {
        per_day,
        cap,
        utilization_ratio,
    }
}
