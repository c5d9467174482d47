use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::inputs::Inputs;

/// 시장별 시나리오 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Nigeria,
    Drc,
    Generic,
}

struct PresetValues {
    price_per_swap: f64,
    swaps_per_battery_per_day: f64,
    hub_opex_per_month: f64,
    agent_commission_pct_of_gross: f64,
    utilization_target_pct: f64,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Nigeria, Preset::Drc, Preset::Generic];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Nigeria => "nigeria",
            Preset::Drc => "drc",
            Preset::Generic => "generic",
        }
    }

    /// 프리셋 설명 한 줄.
    pub fn narrative(self) -> &'static str {
        match self {
            Preset::Nigeria => "Higher demand from outages; moderate opex; mid commission.",
            Preset::Drc => "Higher opex/logistics; strong generator-replacement demand.",
            Preset::Generic => "Neutral baseline for quick comparisons.",
        }
    }

    fn values(self) -> PresetValues {
        match self {
            Preset::Nigeria => PresetValues {
                price_per_swap: 4.5,
                swaps_per_battery_per_day: 1.0,
                hub_opex_per_month: 380.0,
                agent_commission_pct_of_gross: 18.0,
                utilization_target_pct: 88.0,
            },
            Preset::Drc => PresetValues {
                price_per_swap: 5.2,
                swaps_per_battery_per_day: 1.1,
                hub_opex_per_month: 450.0,
                agent_commission_pct_of_gross: 20.0,
                utilization_target_pct: 85.0,
            },
            Preset::Generic => PresetValues {
                price_per_swap: 4.0,
                swaps_per_battery_per_day: 0.9,
                hub_opex_per_month: 400.0,
                agent_commission_pct_of_gross: 18.0,
                utilization_target_pct: 85.0,
            },
        }
    }

    /// 프리셋 값을 덮어쓴 새 입력을 만든다. 기준 가격은 새 가격으로 다시 맞춘다.
    pub fn patch(self, base: &Inputs) -> Inputs {
        let v = self.values();
        let mut next = base.clone();
        next.pricing.price_per_swap = v.price_per_swap;
        next.pricing.swaps_per_battery_per_day = v.swaps_per_battery_per_day;
        next.hub.hub_opex_per_month = v.hub_opex_per_month;
        next.hub.agent_commission_pct_of_gross = v.agent_commission_pct_of_gross;
        next.scale.utilization_target_pct = v.utilization_target_pct;
        next.baselines.baseline_price = next.pricing.price_per_swap;
        next
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 알 수 없는 프리셋 이름.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("알 수 없는 프리셋: {0} (nigeria, drc, generic 중 선택)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// 두 입력 사이에서 프리셋이 바꾸는 필드를 부호 있는 차이로 나열한다.
pub fn changed_fields(prev: &Inputs, next: &Inputs) -> Vec<String> {
    let fields = [
        (
            "price",
            prev.pricing.price_per_swap,
            next.pricing.price_per_swap,
            "",
        ),
        (
            "swaps/day",
            prev.pricing.swaps_per_battery_per_day,
            next.pricing.swaps_per_battery_per_day,
            "",
        ),
        (
            "hub opex",
            prev.hub.hub_opex_per_month,
            next.hub.hub_opex_per_month,
            "",
        ),
        (
            "commission",
            prev.hub.agent_commission_pct_of_gross,
            next.hub.agent_commission_pct_of_gross,
            "%",
        ),
        (
            "utilization target",
            prev.scale.utilization_target_pct,
            next.scale.utilization_target_pct,
            "%",
        ),
    ];
    fields
        .iter()
        .filter(|(_, a, b, _)| a != b)
        .map(|(label, a, b, suffix)| format!("{label} {}{suffix}", signed_delta(*a, *b)))
        .collect()
}

fn signed_delta(a: f64, b: f64) -> String {
    let d = b - a;
    let sign = if d >= 0.0 { "+" } else { "" };
    format!("{sign}{d:.2}")
}
