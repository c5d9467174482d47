use serde::{Deserialize, Serialize};

use crate::economics::compute_with_targets;
use crate::economics::Targets;
use crate::inputs::{Inputs, Sensitivity};

/// 토네이도 차트에서 한 번에 하나씩 흔드는 민감도 레버.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lever {
    Price,
    Utilization,
    Life,
    Commission,
    Attrition,
}

impl Lever {
    pub const ALL: [Lever; 5] = [
        Lever::Price,
        Lever::Utilization,
        Lever::Life,
        Lever::Commission,
        Lever::Attrition,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Lever::Price => "Price",
            Lever::Utilization => "Utilization",
            Lever::Life => "Life",
            Lever::Commission => "Commission",
            Lever::Attrition => "Attrition",
        }
    }

    /// (low, high) 스윕 구간.
    pub fn range(self) -> (f64, f64) {
        match self {
            Lever::Price => (0.8, 1.2),
            Lever::Utilization => (40.0, 95.0),
            Lever::Life => (0.7, 1.3),
            Lever::Commission => (5.0, 25.0),
            Lever::Attrition => (0.0, 3.0),
        }
    }

    fn set(self, s: &mut Sensitivity, value: f64) {
        match self {
            Lever::Price => s.price_multiplier = value,
            Lever::Utilization => s.utilization_target_pct_override = Some(value),
            Lever::Life => s.life_multiplier = value,
            Lever::Commission => s.commission_pct_override = Some(value),
            Lever::Attrition => s.replacement_pct_override = Some(value),
        }
    }
}

/// 레버 하나의 허브 EBITDA 변화.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoBar {
    pub lever: Lever,
    pub ebitda_low: f64,
    pub ebitda_high: f64,
    /// high - low
    pub delta: f64,
}

fn hub_ebitda_with(inputs: &Inputs, targets: &Targets, lever: Lever, value: f64) -> f64 {
    let mut trial = inputs.clone();
    lever.set(&mut trial.sensitivity, value);
    compute_with_targets(&trial, targets).per_hub.ebitda
}

/// 레버별로 입력 복사본을 만들어 허브 EBITDA의 (high - low) 차이를 계산한다.
pub fn tornado(inputs: &Inputs) -> Vec<TornadoBar> {
    let targets = Targets::default();
    Lever::ALL
        .iter()
        .map(|&lever| {
            let (lo, hi) = lever.range();
            let ebitda_low = hub_ebitda_with(inputs, &targets, lever, lo);
            let ebitda_high = hub_ebitda_with(inputs, &targets, lever, hi);
            TornadoBar {
                lever,
                ebitda_low,
                ebitda_high,
                delta: ebitda_high - ebitda_low,
            }
        })
        .collect()
}
