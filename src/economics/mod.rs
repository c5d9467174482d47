//! 배터리 스왑 경제성 계산 엔진.
//! 유효 파라미터 해석, 수요 모델, 배터리/허브/함대 집계, 판정으로 구성한다.

pub mod battery;
pub mod cashflow;
pub mod compute;
pub mod demand;
pub mod effective;
pub mod fleet;
pub mod hub;

pub use compute::*;
pub use demand::{swaps_per_day, DemandResult};
pub use effective::{describe_active_effects, resolve, EffectiveParameters, StressToggle};
