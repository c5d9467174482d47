//! 엔진 바깥의 시나리오 도구: 시장 프리셋과 토네이도 민감도 분석.

pub mod presets;
pub mod sensitivity;

pub use presets::{changed_fields, Preset, UnknownPreset};
pub use sensitivity::{tornado, Lever, TornadoBar};
