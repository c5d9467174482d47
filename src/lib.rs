//! 배터리 스왑 사업의 단위 경제성 계산 로직을 라이브러리로 분리하여 CLI 외의 화면에서도 재사용한다.

pub mod app;
pub mod config;
pub mod economics;
pub mod inputs;
pub mod report;
pub mod scenario;
pub mod ui_cli;
