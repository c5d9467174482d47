use std::process::ExitCode;

use clap::Parser;
use swap_economics_toolbox::app::{self, Cli};
use tracing_subscriber::EnvFilter;

/// 로그는 stderr로 보낸다. 기본 레벨은 warn이며 RUST_LOG로 바꿀 수 있다.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

/// 프로그램의 엔트리 포인트. 인자를 해석한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    init_tracing();
    match app::run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}
