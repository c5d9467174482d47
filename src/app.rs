use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::{self, Config, OutputFormat, DEFAULT_CONFIG_PATH};
use crate::economics::{describe_active_effects, Snapshot, StressToggle};
use crate::report::{self, ReportError};
use crate::scenario::{self, Preset};
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] config::ConfigError),
    /// 리포트 생성 오류
    #[error("리포트 오류: {0}")]
    Report(#[from] ReportError),
}

/// 배터리 스왑 사업 단위 경제성 계산기.
#[derive(Debug, Parser)]
#[command(name = "swap_economics_toolbox", version, about)]
pub struct Cli {
    /// 시나리오/설정 파일 경로
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 설정 파일의 시나리오를 계산하여 출력한다.
    Compute(ComputeArgs),
    /// 민감도 레버별 허브 EBITDA 변화(토네이도)를 출력한다.
    Sensitivity,
    /// 사용 가능한 시장 프리셋을 나열한다.
    Presets,
    /// 메뉴 방식으로 가정을 바꿔가며 계산한다.
    Interactive,
}

/// `compute` 서브커맨드 인자. 설정 파일 값 위에 일회성으로 적용된다.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ComputeArgs {
    /// 적용할 시장 프리셋
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,
    /// 출력 형식 (생략 시 설정 파일 값)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// 켤 스트레스 테스트 (여러 번 지정 가능)
    #[arg(long = "stress", value_enum)]
    pub stress: Vec<StressToggle>,
    /// 가격 배수 민감도
    #[arg(long)]
    pub price_multiplier: Option<f64>,
    /// 결과를 파일로 저장
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// 인자에 따라 한 번 계산하거나 대화형 루프를 실행한다.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_default(&cli.config)?;
    match cli.command {
        Some(Command::Compute(args)) => run_compute(&cfg, &args),
        Some(Command::Sensitivity) => {
            print!("{}", report::tornado_table(&scenario::tornado(&cfg.inputs)));
            Ok(())
        }
        Some(Command::Presets) => {
            for preset in Preset::ALL {
                println!("{:<8} {}", preset.name(), preset.narrative());
            }
            Ok(())
        }
        Some(Command::Interactive) => run_interactive(&mut cfg, &cli.config),
        None => run_compute(&cfg, &ComputeArgs::default()),
    }
}

fn run_compute(cfg: &Config, args: &ComputeArgs) -> Result<(), AppError> {
    let mut inputs = match args.preset {
        Some(preset) => preset.patch(&cfg.inputs),
        None => cfg.inputs.clone(),
    };
    for toggle in &args.stress {
        toggle.set(&mut inputs.stress, true);
    }
    if let Some(m) = args.price_multiplier {
        inputs.sensitivity.price_multiplier = m;
    }
    for warning in inputs.validate() {
        warn!(%warning, "input out of range");
    }

    let snapshot = Snapshot::new(inputs, &cfg.targets);
    let format = args.format.unwrap_or(cfg.output.format);
    let rendered = render(&snapshot, format)?;
    match &args.output {
        Some(path) => write_output(path, &rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

/// 스냅샷을 지정된 형식의 문자열로 만든다.
pub fn render(snapshot: &Snapshot, format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            let effects = describe_active_effects(&snapshot.inputs);
            if !effects.is_empty() {
                out.push_str(&format!("적용된 조정: {}\n", effects.join(", ")));
            }
            out.push_str(&report::kpi_summary(&snapshot.computed));
            out.push_str(&report::narrative(&snapshot.inputs, &snapshot.computed));
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Json => {
            let mut json = report::snapshot_json(snapshot)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => report::metrics_csv(&snapshot.computed),
    }
}

fn write_output(path: &Path, content: &str) -> Result<(), AppError> {
    fs::write(path, content)?;
    println!("저장됨: {}", path.display());
    Ok(())
}

/// 대화형 메인 루프. 입력이 바뀔 때마다 전체를 다시 계산한다.
fn run_interactive(cfg: &mut Config, path: &Path) -> Result<(), AppError> {
    loop {
        let snapshot = Snapshot::new(cfg.inputs.clone(), &cfg.targets);
        match ui_cli::main_menu()? {
            ui_cli::MenuChoice::ShowResults => {
                print!("{}", render(&snapshot, OutputFormat::Text)?);
            }
            ui_cli::MenuChoice::StressTests => ui_cli::handle_stress_tests(&mut cfg.inputs)?,
            ui_cli::MenuChoice::Sensitivity => ui_cli::handle_sensitivity(&mut cfg.inputs)?,
            ui_cli::MenuChoice::Preset => ui_cli::handle_preset(&mut cfg.inputs)?,
            ui_cli::MenuChoice::Tornado => {
                print!("{}", report::tornado_table(&scenario::tornado(&cfg.inputs)));
            }
            ui_cli::MenuChoice::Export => {
                if let Some((format, out_path)) = ui_cli::handle_export()? {
                    let rendered = render(&snapshot, format)?;
                    write_output(&out_path, &rendered)?;
                }
            }
            ui_cli::MenuChoice::Save => cfg.save(path)?,
            ui_cli::MenuChoice::Exit => {
                cfg.save(path)?;
                println!("종료합니다.");
                break;
            }
        }
    }
    Ok(())
}
