use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::app::AppError;
use crate::config::OutputFormat;
use crate::economics::StressToggle;
use crate::inputs::Inputs;
use crate::scenario::{changed_fields, Preset};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowResults,
    StressTests,
    Sensitivity,
    Preset,
    Tornado,
    Export,
    Save,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu() -> Result<MenuChoice, AppError> {
    println!("\n=== Battery Swap Unit Economics ===");
    println!("1) 결과 보기");
    println!("2) 스트레스 테스트");
    println!("3) 민감도 조정");
    println!("4) 시장 프리셋");
    println!("5) 토네이도 분석");
    println!("6) 내보내기 (CSV/JSON)");
    println!("7) 설정 저장");
    println!("0) 종료");
    select_menu(&mut io::stdin().lock())
}

/// 메뉴 번호를 읽는다. 입력 스트림이 끝나면 종료로 취급한다.
fn select_menu<R: BufRead>(reader: &mut R) -> Result<MenuChoice, AppError> {
    loop {
        let sel = match read_line_from(reader, "메뉴 선택: ") {
            Ok(sel) => sel,
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                println!();
                return Ok(MenuChoice::Exit);
            }
            Err(e) => return Err(e),
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::ShowResults),
            "2" => return Ok(MenuChoice::StressTests),
            "3" => return Ok(MenuChoice::Sensitivity),
            "4" => return Ok(MenuChoice::Preset),
            "5" => return Ok(MenuChoice::Tornado),
            "6" => return Ok(MenuChoice::Export),
            "7" => return Ok(MenuChoice::Save),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("잘못된 입력입니다. 다시 선택하세요."),
        }
    }
}

/// 스트레스 토글을 켜고 끈다.
pub fn handle_stress_tests(inputs: &mut Inputs) -> Result<(), AppError> {
    loop {
        println!("\n-- 스트레스 테스트 --");
        for (i, toggle) in StressToggle::ALL.iter().enumerate() {
            let mark = if toggle.is_enabled(&inputs.stress) { "x" } else { " " };
            println!("{}) [{mark}] {}", i + 1, toggle.label());
        }
        let sel = read_line("토글할 번호(끝내려면 엔터): ")?;
        if sel.trim().is_empty() {
            return Ok(());
        }
        match parse_toggle_choice(sel.trim()) {
            Some(toggle) => {
                let enabled = toggle.is_enabled(&inputs.stress);
                toggle.set(&mut inputs.stress, !enabled);
            }
            None => println!("잘못된 선택입니다."),
        }
    }
}

fn parse_toggle_choice(sel: &str) -> Option<StressToggle> {
    let n = sel.parse::<usize>().ok()?;
    StressToggle::ALL.get(n.checked_sub(1)?).copied()
}

/// 민감도 배수와 override 값을 입력받는다. 빈 입력은 현재 값을 유지한다.
pub fn handle_sensitivity(inputs: &mut Inputs) -> Result<(), AppError> {
    println!("\n-- 민감도 조정 --");
    println!("엔터: 유지, '-': override 해제");
    let s = &mut inputs.sensitivity;
    if let Some(v) = read_optional_f64(&format!("가격 배수 (현재 {:.2}): ", s.price_multiplier))? {
        s.price_multiplier = v;
    }
    if let Some(v) = read_optional_f64(&format!("수명 배수 (현재 {:.2}): ", s.life_multiplier))? {
        s.life_multiplier = v;
    }
    s.utilization_target_pct_override =
        read_override("가동률 override [%]", s.utilization_target_pct_override)?;
    s.commission_pct_override = read_override("수수료 override [%]", s.commission_pct_override)?;
    s.replacement_pct_override =
        read_override("교체율 override [%/월]", s.replacement_pct_override)?;
    Ok(())
}

/// 프리셋을 적용하고 바뀐 항목을 출력한다.
pub fn handle_preset(inputs: &mut Inputs) -> Result<(), AppError> {
    println!("\n-- 시장 프리셋 --");
    for (i, preset) in Preset::ALL.iter().enumerate() {
        println!("{}) {} - {}", i + 1, preset.name(), preset.narrative());
    }
    let sel = read_line("선택: ")?;
    let preset = match sel.trim() {
        "1" => Preset::Nigeria,
        "2" => Preset::Drc,
        "3" => Preset::Generic,
        other => match other.parse::<Preset>() {
            Ok(p) => p,
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        },
    };
    let next = preset.patch(inputs);
    let changed = changed_fields(inputs, &next);
    *inputs = next;
    if changed.is_empty() {
        println!("{} 프리셋: 변경 없음", preset.name().to_uppercase());
    } else {
        println!("{} 프리셋: {}", preset.name().to_uppercase(), changed.join(", "));
    }
    Ok(())
}

/// 내보내기 형식과 경로를 입력받는다. 취소하면 `None`.
pub fn handle_export() -> Result<Option<(OutputFormat, PathBuf)>, AppError> {
    println!("\n-- 내보내기 --");
    println!("1) CSV (허브/배터리 지표)  2) JSON 스냅샷");
    let format = match read_line("선택(취소하려면 엔터): ")?.trim() {
        "1" => OutputFormat::Csv,
        "2" => OutputFormat::Json,
        _ => return Ok(None),
    };
    let default_name = match format {
        OutputFormat::Json => "swap_snapshot.json",
        _ => "swap_metrics.csv",
    };
    let path = read_line(&format!("파일 경로 (기본 {default_name}): "))?;
    let path = match path.trim() {
        "" => default_name,
        p => p,
    };
    Ok(Some((format, PathBuf::from(path))))
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 한 줄을 읽는다. 0바이트(EOF)는 `UnexpectedEof`로 보고하여 재시도 루프가 멈추게 한다.
fn read_line_from<R: BufRead>(reader: &mut R, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    if reader.read_line(&mut buf).map_err(AppError::Io)? == 0 {
        return Err(AppError::Io(io::ErrorKind::UnexpectedEof.into()));
    }
    Ok(buf)
}

fn read_optional_f64(prompt: &str) -> Result<Option<f64>, AppError> {
    loop {
        let s = read_line(prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}

fn read_override(label: &str, current: Option<f64>) -> Result<Option<f64>, AppError> {
    let shown = current
        .map(|v| format!("{v}"))
        .unwrap_or_else(|| "없음".to_string());
    loop {
        let s = read_line(&format!("{label} (현재 {shown}): "))?;
        match s.trim() {
            "" => return Ok(current),
            "-" => return Ok(None),
            v => match v.parse::<f64>() {
                Ok(x) => return Ok(Some(x)),
                Err(_) => println!("숫자 또는 '-'를 입력하세요."),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_choice_maps_one_based_index() {
        assert_eq!(parse_toggle_choice("1"), Some(StressToggle::DemandShock));
        assert_eq!(parse_toggle_choice("6"), Some(StressToggle::PriceVsFuel));
        assert_eq!(parse_toggle_choice("0"), None);
        assert_eq!(parse_toggle_choice("7"), None);
        assert_eq!(parse_toggle_choice("x"), None);
    }

    #[test]
    fn closed_input_reports_unexpected_eof() {
        let err = read_line_from(&mut io::empty(), "> ").unwrap_err();
        match err {
            AppError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(read_line_from(&mut "0\n".as_bytes(), "> ").unwrap(), "0\n");
    }

    #[test]
    fn menu_exits_when_input_ends() {
        assert_eq!(select_menu(&mut io::empty()).unwrap(), MenuChoice::Exit);
        // 잘못된 입력 뒤 EOF도 무한 반복 없이 종료된다.
        assert_eq!(select_menu(&mut "9\n".as_bytes()).unwrap(), MenuChoice::Exit);
        assert_eq!(select_menu(&mut "x\n2\n".as_bytes()).unwrap(), MenuChoice::StressTests);
    }
}
