use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::economics::Targets;
use crate::inputs::Inputs;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 결과 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 사람이 읽는 KPI 요약
    #[default]
    Text,
    /// 입력+결과 스냅샷 JSON
    Json,
    /// 지표 CSV
    Csv,
}

/// 출력 관련 설정.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// 애플리케이션 설정. 시나리오 입력과 판정 기준을 함께 저장한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub targets: Targets,
    #[serde(default)]
    pub inputs: Inputs,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        info!(path = %path.display(), "created default config");
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("swap_econ_{}_{name}", std::process::id()))
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = temp_path("create.toml");
        let _ = fs::remove_file(&path);
        let cfg = load_or_default(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
        let again = load_or_default(&path).unwrap();
        assert_eq!(again.inputs, cfg.inputs);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn saved_changes_survive_reload() {
        let path = temp_path("save.toml");
        let mut cfg = Config::default();
        cfg.output.format = OutputFormat::Csv;
        cfg.inputs.stress.fx_minus_15_capex = true;
        cfg.inputs.sensitivity.commission_pct_override = Some(12.0);
        cfg.save(&path).unwrap();
        let back = load_or_default(&path).unwrap();
        assert_eq!(back.output.format, OutputFormat::Csv);
        assert!(back.inputs.stress.fx_minus_15_capex);
        assert_eq!(back.inputs.sensitivity.commission_pct_override, Some(12.0));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.targets, Targets::default());
        assert_eq!(cfg.inputs, Inputs::default());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let path = temp_path("bad.toml");
        fs::write(&path, "inputs = [").unwrap();
        let err = load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Serde(_)));
        let _ = fs::remove_file(&path);
    }
}
