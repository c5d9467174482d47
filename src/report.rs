//! 계산 결과 스냅샷을 텍스트/CSV/JSON으로 포맷한다. 계산은 하지 않는다.

use std::fmt::Write as _;

use crate::economics::{Computed, Snapshot};
use crate::inputs::Inputs;
use crate::scenario::TornadoBar;

/// 리포트 생성 오류.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// CSV 기록 오류
    #[error("CSV 기록 오류: {0}")]
    Csv(#[from] csv::Error),
    /// CSV 버퍼 플러시 오류
    #[error("CSV 버퍼 오류: {0}")]
    CsvFlush(String),
    /// UTF-8 변환 오류
    #[error("UTF-8 변환 오류: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// JSON 직렬화 오류
    #[error("JSON 직렬화 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 금액을 짧게 표기한다. 1,000 이상은 k, 1,000,000 이상은 m 접미사.
pub fn format_money(n: f64) -> String {
    if !n.is_finite() {
        return "—".to_string();
    }
    let sign = if n < 0.0 { "-" } else { "" };
    let v = n.abs();
    if v >= 1_000_000.0 {
        format!("{sign}{:.1}m", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{sign}{:.1}k", v / 1_000.0)
    } else {
        format!("{sign}{v:.0}")
    }
}

fn cell(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.2}"),
        _ => String::new(),
    }
}

fn months(v: Option<usize>) -> String {
    v.map(|m| m.to_string()).unwrap_or_else(|| "—".to_string())
}

/// 한 문단 요약.
pub fn narrative(inputs: &Inputs, computed: &Computed) -> String {
    format!(
        "At ${:.2}/swap and {:.1} swaps/day, each battery contributes ${}/month (cash). \
         With {} batteries and ${} opex, the hub delivers ${} EBITDA and breaks even in {} months; \
         fleet NPV over {} months is ${}.",
        inputs.pricing.price_per_swap,
        computed.per_battery.swaps_per_day,
        format_money(computed.per_battery.contribution_margin),
        inputs.scale.batteries_per_hub,
        format_money(inputs.hub.hub_opex_per_month),
        format_money(computed.per_hub.ebitda),
        months(computed.per_hub.payback_months),
        inputs.finance.analysis_horizon_months,
        format_money(computed.fleet.npv_horizon),
    )
}

/// 허브/배터리 지표 CSV. 정의되지 않은 값은 빈 칸으로 남긴다.
pub fn metrics_csv(c: &Computed) -> Result<String, ReportError> {
    let pb = &c.per_battery;
    let hub = &c.per_hub;
    let rows: [(&str, &str, Option<f64>, &str); 15] = [
        ("Per-battery/month", "Revenue", Some(pb.revenue), "USD"),
        ("Per-battery/month", "Commission", Some(pb.commission), "USD"),
        ("Per-battery/month", "Servicing", Some(pb.servicing), "USD"),
        ("Per-battery/month", "Losses (damage/theft)", Some(pb.attrition_cost), "USD"),
        ("Per-battery/month", "Cash contribution", Some(pb.contribution_margin), "USD"),
        ("Per-battery/month", "Economic depreciation", Some(pb.depreciation_economic), "USD"),
        ("Per-battery/month", "Breakeven cycles (capex recovery)", pb.breakeven_cycles, "cycles"),
        (
            "Per-battery/month",
            "Payback months (battery, cash)",
            pb.payback_months_battery.map(f64::from),
            "months",
        ),
        ("Per-hub/month", "Revenue", Some(hub.revenue), "USD"),
        ("Per-hub/month", "EBITDA", Some(hub.ebitda), "USD"),
        ("Per-hub/month", "Payback month", hub.payback_months.map(|m| m as f64), "months"),
        ("Per-hub/month", "IRR (monthly)", hub.irr.rate(), "ratio"),
        ("Per-hub/month", "Capex amortisation", Some(c.hub_capex_amortisation), "USD"),
        ("Fleet", "Monthly EBITDA", Some(c.fleet.ebitda_monthly), "USD"),
        ("Fleet", "NPV (horizon)", Some(c.fleet.npv_horizon), "USD"),
    ];

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Scope", "Metric", "Value", "Unit"])?;
    for (scope, metric, value, unit) in rows {
        wtr.write_record([scope, metric, cell(value).as_str(), unit])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ReportError::CsvFlush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// 입력+결과 스냅샷을 보기 좋은 JSON으로 만든다.
pub fn snapshot_json(snapshot: &Snapshot) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

fn chip(pass: bool) -> &'static str {
    if pass {
        "PASS"
    } else {
        "FAIL"
    }
}

/// CLI에 출력하는 KPI 요약 블록.
pub fn kpi_summary(c: &Computed) -> String {
    let mut out = String::new();
    let pb = &c.per_battery;
    let hub = &c.per_hub;
    let _ = writeln!(out, "-- 배터리 1개 / 월 --");
    let _ = writeln!(
        out,
        "스왑: {:.2}/일 (상한 {:.1}/일, 가동률 {:.1}%), {:.1}/월",
        c.demand.per_day,
        c.demand.cap,
        c.demand.utilization_ratio * 100.0,
        pb.swaps_per_month
    );
    let _ = writeln!(
        out,
        "매출 {:.2}, 수수료 {:.2}, 정비 {:.2}, 손실 {:.2} → 공헌이익 {:.2} USD",
        pb.revenue, pb.commission, pb.servicing, pb.attrition_cost, pb.contribution_margin
    );
    let _ = writeln!(
        out,
        "경제적 감가상각(비현금): {:.2} USD, 손익분기 사이클: {}, 회수: {} 개월",
        pb.depreciation_economic,
        pb.breakeven_cycles
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "∞".to_string()),
        pb.payback_months_battery
            .map(|m| m.to_string())
            .unwrap_or_else(|| "—".to_string())
    );
    let _ = writeln!(out, "-- 허브 / 월 --");
    let _ = writeln!(
        out,
        "매출 {:.2}, 운영비 {:.2}, EBITDA {:.2} USD, 회수 {} 개월",
        hub.revenue,
        hub.opex,
        hub.ebitda,
        months(hub.payback_months)
    );
    let _ = writeln!(
        out,
        "capex 상각: {:.2} USD/월 ({}개월, 비현금)",
        c.hub_capex_amortisation, c.targets.amortisation_months_hub
    );
    let _ = writeln!(
        out,
        "IRR: 월 {} / 연 {}, NPV {}",
        percent(hub.irr.rate()),
        percent(hub.irr_annualized),
        format_money(c.hub_npv)
    );
    let _ = writeln!(out, "-- 함대 ({} 허브) --", c.fleet.hubs);
    let _ = writeln!(
        out,
        "EBITDA {}/월, NPV {}",
        format_money(c.fleet.ebitda_monthly),
        format_money(c.fleet.npv_horizon)
    );
    let _ = writeln!(
        out,
        "[{}] 회수 < {}개월  [{}] 허브 EBITDA > {}  [{}] NPV > 0",
        chip(c.pass_fail.breakeven_under_target),
        c.targets.breakeven_months,
        chip(c.pass_fail.hub_ebitda_gt_target),
        format_money(c.targets.hub_ebitda_usd),
        chip(c.pass_fail.npv_positive)
    );
    out
}

fn percent(v: Option<f64>) -> String {
    v.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "—".to_string())
}

/// 토네이도 결과 표.
pub fn tornado_table(bars: &[TornadoBar]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>12} {:>12} {:>12}", "Lever", "Low", "High", "Δ EBITDA");
    for bar in bars {
        let _ = writeln!(
            out,
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            bar.lever.label(),
            bar.ebitda_low,
            bar.ebitda_high,
            bar.delta
        );
    }
    out
}
