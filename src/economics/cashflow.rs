//! 현금흐름 지표: NPV, IRR, 회수 월, 누적 현금.
//!
//! 현금흐름 배열의 인덱스 0은 초기 투자 시점(0개월)이다.

use serde::{Deserialize, Serialize};

const IRR_GUESS: f64 = 0.02;
const NEWTON_MAX_ITER: usize = 100;
const NEWTON_STEP_TOL: f64 = 1e-6;
const NEWTON_MIN_SLOPE: f64 = 1e-9;
const BISECT_LO: f64 = -0.99;
const BISECT_HI: f64 = 10.0;
const BISECT_MAX_ITER: usize = 200;
const BISECT_NPV_TOL: f64 = 1e-6;

/// 주어진 기간 할인율로 순현재가치를 계산한다.
pub fn npv(cash: &[f64], rate: f64) -> f64 {
    cash.iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + rate).powi(i as i32))
        .sum()
}

/// NPV의 할인율 미분값: Σ -i·cf_i / (1+r)^(i+1).
fn npv_derivative(cash: &[f64], rate: f64) -> f64 {
    cash.iter()
        .enumerate()
        .map(|(i, cf)| -(i as f64) * cf / (1.0 + rate).powi(i as i32 + 1))
        .sum()
}

/// IRR을 찾은 방법.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrrMethod {
    NewtonRaphson,
    Bisection,
}

/// IRR 계산 결과. 근이 없으면 `rate`가 `None`이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrOutcome {
    pub rate: Option<f64>,
    pub method: Option<IrrMethod>,
    /// 사용한 총 반복 횟수(두 단계 합)
    pub iterations: usize,
}

impl IrrOutcome {
    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    pub fn is_defined(&self) -> bool {
        self.rate.is_some()
    }
}

enum NewtonStop {
    Converged(f64, usize),
    GaveUp(usize),
}

fn newton_raphson(cash: &[f64], guess: f64) -> NewtonStop {
    let mut r = guess;
    for iter in 0..NEWTON_MAX_ITER {
        let f = npv(cash, r);
        let d = npv_derivative(cash, r);
        if d.abs() < NEWTON_MIN_SLOPE {
            return NewtonStop::GaveUp(iter);
        }
        let next = r - f / d;
        if !next.is_finite() {
            return NewtonStop::GaveUp(iter + 1);
        }
        if (next - r).abs() < NEWTON_STEP_TOL {
            return NewtonStop::Converged(next, iter + 1);
        }
        r = next;
    }
    NewtonStop::GaveUp(NEWTON_MAX_ITER)
}

/// [-0.99, 10] 구간 이분법. 양 끝의 NPV 부호가 같으면 근이 없다고 본다.
fn bisection(cash: &[f64]) -> (Option<f64>, usize) {
    let (mut lo, mut hi) = (BISECT_LO, BISECT_HI);
    let mut f_lo = npv(cash, lo);
    let f_hi = npv(cash, hi);
    if f_lo * f_hi > 0.0 {
        return (None, 0);
    }
    for iter in 0..BISECT_MAX_ITER {
        let mid = (lo + hi) / 2.0;
        let f_mid = npv(cash, mid);
        if f_mid.abs() < BISECT_NPV_TOL {
            return (Some(mid), iter + 1);
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    (None, BISECT_MAX_ITER)
}

/// 기간 IRR을 계산한다.
///
/// Newton-Raphson(초기값 0.02)으로 먼저 찾고, 기울기가 평탄하거나 발산하거나
/// 반복 한도에 닿으면 이분법으로 넘어간다.
pub fn irr(cash: &[f64]) -> IrrOutcome {
    irr_with_guess(cash, IRR_GUESS)
}

pub fn irr_with_guess(cash: &[f64], guess: f64) -> IrrOutcome {
    let newton_iters = match newton_raphson(cash, guess) {
        NewtonStop::Converged(rate, iterations) => {
            return IrrOutcome {
                rate: Some(rate),
                method: Some(IrrMethod::NewtonRaphson),
                iterations,
            }
        }
        NewtonStop::GaveUp(iters) => iters,
    };
    let (rate, bisect_iters) = bisection(cash);
    IrrOutcome {
        rate,
        method: rate.map(|_| IrrMethod::Bisection),
        iterations: newton_iters + bisect_iters,
    }
}

/// 누적 현금이 처음으로 0 이상이 되는 인덱스(월). 끝까지 음수면 `None`.
pub fn payback_months(cash: &[f64]) -> Option<usize> {
    cumulative(cash).iter().position(|c| *c >= 0.0)
}

/// 누적 합 배열.
pub fn cumulative(cash: &[f64]) -> Vec<f64> {
    cash.iter()
        .scan(0.0, |running, cf| {
            *running += cf;
            Some(*running)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annuity(outflow: f64, inflow: f64, months: usize) -> Vec<f64> {
        std::iter::once(-outflow)
            .chain(std::iter::repeat(inflow).take(months))
            .collect()
    }

    #[test]
    fn npv_at_zero_rate_is_plain_sum() {
        let cash = [-100.0, 30.0, 40.0, 50.0];
        assert!((npv(&cash, 0.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn npv_discounts_from_index_zero() {
        let cash = [-100.0, 110.0];
        assert!(npv(&cash, 0.1).abs() < 1e-12);
    }

    #[test]
    fn irr_zeroes_npv_for_annuity() {
        let cash = annuity(39_000.0, 2_000.0, 36);
        let out = irr(&cash);
        let r = out.rate().expect("defined irr");
        assert!(npv(&cash, r).abs() < 1e-4, "r={r}");
        assert_eq!(out.method, Some(IrrMethod::NewtonRaphson));
    }

    #[test]
    fn irr_simple_two_period() {
        let out = irr(&[-100.0, 110.0]);
        assert!((out.rate().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn irr_undefined_when_no_sign_change() {
        let out = irr(&annuity(100.0, -5.0, 12));
        assert!(!out.is_defined());
        assert_eq!(out.method, None);
        assert!(out.iterations <= NEWTON_MAX_ITER + BISECT_MAX_ITER);
    }

    #[test]
    fn all_zero_flows_fall_through_to_bisection() {
        // 기울기가 0이라 Newton이 중단되고, 이분법은 |NPV|=0에서 즉시 끝난다.
        let out = irr(&[0.0, 0.0, 0.0]);
        assert_eq!(out.method, Some(IrrMethod::Bisection));
        assert!(out.is_defined());
    }

    #[test]
    fn flat_slope_at_guess_hands_over_to_bisection() {
        // NPV'(0.02) = -100/1.02^2 + 102/1.02^3 = 0 이므로 Newton은 첫 단계에서 멈춘다.
        // 구간 [-0.99, 10] 안의 근은 x = 1/(1+r), 51x^2 - 100x + 5 = 0 의 큰 근 하나뿐이다.
        let cash = [-5.0, 100.0, -51.0];
        let out = irr(&cash);
        assert_eq!(out.method, Some(IrrMethod::Bisection));
        let r = out.rate().expect("sign change inside the bracket");
        assert!((r - (-0.476_286)).abs() < 1e-4, "r={r}");
        assert!(npv(&cash, r).abs() < BISECT_NPV_TOL);
        assert!(out.iterations > 0);
    }

    #[test]
    fn non_finite_newton_step_hands_over_to_bisection() {
        // r = -1 에서는 할인 계수가 0으로 나뉘어 다음 단계가 NaN이 된다.
        let cash = [-100.0, 110.0];
        let out = irr_with_guess(&cash, -1.0);
        assert_eq!(out.method, Some(IrrMethod::Bisection));
        let r = out.rate().expect("root at 10%");
        assert!((r - 0.1).abs() < 1e-6, "r={r}");
        assert!(npv(&cash, r).abs() < BISECT_NPV_TOL);
    }

    #[test]
    fn bisection_gives_up_after_iteration_budget() {
        // NaN 현금흐름은 부호 검사를 통과하지만 |NPV| 허용오차에 끝내 닿지 못한다.
        let cash = [-100.0, f64::NAN, 50.0];
        assert_eq!(bisection(&cash), (None, BISECT_MAX_ITER));
        let out = irr(&cash);
        assert!(!out.is_defined());
        assert_eq!(out.method, None);
        // Newton 1회(NaN 단계에서 중단) + 이분법 전체 예산
        assert_eq!(out.iterations, 1 + BISECT_MAX_ITER);
    }

    #[test]
    fn payback_is_first_non_negative_cumulative_index() {
        assert_eq!(payback_months(&[-100.0, 40.0, 40.0, 20.0, 10.0]), Some(3));
        assert_eq!(payback_months(&[0.0, -1.0]), Some(0));
        assert_eq!(payback_months(&[-100.0, 10.0, 10.0]), None);
        assert_eq!(payback_months(&[]), None);
    }

    #[test]
    fn cumulative_running_sum() {
        assert_eq!(cumulative(&[-5.0, 2.0, 2.0, 2.0]), vec![-5.0, -3.0, -1.0, 1.0]);
    }
}
