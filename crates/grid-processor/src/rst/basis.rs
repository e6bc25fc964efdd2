//! Radial basis function of the completely regularized spline with tension.
//!
//! `R(ρ) = -(E1(ρ) + ln ρ + γ)` where `E1` is the exponential integral and
//! `γ` the Euler–Mascheroni constant. `R(0) = 0` and `R` decreases without
//! bound, roughly like `-ln ρ`, for large `ρ`.

/// Euler–Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

const EPS: f64 = 1e-15;
const FPMIN: f64 = 1e-300;
const MAX_ITER: usize = 200;

/// Below this argument the power series is used, above it the continued
/// fraction.
const SERIES_LIMIT: f64 = 1.0;

/// Exponential integral `E1(x)` for `x > 0`.
///
/// Returns `+inf` at zero and `NaN` for negative input.
pub fn exp_integral_e1(x: f64) -> f64 {
    if x.is_nan() || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return f64::INFINITY;
    }
    if x <= SERIES_LIMIT {
        -EULER_GAMMA - x.ln() - ein_series(x)
    } else {
        e1_continued_fraction(x)
    }
}

/// Basis value for a scaled squared distance `ρ`.
pub fn rst_basis(rho: f64) -> f64 {
    if rho <= 0.0 {
        return 0.0;
    }
    if rho <= SERIES_LIMIT {
        // E1 + ln ρ + γ = -Σ (-ρ)^k / (k·k!), so R is the series itself
        // and no cancellation occurs near zero.
        ein_series(rho)
    } else {
        -(e1_continued_fraction(rho) + rho.ln() + EULER_GAMMA)
    }
}

/// `Σ_{k≥1} (-x)^k / (k·k!)`.
fn ein_series(x: f64) -> f64 {
    let mut term = 1.0; // (-x)^k / k!
    let mut sum = 0.0;
    for k in 1..=MAX_ITER {
        term *= -x / k as f64;
        let add = term / k as f64;
        sum += add;
        if add.abs() < EPS * sum.abs().max(FPMIN) {
            break;
        }
    }
    sum
}

/// Modified Lentz evaluation of the continued fraction for `E1(x)`.
fn e1_continued_fraction(x: f64) -> f64 {
    let mut b = x + 1.0;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=MAX_ITER {
        let a = -((i * i) as f64);
        b += 2.0;
        d = 1.0 / (a * d + b);
        c = b + a / c;
        let del = c * d;
        h *= del;
        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h * (-x).exp()
}
