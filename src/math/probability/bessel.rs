// src/math/probability/bessel.rs

//! Modifizierte Bessel-Funktionen erster Art für halbzahlige Ordnungen.
//!
//! Für ν = 1/2, 3/2 existieren geschlossene Formen über sinh/cosh; mehr braucht
//! die von Mises–Fisher-Verteilung auf S² nicht.

use crate::math::{error::*, utils::*};

fn check_argument(x: f64, operation: &str) -> MathResult<()> {
    if !x.is_finite() || x <= 0.0 {
        return Err(MathError::numerical(format!(
            "{operation}: argument must be positive and finite, got {x}"
        )));
    }
    Ok(())
}

/// I_{1/2}(x) = sqrt(2 / (πx)) · sinh(x)
pub fn bessel_i_half(x: f64) -> MathResult<f64> {
    check_argument(x, "bessel_i_half")?;
    Ok((2.0 / (constants::PI * x)).sqrt() * x.sinh())
}

/// I_{3/2}(x) = sqrt(2 / (πx)) · (cosh(x) − sinh(x)/x)
pub fn bessel_i_three_halves(x: f64) -> MathResult<f64> {
    check_argument(x, "bessel_i_three_halves")?;
    Ok((2.0 / (constants::PI * x)).sqrt() * (x.cosh() - x.sinh() / x))
}

/// ln I_{1/2}(x), überlauffrei auch für große x (kleine Bandbreiten).
pub fn ln_bessel_i_half(x: f64) -> MathResult<f64> {
    check_argument(x, "ln_bessel_i_half")?;
    Ok(0.5 * (2.0 / (constants::PI * x)).ln() + numerical::ln_sinh(x))
}

/// A₃(κ) = I_{3/2}(κ) / I_{1/2}(κ) = coth(κ) − 1/κ
///
/// Mittlere resultierende Länge einer vMF-Verteilung auf S².
pub fn mean_resultant_length(kappa: f64) -> f64 {
    if kappa < 1e-4 {
        // Reihenentwicklung, vermeidet Auslöschung
        let k2 = kappa * kappa;
        kappa / 3.0 - kappa * k2 / 45.0
    } else {
        1.0 / kappa.tanh() - 1.0 / kappa
    }
}

/// Ableitung dA₃/dκ = 1 − A₃² − 2·A₃/κ
pub fn mean_resultant_length_derivative(kappa: f64) -> f64 {
    if kappa < 1e-4 {
        1.0 / 3.0 - kappa * kappa / 15.0
    } else {
        let a = mean_resultant_length(kappa);
        1.0 - a * a - 2.0 * a / kappa
    }
}
