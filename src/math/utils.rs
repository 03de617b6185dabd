// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f64 = 1e-10;
    pub const PI: f64 = std::f64::consts::PI;
    pub const TAU: f64 = std::f64::consts::TAU;
    pub const LN_2: f64 = std::f64::consts::LN_2;
    /// ln(2π)
    pub const LN_TAU: f64 = 1.837_877_066_409_345_5;
}

/// Vergleichsfunktionen mit Toleranz
pub mod comparison {
    use super::constants::EPSILON;

    /// Prüft ob Float (nahezu) Null ist
    pub fn nearly_zero(a: f64) -> bool {
        a.abs() < EPSILON
    }
}

/// Winkel-Hilfsfunktionen (Grad-basiert)
pub mod angles {
    /// Normalisiert einen Winkel in Grad auf [0, 360)
    pub fn normalize_degrees(angle: f64) -> f64 {
        let result = angle.rem_euclid(360.0);
        // rem_euclid kann für winzige negative Werte exakt 360.0 liefern
        if result >= 360.0 { 0.0 } else { result }
    }
}

/// Numerische Hilfsfunktionen
pub mod numerical {
    /// `count` gleichmäßig verteilte Werte von `start` bis `end`, beide Endpunkte exakt enthalten.
    pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f64;
                let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
                values[count - 1] = end;
                values
            }
        }
    }

    /// Numerisch stabiles ln(Σ exp(x_i)).
    pub fn log_sum_exp<I>(values: I) -> f64
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let iter = values.into_iter();
        let max = iter.clone().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return max;
        }
        max + iter.map(|v| (v - max).exp()).sum::<f64>().ln()
    }

    /// ln(sinh(x)) für x > 0 ohne Überlauf bei großen Argumenten.
    pub fn ln_sinh(x: f64) -> f64 {
        if x > 20.0 {
            x - super::constants::LN_2 + (-(-2.0 * x).exp()).ln_1p()
        } else {
            x.sinh().ln()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linspace_hits_both_endpoints() {
        let values = numerical::linspace(0.0, 180.0, 50);
        assert_eq!(values.len(), 50);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[49], 180.0);
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(numerical::linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(numerical::linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn test_log_sum_exp_matches_naive_sum() {
        let values = [0.5, -1.0, 2.0];
        let naive: f64 = values.iter().map(|v: &f64| v.exp()).sum::<f64>().ln();
        assert_abs_diff_eq!(
            numerical::log_sum_exp(values.iter().copied()),
            naive,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_log_sum_exp_large_arguments() {
        let result = numerical::log_sum_exp([1000.0, 1000.0]);
        assert_abs_diff_eq!(result, 1000.0 + constants::LN_2, epsilon = 1e-9);
    }

    #[test]
    fn test_ln_sinh_branches_agree() {
        let x: f64 = 20.0;
        let direct = x.sinh().ln();
        assert_abs_diff_eq!(numerical::ln_sinh(20.000_001), direct, epsilon = 1e-5);
        assert!(numerical::ln_sinh(800.0).is_finite());
    }

    #[test]
    fn test_normalize_degrees() {
        assert_abs_diff_eq!(angles::normalize_degrees(-90.0), 270.0, epsilon = 1e-10);
        assert_abs_diff_eq!(angles::normalize_degrees(720.0), 0.0, epsilon = 1e-10);
        assert_eq!(angles::normalize_degrees(-1e-20), 0.0);
    }

    #[test]
    fn test_nearly_zero() {
        assert!(comparison::nearly_zero(1e-12));
        assert!(!comparison::nearly_zero(1e-6));
    }
}
