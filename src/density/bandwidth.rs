// src/density/bandwidth.rs

//! Bandbreitenwahl für den von Mises–Fisher-Kern.
//!
//! Der Kern zur Bandbreite h ist eine vMF-Dichte mit Konzentration 1/h²:
//! K_h(x, y) = cpk · exp(xᵀy / h²) mit cpk = 1 / (h · (2π)^1.5 · I_{1/2}(1/h²)).

use crate::density::config::{BandwidthMode, CvSearch};
use crate::math::{
    error::*,
    probability::{VonMisesFisher, bessel},
    types::*,
    utils::{constants, numerical},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Ergebnis der Bandbreitenwahl
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandwidthSelection {
    pub bandwidth: f64,
    pub mode: BandwidthMode,
    /// Geschätzte Konzentration (nur Faustregel)
    pub kappa: Option<f64>,
    /// Leave-one-out-Log-Likelihood an der gewählten Bandbreite (nur Kreuzvalidierung)
    pub log_likelihood: Option<f64>,
}

/// Vorberechnete Kerngrößen zu einer Bandbreite: 1/h² und ln(cpk)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct KernelTerms {
    pub concentration: f64,
    pub ln_normalizer: f64,
}

impl KernelTerms {
    /// `Ok(None)`, wenn 1/h² nicht mehr als f64 darstellbar ist.
    pub fn new(bandwidth: f64) -> MathResult<Option<Self>> {
        check_bandwidth(bandwidth)?;
        let concentration = 1.0 / (bandwidth * bandwidth);
        if !concentration.is_finite() {
            return Ok(None);
        }
        Ok(Some(Self {
            concentration,
            ln_normalizer: ln_kernel_normalizer(bandwidth)?,
        }))
    }

    /// ln K_h(x, y) für das Skalarprodukt xᵀy
    #[inline]
    pub fn ln_kernel(&self, cosine: f64) -> f64 {
        cosine * self.concentration + self.ln_normalizer
    }
}

/// ln(cpk), in Log-Form berechnet, damit kleine Bandbreiten nicht überlaufen.
///
/// Schlägt fehl, wenn schon 1/h² überläuft (h unter etwa 1e-154).
pub fn ln_kernel_normalizer(bandwidth: f64) -> MathResult<f64> {
    check_bandwidth(bandwidth)?;
    let concentration = 1.0 / (bandwidth * bandwidth);
    Ok(-bandwidth.ln() - 1.5 * constants::LN_TAU - bessel::ln_bessel_i_half(concentration)?)
}

/// h = ( 8·sinh²κ / ( κ·n·((1+4κ²)·sinh 2κ − 2κ·cosh 2κ) ) )^(1/6)
pub fn rule_of_thumb(kappa: f64, sample_count: usize) -> MathResult<f64> {
    if !kappa.is_finite() || kappa <= 0.0 {
        return Err(MathError::numerical(format!(
            "Rule-of-thumb bandwidth needs a positive finite concentration, got {kappa}"
        )));
    }
    if sample_count == 0 {
        return Err(MathError::InsufficientPoints {
            expected: 1,
            actual: 0,
        });
    }

    let ln_denominator_core = if kappa <= 1.0 {
        let two_k = 2.0 * kappa;
        ((1.0 + 4.0 * kappa * kappa) * two_k.sinh() - two_k * two_k.cosh()).ln()
    } else {
        // sinh(2κ), cosh(2κ) = e^{2κ}/2 · (1 ∓ e^{-4κ})
        let decay = (-4.0 * kappa).exp();
        let bracket =
            (1.0 + 4.0 * kappa * kappa) * (1.0 - decay) - 2.0 * kappa * (1.0 + decay);
        2.0 * kappa - constants::LN_2 + bracket.ln()
    };

    let ln_h6 = 8f64.ln() + 2.0 * numerical::ln_sinh(kappa)
        - kappa.ln()
        - (sample_count as f64).ln()
        - ln_denominator_core;
    let bandwidth = (ln_h6 / 6.0).exp();

    check_bandwidth(bandwidth).map(|_| bandwidth)
}

/// Mittlere Leave-one-out-Log-Likelihood der Kerndichte zur Bandbreite h.
///
/// Die n×n-Kernmatrix wird nie aufgebaut; jede Zeile wird für sich per
/// log-sum-exp reduziert.
pub fn loo_log_likelihood(vectors: &[Point3D], bandwidth: f64) -> MathResult<f64> {
    let n = vectors.len();
    if n < 2 {
        return Err(MathError::InsufficientPoints {
            expected: 2,
            actual: n,
        });
    }

    let ln_cpk = ln_kernel_normalizer(bandwidth)?;
    let inv_h2 = 1.0 / (bandwidth * bandwidth);
    let ln_others = ((n - 1) as f64).ln();

    let row_terms: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|i| {
            let xi = &vectors[i];
            let exponents = vectors
                .iter()
                .enumerate()
                .filter(move |&(j, _)| j != i)
                .map(move |(_, xj)| xi.dot(xj) * inv_h2);
            ln_cpk + numerical::log_sum_exp(exponents) - ln_others
        })
        .collect();

    // Sequentielle Summe hält das Ergebnis unabhängig von der Thread-Aufteilung
    let mean = row_terms.iter().sum::<f64>() / n as f64;
    if mean.is_nan() {
        return Err(MathError::numerical(format!(
            "LOO log-likelihood is NaN at h = {bandwidth}"
        )));
    }
    Ok(mean)
}

/// Bestimmt die Bandbreite gemäß `mode`.
pub fn select_bandwidth(
    vectors: &[Point3D],
    mode: BandwidthMode,
    search: &CvSearch,
) -> MathResult<BandwidthSelection> {
    let selection = match mode {
        BandwidthMode::Fixed(bandwidth) => {
            check_bandwidth(bandwidth)?;
            BandwidthSelection {
                bandwidth,
                mode,
                kappa: None,
                log_likelihood: None,
            }
        }
        BandwidthMode::RuleOfThumb => {
            // κ einmal pro Aufruf, nicht pro Gitterpunkt
            let kappa = VonMisesFisher::fit_vectors(vectors)?.kappa();
            BandwidthSelection {
                bandwidth: rule_of_thumb(kappa, vectors.len())?,
                mode,
                kappa: Some(kappa),
                log_likelihood: None,
            }
        }
        BandwidthMode::CrossValidation => {
            search.validate()?;
            let (bandwidth, log_likelihood) = golden_section_maximize(
                |h| loo_log_likelihood(vectors, h),
                search.lower,
                search.upper,
                search.tolerance,
                search.max_iterations,
            )?;
            BandwidthSelection {
                bandwidth,
                mode,
                kappa: None,
                log_likelihood: Some(log_likelihood),
            }
        }
    };

    debug!(
        bandwidth = selection.bandwidth,
        ?mode,
        kappa = ?selection.kappa,
        "Bandwidth selected"
    );
    Ok(selection)
}

fn check_bandwidth(bandwidth: f64) -> MathResult<()> {
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Err(MathError::invalid_configuration(format!(
            "Bandwidth must be finite and positive, got {bandwidth}"
        )));
    }
    Ok(())
}

/// Goldener Schnitt auf [lower, upper]; liefert (argmax, max).
fn golden_section_maximize<F>(
    objective: F,
    lower: f64,
    upper: f64,
    tolerance: f64,
    max_iterations: usize,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> MathResult<f64>,
{
    let inv_phi = (5f64.sqrt() - 1.0) * 0.5;
    let (mut a, mut b) = (lower, upper);
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = objective(c)?;
    let mut fd = objective(d)?;

    for iteration in 0..max_iterations {
        if (b - a).abs() < tolerance {
            break;
        }
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = objective(c)?;
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = objective(d)?;
        }
        trace!(iteration, a, b, "golden section step");
    }

    let mid = 0.5 * (a + b);
    let f_mid = objective(mid)?;
    let best = [(mid, f_mid), (c, fc), (d, fd)]
        .into_iter()
        .filter(|(_, value)| !value.is_nan())
        .max_by(|x, y| x.1.total_cmp(&y.1))
        .ok_or_else(|| MathError::numerical("Bandwidth search produced only NaN values"))?;
    Ok(best)
}
