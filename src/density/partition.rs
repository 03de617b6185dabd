// src/density/partition.rs

//! Aufteilen und Kombinieren für große Stichproben.
//!
//! Die Stichprobe wird zufällig in k disjunkte Gruppen zerlegt, jede Gruppe
//! auf demselben Gitter ausgewertet und das Ergebnis zellenweise reduziert.
//! Das ist eine Näherung ohne formale Fehlerschranke: die Lage der
//! Dichtemaxima bleibt erhalten, absolute Werte nicht.

use crate::density::{
    estimator::SphericalKde,
    field::{DensityCell, DensityField},
    grid::EvaluationGrid,
};
use crate::math::{
    error::*,
    geometry::sphere::{DirectionalSample, SampleSet},
    probability::SeedConfig,
};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Zellenweiser Reduktionsoperator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineOp {
    Sum,
    Mean,
    /// Erhält Feinstrukturen am besten
    Max,
    Min,
}

impl CombineOp {
    /// Reduziert eine nichtleere Folge von Werten
    pub fn reduce<I>(self, values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (acc, count) = iter.fold((first, 1usize), |(acc, count), v| {
            let acc = match self {
                CombineOp::Sum | CombineOp::Mean => acc + v,
                CombineOp::Max => acc.max(v),
                CombineOp::Min => acc.min(v),
            };
            (acc, count + 1)
        });
        Some(match self {
            CombineOp::Mean => acc / count as f64,
            _ => acc,
        })
    }
}

/// Zerlegt die Stichprobe zufällig in `groups` disjunkte, fast gleich große Teile.
pub fn partition_samples(
    samples: &SampleSet,
    groups: usize,
    seed: SeedConfig,
) -> MathResult<Vec<SampleSet>> {
    if groups == 0 {
        return Err(MathError::invalid_input("Number of groups must be positive"));
    }
    let min_required = groups * SampleSet::MIN_SAMPLES;
    if samples.len() < min_required {
        return Err(MathError::InsufficientPoints {
            expected: min_required,
            actual: samples.len(),
        });
    }

    let mut shuffled: Vec<DirectionalSample> = samples.as_slice().to_vec();
    shuffled.shuffle(&mut seed.rng());

    let base = shuffled.len() / groups;
    let extra = shuffled.len() % groups;
    let mut parts = Vec::with_capacity(groups);
    let mut rest = shuffled.as_slice();
    for g in 0..groups {
        let take = base + usize::from(g < extra);
        let (head, tail) = rest.split_at(take);
        parts.push(SampleSet::new(head.to_vec())?);
        rest = tail;
    }

    debug!(groups, group_size = base, "Samples partitioned");
    Ok(parts)
}

/// Kombiniert zellengleiche Felder; eine in irgendeinem Feld fehlende Zelle fehlt auch im Ergebnis.
pub fn combine_fields(fields: &[DensityField], op: CombineOp) -> MathResult<DensityField> {
    let first = fields
        .first()
        .ok_or_else(|| MathError::invalid_input("Cannot combine an empty list of fields"))?;

    for field in &fields[1..] {
        if field.shape() != first.shape() {
            return Err(MathError::ShapeMismatch {
                expected: first.shape(),
                actual: field.shape(),
            });
        }
        if field.grid() != first.grid() {
            return Err(MathError::invalid_input(
                "Fields must share the same evaluation grid",
            ));
        }
    }

    let cells = (0..first.cells().len())
        .map(|k| {
            let values: Option<Vec<f64>> = fields.iter().map(|f| f.cells()[k].value()).collect();
            match values.and_then(|v| op.reduce(v)) {
                Some(v) => DensityCell::from_raw(v),
                None => DensityCell::Missing,
            }
        })
        .collect();

    let mean_bandwidth =
        fields.iter().map(|f| f.bandwidth()).sum::<f64>() / fields.len() as f64;
    Ok(DensityField::new(first.grid().clone(), cells, mean_bandwidth))
}

impl SphericalKde {
    /// Aufteilen-und-Kombinieren-Schätzung.
    ///
    /// Das Gitter wird einmal aus der gesamten Stichprobe gebildet, damit alle
    /// Gruppenfelder zellengleich sind; die Bandbreite wird pro Gruppe gewählt.
    pub fn estimate_partitioned(
        &self,
        samples: &SampleSet,
        groups: usize,
        op: CombineOp,
        seed: SeedConfig,
    ) -> MathResult<DensityField> {
        let grid: EvaluationGrid = self.evaluation_grid(samples)?;
        let parts = partition_samples(samples, groups, seed)?;

        let fields = parts
            .par_iter()
            .map(|part| self.estimate_on_grid(part, &grid))
            .collect::<MathResult<Vec<_>>>()?;

        let combined = combine_fields(&fields, op)?;
        info!(
            groups,
            ?op,
            samples = samples.len(),
            "Partitioned density combined"
        );
        Ok(combined)
    }
}
