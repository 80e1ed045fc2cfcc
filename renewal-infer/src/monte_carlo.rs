use ndarray::{Array2, ArrayView1, Axis};
use rand::Rng;
use rand_distr::Distribution;
use renewal_core::{GammaPrior, SerialInterval, ValidationError};
use tracing::trace;

use crate::{ShapeRate, conjugate};

/// Posterior draws pooled across serial interval candidates.
///
/// Rows are draws and columns are inference times. Every candidate contributes
/// the same number of rows, so candidates carry equal weight in the pool.
/// Draws are stored as `f32` to bound memory over
/// candidates × samples × times.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePool {
    samples: Array2<f32>,
}

impl SamplePool {
    /// Number of pooled draws per time.
    #[must_use]
    pub fn num_draws(&self) -> usize {
        self.samples.nrows()
    }

    /// Number of inference times.
    #[must_use]
    pub fn num_times(&self) -> usize {
        self.samples.ncols()
    }

    /// Draws for the time at `index`.
    #[must_use]
    pub fn draws_at(&self, index: usize) -> ArrayView1<'_, f32> {
        self.samples.column(index)
    }

    /// Empirical mean at every time.
    #[must_use]
    pub fn means(&self) -> Vec<f64> {
        self.samples.axis_iter(Axis(1)).map(mean).collect()
    }

    /// Percentiles `q_low` and `q_high` (both in `[0, 1]`) at every time,
    /// interpolating linearly between order statistics.
    #[must_use]
    pub fn percentiles(&self, q_low: f64, q_high: f64) -> Vec<(f64, f64)> {
        self.samples
            .axis_iter(Axis(1))
            .map(|draws| {
                let mut sorted: Vec<f64> = draws.iter().map(|&x| f64::from(x)).collect();
                sorted.sort_by(f64::total_cmp);
                (percentile(&sorted, q_low), percentile(&sorted, q_high))
            })
            .collect()
    }
}

/// Runs the conjugate update once per candidate and pools `num_samples` draws
/// per candidate and time.
///
/// # Errors
///
/// Returns [`ValidationError::NoSerialIntervalCandidates`] if `candidates` is
/// empty, or another [`ValidationError`] if a posterior cannot be sampled.
pub fn pool<S, R>(
    strategy: &S,
    candidates: &[SerialInterval],
    prior: &GammaPrior,
    tau: usize,
    num_samples: usize,
    rng: &mut R,
) -> Result<SamplePool, ValidationError>
where
    S: ShapeRate + ?Sized,
    R: Rng + ?Sized,
{
    let Some(first) = candidates.first() else {
        return Err(ValidationError::NoSerialIntervalCandidates);
    };
    let num_times = conjugate::update(strategy, first, prior, tau).len();
    let mut samples = Array2::<f32>::zeros((candidates.len() * num_samples, num_times));

    for (index, (serial_interval, mut rows)) in candidates
        .iter()
        .zip(samples.axis_chunks_iter_mut(Axis(0), num_samples.max(1)))
        .enumerate()
    {
        let samplers = conjugate::update(strategy, serial_interval, prior, tau)
            .iter()
            .map(|posterior| posterior.sampler())
            .collect::<Result<Vec<_>, _>>()?;

        for mut row in rows.rows_mut() {
            for (cell, sampler) in row.iter_mut().zip(&samplers) {
                #[allow(clippy::cast_possible_truncation)]
                let draw = sampler.sample(rng) as f32;
                *cell = draw;
            }
        }

        trace!(
            candidate = index,
            draws = num_samples,
            times = num_times,
            "pooled candidate"
        );
    }

    Ok(SamplePool { samples })
}

#[allow(clippy::cast_precision_loss)]
fn mean(draws: ArrayView1<'_, f32>) -> f64 {
    draws.iter().map(|&x| f64::from(x)).sum::<f64>() / draws.len() as f64
}

/// Percentile of sorted data at fraction `q`, matching the usual linear
/// interpolation between the two nearest ranks.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let Some(&last) = sorted.last() else {
        return f64::NAN;
    };
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    if above >= sorted.len() {
        return last;
    }
    let fraction = rank - rank.floor();
    sorted[below] + (sorted[above] - sorted[below]) * fraction
}
