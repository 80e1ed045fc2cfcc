use renewal_core::{GammaPrior, SerialInterval};

use crate::{GammaPosterior, ShapeRate, Window, kernel::inference_offsets};

/// Runs the Poisson-Gamma conjugate update at every inferable offset.
///
/// Returns one posterior per offset in `tau + 2..=strategy.span()`, each
/// computed over the window of `tau + 1` points ending at that offset.
pub fn update<S>(
    strategy: &S,
    serial_interval: &SerialInterval,
    prior: &GammaPrior,
    tau: usize,
) -> Vec<GammaPosterior>
where
    S: ShapeRate + ?Sized,
{
    inference_offsets(strategy.span(), tau)
        .map(|offset| {
            strategy.shape_rate(serial_interval, prior, Window::ending_at(offset, tau))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use renewal_core::IncidenceSeries;

    use crate::{LocalImported, LocalOnly};

    #[test]
    fn posterior_per_inferable_time() {
        let local =
            IncidenceSeries::from_counts(0, [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]).unwrap();
        let si = SerialInterval::new([1.0]).unwrap();
        let prior = GammaPrior::new(1.0, 0.2).unwrap();

        let posteriors = update(&LocalOnly::new(&local), &si, &prior, 2);

        let shapes: Vec<f64> = posteriors.iter().map(|p| p.shape).collect();
        assert_eq!(shapes, vec![11.0, 16.0, 17.0, 18.0]);

        // with a lag-1 kernel the rate is the prior plus the three preceding days
        let expected_rates = [0.2 + 6.0, 0.2 + 10.0, 0.2 + 15.0, 0.2 + 16.0];
        for (posterior, expected) in posteriors.iter().zip(expected_rates) {
            assert_relative_eq!(posterior.rate, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn short_series_has_no_posteriors() {
        let local = IncidenceSeries::from_counts(0, [1.0, 2.0, 3.0]).unwrap();
        let si = SerialInterval::new([1.0]).unwrap();
        let prior = GammaPrior::new(1.0, 1.0).unwrap();

        assert!(update(&LocalOnly::new(&local), &si, &prior, 2).is_empty());
    }

    #[test]
    fn windows_stay_inside_the_imported_series() {
        let local =
            IncidenceSeries::from_counts(0, [3.0, 1.0, 4.0, 1.0, 5.0, 9.0]).unwrap();
        let imported = IncidenceSeries::from_pairs([(1, 2.0), (4, 1.0)])
            .unwrap()
            .reindexed(local.start(), local.end())
            .unwrap();
        let si = SerialInterval::new([1.0, 1.0, 1.0, 1.0]).unwrap();
        let prior = GammaPrior::new(1.0, 0.2).unwrap();
        let strategy = LocalImported::new(&local, &imported, 0.0).unwrap();

        for tau in 0..10 {
            let posteriors = update(&strategy, &si, &prior, tau);
            assert_eq!(posteriors.len(), 5_usize.saturating_sub(tau + 1));
        }
    }
}
