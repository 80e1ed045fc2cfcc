use renewal_core::{GammaPrior, IncidenceSeries, SerialInterval, ValidationError};
use tracing::{debug, instrument};

use crate::{
    CredibleIntervalRow, Error, InferenceResult, LocalImported, LocalOnly, Posterior, Sampling,
    ShapeRate, StateError, conjugate, kernel::inference_offsets, monte_carlo,
};

/// Serial interval knowledge held by an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SerialIntervals {
    /// One known serial interval; the posterior is closed-form.
    Single(SerialInterval),
    /// Several plausible serial intervals of equal length; the posterior is
    /// pooled over Monte Carlo draws under each.
    Candidates(SerialIntervalCandidates),
}

impl SerialIntervals {
    /// Collects candidate serial intervals.
    ///
    /// # Errors
    ///
    /// Fails like [`SerialIntervalCandidates::new`].
    pub fn candidates<I>(candidates: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = SerialInterval>,
    {
        SerialIntervalCandidates::new(candidates).map(Self::Candidates)
    }

    #[must_use]
    pub fn mode(&self) -> SerialIntervalMode {
        match self {
            Self::Single(_) => SerialIntervalMode::Single,
            Self::Candidates(_) => SerialIntervalMode::Multiple,
        }
    }
}

impl From<SerialInterval> for SerialIntervals {
    fn from(serial_interval: SerialInterval) -> Self {
        Self::Single(serial_interval)
    }
}

impl From<SerialIntervalCandidates> for SerialIntervals {
    fn from(candidates: SerialIntervalCandidates) -> Self {
        Self::Candidates(candidates)
    }
}

/// A non-empty collection of serial intervals sharing one length.
///
/// The only way to build one is [`SerialIntervalCandidates::new`]:
///
/// ```compile_fail
/// use renewal_infer::SerialIntervalCandidates;
///
/// let unchecked = SerialIntervalCandidates(Vec::new());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SerialIntervalCandidates(Vec<SerialInterval>);

impl SerialIntervalCandidates {
    /// Validates and collects candidate serial intervals.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoSerialIntervalCandidates`] if there are
    /// none, or [`ValidationError::SerialIntervalShapeMismatch`] if their
    /// lengths differ.
    pub fn new<I>(candidates: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = SerialInterval>,
    {
        let candidates: Vec<SerialInterval> = candidates.into_iter().collect();
        let Some(first) = candidates.first() else {
            return Err(ValidationError::NoSerialIntervalCandidates);
        };
        let expected = first.max_lag();
        if let Some(mismatch) = candidates.iter().find(|si| si.max_lag() != expected) {
            return Err(ValidationError::SerialIntervalShapeMismatch {
                expected,
                found: mismatch.max_lag(),
            });
        }
        Ok(Self(candidates))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SerialInterval] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: there is at least one candidate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialIntervalMode {
    Single,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    LocalOnly,
    LocalImported,
}

/// The engine's configuration along both variant dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub serial_intervals: SerialIntervalMode,
    pub cases: CaseMode,
}

/// Imported cases aligned to the local series.
#[derive(Debug, Clone, PartialEq)]
struct Imported {
    series: IncidenceSeries,
    epsilon: f64,
}

/// Sliding-window Bayesian estimator of the time-varying reproduction number.
///
/// For each inferable time `t` the reproduction number is assumed constant
/// over the window `[t - tau, t]`. Observed cases in the window are Poisson
/// with mean `R · Λ`, where `Λ` is the serial-interval-weighted infectious
/// pressure, so a Gamma prior yields a Gamma posterior with
/// `shape = α + Σ cases` and `rate = β + Σ Λ`.
///
/// One engine covers four variants:
///
/// - a single serial interval gives a closed-form posterior, while several
///   [`SerialIntervals::Candidates`] give draws pooled over all of them;
/// - cases are either all local, or split into local and imported cases
///   (see [`PosteriorEngine::with_imported`]).
///
/// [`PosteriorEngine::run_inference`] replaces any previous result wholesale.
///
/// # Examples
///
/// ```
/// use renewal_core::{GammaPrior, IncidenceSeries, SerialInterval};
/// use renewal_infer::PosteriorEngine;
///
/// let cases = IncidenceSeries::from_counts(0, [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]).unwrap();
/// let si = SerialInterval::new([1.0, 2.0, 1.0]).unwrap();
/// let prior = GammaPrior::new(1.0, 0.2).unwrap();
///
/// let mut engine = PosteriorEngine::new(cases, si, prior);
/// let result = engine.run_inference(2).unwrap();
/// assert_eq!(result.times(), &[4, 5, 6, 7]);
///
/// let rows = engine.get_intervals(0.95).unwrap();
/// assert!(rows.iter().all(|row| row.lower <= row.mean && row.mean <= row.upper));
/// ```
#[derive(Debug, Clone)]
pub struct PosteriorEngine {
    incidence: IncidenceSeries,
    serial_intervals: SerialIntervals,
    prior: GammaPrior,
    imported: Option<Imported>,
    sampling: Sampling,
    latest: Option<InferenceResult>,
}

impl PosteriorEngine {
    /// Creates a local-only engine.
    pub fn new(
        incidence: IncidenceSeries,
        serial_intervals: impl Into<SerialIntervals>,
        prior: GammaPrior,
    ) -> Self {
        Self {
            incidence,
            serial_intervals: serial_intervals.into(),
            prior,
            imported: None,
            sampling: Sampling::default(),
            latest: None,
        }
    }

    /// Adds imported cases whose reproduction number is `(1 + epsilon)` times
    /// the local one.
    ///
    /// The imported series is reindexed onto the local series' time range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EpsilonOutOfRange`] if `epsilon` is below -1
    /// or not finite.
    pub fn with_imported(
        mut self,
        imported: &IncidenceSeries,
        epsilon: f64,
    ) -> Result<Self, ValidationError> {
        let epsilon = validate_epsilon(epsilon)?;
        let series = imported.reindexed(self.incidence.start(), self.incidence.end())?;
        self.imported = Some(Imported { series, epsilon });
        self.latest = None;
        Ok(self)
    }

    /// Replaces the Monte Carlo settings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidConfig`] if the settings are invalid.
    pub fn with_sampling(mut self, sampling: Sampling) -> Result<Self, ValidationError> {
        self.set_sampling(sampling)?;
        Ok(self)
    }

    /// Returns which serial interval and case modes the engine runs in.
    #[must_use]
    pub fn variant(&self) -> Variant {
        Variant {
            serial_intervals: self.serial_intervals.mode(),
            cases: if self.imported.is_some() {
                CaseMode::LocalImported
            } else {
                CaseMode::LocalOnly
            },
        }
    }

    #[must_use]
    pub fn incidence(&self) -> &IncidenceSeries {
        &self.incidence
    }

    /// Imported cases aligned to the local series, if any.
    #[must_use]
    pub fn imported(&self) -> Option<&IncidenceSeries> {
        self.imported.as_ref().map(|imported| &imported.series)
    }

    #[must_use]
    pub fn epsilon(&self) -> Option<f64> {
        self.imported.as_ref().map(|imported| imported.epsilon)
    }

    /// Updates the ratio between imported and local reproduction numbers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoImportedCases`] for a local-only engine and
    /// [`ValidationError::EpsilonOutOfRange`] if `epsilon` is below -1 or not
    /// finite.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<(), ValidationError> {
        let epsilon = validate_epsilon(epsilon)?;
        let imported = self
            .imported
            .as_mut()
            .ok_or(ValidationError::NoImportedCases)?;
        imported.epsilon = epsilon;
        Ok(())
    }

    #[must_use]
    pub fn serial_intervals(&self) -> &SerialIntervals {
        &self.serial_intervals
    }

    /// Replaces the serial interval knowledge, which may switch the engine
    /// between single and multiple serial interval mode.
    pub fn set_serial_intervals(&mut self, serial_intervals: impl Into<SerialIntervals>) {
        self.serial_intervals = serial_intervals.into();
    }

    #[must_use]
    pub fn prior(&self) -> &GammaPrior {
        &self.prior
    }

    pub fn set_prior(&mut self, prior: GammaPrior) {
        self.prior = prior;
    }

    #[must_use]
    pub fn sampling(&self) -> &Sampling {
        &self.sampling
    }

    /// Replaces the Monte Carlo settings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidConfig`] if the settings are invalid,
    /// leaving the current settings in place.
    pub fn set_sampling(&mut self, sampling: Sampling) -> Result<(), ValidationError> {
        sampling
            .validate()
            .map_err(|reason| ValidationError::InvalidConfig { reason })?;
        self.sampling = sampling;
        Ok(())
    }

    /// Infers the reproduction number with a sliding window of `tau + 1`
    /// points.
    ///
    /// Inference times run from `start + tau + 2` to the end of the series.
    /// The result replaces any earlier one and is also returned.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TauOutOfRange`] unless `1 <= tau <= span`.
    #[instrument(level = "debug", skip(self))]
    pub fn run_inference(&mut self, tau: usize) -> Result<&InferenceResult, Error> {
        let span = self.incidence.span();
        if tau == 0 || tau > span {
            return Err(ValidationError::TauOutOfRange { tau, span }.into());
        }

        let strategy: Box<dyn ShapeRate + '_> = match &self.imported {
            None => Box::new(LocalOnly::new(&self.incidence)),
            Some(imported) => Box::new(LocalImported::new(
                &self.incidence,
                &imported.series,
                imported.epsilon,
            )?),
        };

        let posterior = match &self.serial_intervals {
            SerialIntervals::Single(serial_interval) => Posterior::ClosedForm(
                conjugate::update(strategy.as_ref(), serial_interval, &self.prior, tau),
            ),
            SerialIntervals::Candidates(candidates) => {
                Posterior::Empirical(monte_carlo::pool(
                    strategy.as_ref(),
                    candidates.as_slice(),
                    &self.prior,
                    tau,
                    self.sampling.num_samples,
                    &mut self.sampling.rng(),
                )?)
            }
        };

        let times: Vec<i64> = inference_offsets(span, tau)
            .map(|offset| self.incidence.time_at(offset))
            .collect();

        debug!(
            variant = ?self.variant(),
            times = times.len(),
            "inferred reproduction number"
        );

        Ok(self.latest.insert(InferenceResult::new(tau, times, posterior)))
    }

    /// Result of the most recent inference run, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&InferenceResult> {
        self.latest.as_ref()
    }

    /// Summarizes the most recent inference run.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotInferred`] before the first
    /// [`run_inference`](Self::run_inference), and
    /// [`ValidationError::CentralProbabilityOutOfRange`] unless
    /// `central_probability` lies strictly between 0 and 1.
    pub fn get_intervals(
        &self,
        central_probability: f64,
    ) -> Result<Vec<CredibleIntervalRow>, Error> {
        let result = self.latest.as_ref().ok_or(StateError::NotInferred)?;
        Ok(result.intervals(central_probability)?)
    }
}

fn validate_epsilon(epsilon: f64) -> Result<f64, ValidationError> {
    if epsilon.is_finite() && epsilon >= -1.0 {
        Ok(epsilon)
    } else {
        Err(ValidationError::EpsilonOutOfRange { epsilon })
    }
}
