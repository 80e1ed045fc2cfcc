use std::collections::BTreeMap;

use crate::ValidationError;

/// Daily case counts over a contiguous range of integer times.
///
/// Raw observations may skip days; any time between the first and last
/// observation that has no count is stored as zero. After construction the
/// series is dense: the count for `start() + k` lives at `counts()[k]`.
///
/// # Examples
///
/// ```
/// use renewal_core::IncidenceSeries;
///
/// let series = IncidenceSeries::from_pairs([(1, 10.0), (2, 3.0), (5, 6.0)]).unwrap();
///
/// assert_eq!(series.start(), 1);
/// assert_eq!(series.end(), 5);
/// assert_eq!(series.counts(), &[10.0, 3.0, 0.0, 0.0, 6.0]);
/// assert_eq!(series.count_at(4), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<(i64, f64)>", into = "Vec<(i64, f64)>")
)]
pub struct IncidenceSeries {
    start: i64,
    counts: Vec<f64>,
}

impl IncidenceSeries {
    /// Builds a series from `(time, count)` observations in any order.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if there are no observations, a time
    /// repeats, or a count is negative or non-finite.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let mut observed = BTreeMap::new();
        for (time, count) in pairs {
            if !count.is_finite() || count < 0.0 {
                return Err(ValidationError::InvalidCount { time, count });
            }
            if observed.insert(time, count).is_some() {
                return Err(ValidationError::DuplicateTime { time });
            }
        }

        let (Some((&start, _)), Some((&end, _))) =
            (observed.first_key_value(), observed.last_key_value())
        else {
            return Err(ValidationError::EmptyIncidence);
        };

        let counts = (start..=end)
            .map(|time| observed.get(&time).copied().unwrap_or(0.0))
            .collect();

        Ok(Self { start, counts })
    }

    /// Builds a series from a time column and a parallel count column.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ColumnLengthMismatch`] if the columns differ
    /// in length, otherwise fails like [`IncidenceSeries::from_pairs`].
    pub fn from_columns(times: &[i64], counts: &[f64]) -> Result<Self, ValidationError> {
        if times.len() != counts.len() {
            return Err(ValidationError::ColumnLengthMismatch {
                times: times.len(),
                counts: counts.len(),
            });
        }
        Self::from_pairs(times.iter().copied().zip(counts.iter().copied()))
    }

    /// Builds a contiguous series whose first count is at `start`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `counts` is empty or holds a negative
    /// or non-finite value.
    pub fn from_counts<I>(start: i64, counts: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = f64>,
    {
        let counts: Vec<f64> = counts.into_iter().collect();
        if counts.is_empty() {
            return Err(ValidationError::EmptyIncidence);
        }
        if let Some((time, &count)) = (start..)
            .zip(&counts)
            .find(|(_, c)| !c.is_finite() || **c < 0.0)
        {
            return Err(ValidationError::InvalidCount { time, count });
        }
        Ok(Self { start, counts })
    }

    /// Re-expresses this series over `start..=end`.
    ///
    /// Times outside the current range are filled with zero and observations
    /// outside the new range are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeBounds`] if `start > end`.
    pub fn reindexed(&self, start: i64, end: i64) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidTimeBounds { start, end });
        }
        let counts = (start..=end).map(|time| self.count_at(time)).collect();
        Ok(Self { start, counts })
    }

    /// Returns the first time in the series.
    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Returns the last time in the series.
    #[must_use]
    pub fn end(&self) -> i64 {
        self.start + self.last_offset()
    }

    /// Returns `end() - start()`.
    #[must_use]
    pub fn span(&self) -> usize {
        self.counts.len() - 1
    }

    /// Returns the number of time points, including zero-filled ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always `false`: a series holds at least one time point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the dense counts, first time first.
    #[must_use]
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Returns the count at `time`, or zero outside the series.
    #[must_use]
    pub fn count_at(&self, time: i64) -> f64 {
        time.checked_sub(self.start)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|offset| self.counts.get(offset))
            .copied()
            .unwrap_or(0.0)
    }

    /// Iterates over `(time, count)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        (self.start..).zip(self.counts.iter().copied())
    }

    /// Returns the time at a zero-based `offset` from the start.
    #[must_use]
    pub fn time_at(&self, offset: usize) -> i64 {
        self.start + to_time(offset)
    }

    fn last_offset(&self) -> i64 {
        to_time(self.span())
    }
}

fn to_time(offset: usize) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

impl TryFrom<Vec<(i64, f64)>> for IncidenceSeries {
    type Error = ValidationError;

    fn try_from(pairs: Vec<(i64, f64)>) -> Result<Self, Self::Error> {
        Self::from_pairs(pairs)
    }
}

impl From<IncidenceSeries> for Vec<(i64, f64)> {
    fn from(series: IncidenceSeries) -> Self {
        series.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_gaps_with_zero() {
        let series =
            IncidenceSeries::from_pairs([(1, 10.0), (2, 3.0), (3, 4.0), (5, 6.0), (6, 9.0)])
                .unwrap();

        assert_eq!(series.start(), 1);
        assert_eq!(series.end(), 6);
        assert_eq!(series.span(), 5);
        assert_eq!(series.len(), 6);
        assert_eq!(series.counts(), &[10.0, 3.0, 4.0, 0.0, 6.0, 9.0]);
    }

    #[test]
    fn sorts_unordered_observations() {
        let series =
            IncidenceSeries::from_pairs([(3, 1.0), (1, 2.0), (2, 5.0)]).unwrap();

        assert_eq!(series.counts(), &[2.0, 5.0, 1.0]);
        assert_eq!(
            series.iter().collect::<Vec<_>>(),
            vec![(1, 2.0), (2, 5.0), (3, 1.0)]
        );
    }

    #[test]
    fn handles_negative_times() {
        let series = IncidenceSeries::from_pairs([(-2, 1.0), (0, 3.0)]).unwrap();

        assert_eq!(series.start(), -2);
        assert_eq!(series.end(), 0);
        assert_eq!(series.count_at(-1), 0.0);
        assert_eq!(series.count_at(0), 3.0);
        assert_eq!(series.time_at(2), 0);
    }

    #[test]
    fn single_point_has_zero_span() {
        let series = IncidenceSeries::from_pairs([(7, 2.0)]).unwrap();

        assert_eq!(series.span(), 0);
        assert_eq!(series.start(), series.end());
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            IncidenceSeries::from_pairs(Vec::new()),
            Err(ValidationError::EmptyIncidence)
        );
        assert_eq!(
            IncidenceSeries::from_pairs([(1, 2.0), (1, 3.0)]),
            Err(ValidationError::DuplicateTime { time: 1 })
        );
        assert!(matches!(
            IncidenceSeries::from_pairs([(1, -2.0)]),
            Err(ValidationError::InvalidCount { time: 1, .. })
        ));
        assert!(matches!(
            IncidenceSeries::from_pairs([(4, f64::NAN)]),
            Err(ValidationError::InvalidCount { time: 4, .. })
        ));
    }

    #[test]
    fn rejects_malformed_columns() {
        assert_eq!(
            IncidenceSeries::from_columns(&[0, 1, 2], &[1.0, 2.0]),
            Err(ValidationError::ColumnLengthMismatch {
                times: 3,
                counts: 2
            })
        );
    }

    #[test]
    fn from_counts_starts_at_given_time() {
        let series = IncidenceSeries::from_counts(10, [1.0, 0.0, 4.0]).unwrap();

        assert_eq!(series.start(), 10);
        assert_eq!(series.end(), 12);
        assert!(matches!(
            IncidenceSeries::from_counts(10, [1.0, -1.0]),
            Err(ValidationError::InvalidCount { time: 11, .. })
        ));
        assert_eq!(
            IncidenceSeries::from_counts(0, Vec::new()),
            Err(ValidationError::EmptyIncidence)
        );
    }

    #[test]
    fn reindexed_pads_and_truncates() {
        let imported =
            IncidenceSeries::from_pairs([(2, 5.0), (3, 1.0), (9, 7.0)]).unwrap();

        let aligned = imported.reindexed(0, 4).unwrap();

        assert_eq!(aligned.start(), 0);
        assert_eq!(aligned.counts(), &[0.0, 0.0, 5.0, 1.0, 0.0]);
        assert!(imported.reindexed(4, 0).is_err());
    }
}
