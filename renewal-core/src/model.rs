/// A stochastic model that produces case counts at requested times.
///
/// Every simulation starts at time 0 from `initial_count` cases, regardless of
/// whether 0 appears in `times`. Implementations return one count per entry of
/// `times`, in the same order.
pub trait ForwardModel {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Simulates the model and returns counts aligned to `times`.
    ///
    /// # Errors
    ///
    /// Returns an error if `times` is not strictly ascending and non-negative,
    /// or if the model cannot be evaluated.
    fn simulate(&mut self, initial_count: u64, times: &[i64]) -> Result<Vec<u64>, Self::Error>;
}
