/// Source of the randomness used by enrichment and failure generation.
///
/// Kept behind a trait so tests can script outcomes and runs can be replayed from a seed.
pub trait RandomSource: Send {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}
