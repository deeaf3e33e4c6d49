/// Result of applying a batch of hunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of inserted text, in post-edit coordinates.
    pub changed: Vec<std::ops::Range<usize>>,
    /// Document version after the batch. One batch is one version step.
    pub version: u64,
}
