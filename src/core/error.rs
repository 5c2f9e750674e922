/// Typed failures of the pure pipeline.
///
/// Network and decoding failures stay in [`anyhow::Error`],
/// these are the ones callers may want to match on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("malformed date `{0}`: expected 7 or 8 digits")]
    MalformedDate(String),

    #[error("market share counts sum up to zero")]
    EmptyDenominator,
}
