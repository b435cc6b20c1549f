//! Intermediate products of one pipeline run.

/// Verbatim speech-to-text output for one candidate. Owned by the pipeline
/// invocation that produced it; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
}

/// Structured summary derived from a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Short headline, first line of the model response
    pub headline: String,

    /// Bulleted elaboration, the remaining lines of the response
    pub body: String,
}
