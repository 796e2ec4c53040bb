use crate::units::Pt;
use thiserror::Error;

/// Errors raised while preparing a layout run: configuration and font loading.
///
/// The pagination pass itself has no error path; see [crate::paginate].
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// The page setup was not valid JSON or did not match the expected shape
    Json(#[from] serde_json::Error),

    #[error("unknown page format `{0}`")]
    /// A page format name that is not one of the presets
    UnknownFormat(String),

    #[error("invalid length `{0}`")]
    /// A length that could not be parsed or was negative
    InvalidLength(String),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),
}

/// Failures a [Measure](crate::measure::Measure) implementation may report.
///
/// These never reach the caller of [crate::paginate]: the engine logs them
/// and treats the node as zero-height.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("cannot measure at width {0}")]
    InvalidWidth(Pt),

    #[error("cannot measure {kind} node: {reason}")]
    Unmeasurable { kind: &'static str, reason: String },
}
