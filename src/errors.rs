use thiserror::Error;

/// Identifies which of the two curvature support points adjoining an anchor is being referred
/// to. `Minus` is the support point on the incoming segment, `Plus` the one on the outgoing
/// segment, in curve traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportSide {
    Minus,
    Plus,
}

#[derive(Debug, Error)]
pub enum AirfoilError {
    /// A parameter with a restricted legal range was given a value outside of it.
    #[error("parameter `{name}` must lie in [{lo}, {hi}], but a value of {value} was supplied")]
    OutOfRange {
        name: &'static str,
        lo: f64,
        hi: f64,
        value: f64,
    },

    /// An override vector did not have one value for each active, unlinked parameter.
    #[error("override vector has {actual} values, but {expected} were expected")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("anchor point `{0}` does not exist in the anchor chain")]
    MissingAnchor(String),

    #[error("anchor point `{0}` already exists in the anchor chain")]
    DuplicateAnchor(String),

    /// The name is one of the fixed anchors (`te_1`, `le`, `te_2`) owned by the airfoil itself.
    #[error("anchor point name `{0}` is reserved")]
    ReservedName(String),

    /// Nothing can follow the terminal trailing edge anchor, so it cannot act as a predecessor
    /// for an anchor point or own a free point.
    #[error("`{0}` has no outgoing segment and cannot be used as a previous anchor point")]
    InvalidPredecessor(String),

    /// The closed-form curvature solve had a vanishing denominator, which happens when the
    /// curvature control arm is parallel to the tangent line at the anchor.
    #[error("curvature solve at anchor `{anchor}` ({side:?} side) is degenerate")]
    DegenerateCurvature { anchor: String, side: SupportSide },

    #[error("a Bezier curve needs at least {required} control points, {actual} were given")]
    NotEnoughPoints { required: usize, actual: usize },

    #[error("at least 2 samples per segment are required, {0} were requested")]
    TooFewSamples(usize),

    #[error("invalid airfoil configuration: {0}")]
    Config(#[from] serde_json::Error),
}
