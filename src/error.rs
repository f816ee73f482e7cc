use thiserror::Error;

/// Top-level error type for the layout compiler.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Wiring(#[from] WiringError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Stripe(#[from] StripeError),

    #[error(transparent)]
    Packing(#[from] PackingError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A failure while compiling one fixture, tagged with that fixture's id.
    #[error("fixture {id}: {source}")]
    Fixture {
        id: String,
        #[source]
        source: Box<LayoutError>,
    },
}

impl LayoutError {
    /// Wraps this error with the id of the fixture being compiled.
    #[must_use]
    pub fn in_fixture(self, id: impl Into<String>) -> Self {
        Self::Fixture {
            id: id.into(),
            source: Box::new(self),
        }
    }
}

/// Errors related to lookups between vertices, edges, panels and stripes.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("unknown vertex: {0}")]
    MissingVertex(String),

    #[error("unknown edge: {0}")]
    MissingEdge(String),

    #[error("no striping instructions for panel {0}")]
    MissingStripe(String),

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("panel {panel}: expected exactly one vertex off the leading edge, found {candidates:?}")]
    VertexCountMismatch {
        panel: String,
        candidates: Vec<String>,
    },
}

/// Errors raised while resolving chained edge wiring.
#[derive(Debug, Error)]
pub enum WiringError {
    #[error("cyclic or unresolvable wiring chain: {unresolved:?}")]
    CyclicWiring { unresolved: Vec<String> },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while decoding a panel's row code.
#[derive(Debug, Error)]
pub enum StripeError {
    #[error("malformed row code token {token:?}: {reason}")]
    MalformedRowCode { token: String, reason: String },

    #[error("invalid side token {0:?}, expected L or R")]
    InvalidSide(String),

    #[error("row code for panel {0} produced no rows")]
    NoRows(String),

    #[error("row {row} would have no pixels")]
    RowLengthUnderflow { row: usize },
}

/// Errors raised while assigning pixels to controller outputs.
#[derive(Debug, Error)]
pub enum PackingError {
    #[error("only {used} of {provided} outputs are needed")]
    OverAllocatedOutputs { used: usize, provided: usize },

    #[error("ran out of outputs with {rows_left} rows ({pixels_left} pixels) unassigned")]
    InsufficientOutputs { rows_left: usize, pixels_left: usize },

    #[error("row {row} has {gap} gap pixels, more than an output's capacity of {capacity}")]
    GapExceedsCapacity {
        row: usize,
        gap: usize,
        capacity: usize,
    },

    #[error("declared {declared} pixels but rows hold {packed}")]
    PixelCountMismatch { declared: usize, packed: usize },

    #[error("malformed output spec: {0:?}")]
    MalformedOutputSpec(String),
}

/// A record in one of the input text files could not be read.
#[derive(Debug, Error)]
#[error("{record} line {line}: {message}")]
pub struct ParseError {
    pub record: &'static str,
    pub line: usize,
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error for the given record kind and 1-based line.
    #[must_use]
    pub fn new(record: &'static str, line: usize, message: impl Into<String>) -> Self {
        Self {
            record,
            line,
            message: message.into(),
        }
    }
}

/// Convenience type alias for results using [`LayoutError`].
pub type Result<T> = std::result::Result<T, LayoutError>;
