use std::fmt::{self, Display};
use std::num::ParseFloatError;

/// Shape of an operand, reported when two operands don't line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dims {
    /// A `rows x cols` matrix.
    Matrix(usize, usize),
    /// A tensor with the given number of slots.
    Slots(usize),
    /// A plain vector of the given length.
    Vector(usize),
}

impl Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dims::Matrix(rows, cols) => write!(f, "{}x{} matrix", rows, cols),
            Dims::Slots(n) => write!(f, "tensor of {} slots", n),
            Dims::Vector(n) => write!(f, "vector of length {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Dimension mismatch in {op}: {left} is incompatible with {right}")]
    DimensionMismatch {
        op: &'static str,
        left: Dims,
        right: Dims,
    },

    #[error("Failed to parse {input:?} as a number")]
    Parse {
        input: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("The network must have at least a single layer, but it was empty.")]
    EmptyNetwork,

    #[error("Layer {layer} has no neurons.")]
    EmptyLayer { layer: usize },

    #[error("Layer {layer} is incompatible with the previous layer: expected input length of {expected} but received {found}.")]
    Topology {
        layer: usize,
        expected: usize,
        found: usize,
    },

    #[error("Layer {layer} is misplaced: the input layer must be the first layer and only the first.")]
    MisplacedInput { layer: usize },

    #[error("Neuron {neuron} has {found} weights but its layer expects {expected}.")]
    NeuronShape {
        neuron: usize,
        expected: usize,
        found: usize,
    },

    #[error("Index {index} is out of bounds for length {len}.")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("The learning algorithm was stepped before being initialized with training examples.")]
    Uninitialized,

    #[error("At least a single training example is required.")]
    EmptyTrainingSet,

    #[error("The initializer ran out of values, {missing} parameters were left undrawn.")]
    OutOfValues { missing: usize },

    #[error("The gradient magnitude became {magnitude} at epoch {epoch} so the convergence threshold can never be reached.")]
    NonFiniteGradient { epoch: usize, magnitude: f64 },
}

impl Error {
    pub(crate) fn mismatch(op: &'static str, left: Dims, right: Dims) -> Self {
        Error::DimensionMismatch { op, left, right }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
