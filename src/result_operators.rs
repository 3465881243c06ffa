//! Result operators post-process the realized output of a query: filtering by runtime type,
//! removing duplicates, counting, and so on.
//!
//! The set of operators is closed: [ResultOperator] is an enum with one variant per operator, and
//! every operator implements [ResultOperation]. An executor can ask an operator
//! - for a copy fit for a cloned clause graph ([ResultOperation::clone_with]),
//! - to run over data that is already in memory ([ResultOperation::execute_in_memory]),
//! - what static type it turns its input type into ([ResultOperation::result_type]),
//! - whether it could be pushed down to the data source ([ResultOperation::execution_strategy]).
mod cast;
mod count;
mod distinct;
mod first;
mod of_type;
mod pipeline;
mod take;

pub use cast::CastResultOperator;
pub use count::CountResultOperator;
pub use distinct::DistinctResultOperator;
pub use first::FirstResultOperator;
pub use of_type::OfTypeResultOperator;
pub use pipeline::ResultOperatorPipeline;
pub use take::TakeResultOperator;

use crate::clauses::CloneContext;
use crate::expression::{SequenceKind, Type, Value};
use crate::streamed_data::{StreamedData, StreamedSequence};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an executor has to run an operator.
///
/// Strategies are plain values, every operator with the same needs shares the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// The operator needs the whole sequence realized in memory and yields a sequence.
    Collection,
    /// Turns a sequence into a single computed value.
    Scalar,
    /// Picks a single item out of the sequence.
    Single,
}

pub trait ResultOperation {
    fn name(&self) -> &'static str;

    fn clone_with(&self, context: &CloneContext) -> ResultOperator;

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError>;

    fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError>;

    fn execution_strategy(&self) -> ExecutionStrategy;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultOperatorError {
    #[error("{operator} requires an input type of shape {expected}, but got '{found}'")]
    TypeShape {
        operator: &'static str,
        expected: &'static str,
        found: Type,
    },
    #[error("{operator} expected a streamed {expected}, but got a streamed {found}")]
    UnexpectedStreamShape {
        operator: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Cannot cast '{value}' to '{target}'")]
    InvalidCast { value: Value, target: Type },
    #[error("{operator} was applied to an empty sequence")]
    EmptySequence { operator: &'static str },
    #[error("The item count '{expression}' is not a constant, non-negative integer")]
    NonConstantCount { expression: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operator", rename_all = "snake_case")]
pub enum ResultOperator {
    OfType(OfTypeResultOperator),
    Cast(CastResultOperator),
    Distinct(DistinctResultOperator),
    Take(TakeResultOperator),
    Count(CountResultOperator),
    First(FirstResultOperator),
}

impl ResultOperator {
    fn operation(&self) -> &dyn ResultOperation {
        match self {
            ResultOperator::OfType(operator) => operator,
            ResultOperator::Cast(operator) => operator,
            ResultOperator::Distinct(operator) => operator,
            ResultOperator::Take(operator) => operator,
            ResultOperator::Count(operator) => operator,
            ResultOperator::First(operator) => operator,
        }
    }
}

impl ResultOperation for ResultOperator {
    fn name(&self) -> &'static str {
        self.operation().name()
    }

    fn clone_with(&self, context: &CloneContext) -> ResultOperator {
        self.operation().clone_with(context)
    }

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError> {
        self.operation().execute_in_memory(input)
    }

    fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError> {
        self.operation().result_type(input_type)
    }

    fn execution_strategy(&self) -> ExecutionStrategy {
        self.operation().execution_strategy()
    }
}

impl From<OfTypeResultOperator> for ResultOperator {
    fn from(value: OfTypeResultOperator) -> Self {
        ResultOperator::OfType(value)
    }
}

impl From<CastResultOperator> for ResultOperator {
    fn from(value: CastResultOperator) -> Self {
        ResultOperator::Cast(value)
    }
}

impl From<DistinctResultOperator> for ResultOperator {
    fn from(value: DistinctResultOperator) -> Self {
        ResultOperator::Distinct(value)
    }
}

impl From<TakeResultOperator> for ResultOperator {
    fn from(value: TakeResultOperator) -> Self {
        ResultOperator::Take(value)
    }
}

impl From<CountResultOperator> for ResultOperator {
    fn from(value: CountResultOperator) -> Self {
        ResultOperator::Count(value)
    }
}

impl From<FirstResultOperator> for ResultOperator {
    fn from(value: FirstResultOperator) -> Self {
        ResultOperator::First(value)
    }
}

const SEQUENCE_SHAPE: &str = "IQueryable<T> or IEnumerable<T>";

fn expect_sequence<'a>(
    operator: &'static str,
    input: &'a StreamedData,
) -> Result<&'a StreamedSequence, ResultOperatorError> {
    input
        .as_sequence()
        .ok_or(ResultOperatorError::UnexpectedStreamShape {
            operator,
            expected: "sequence",
            found: input.shape_name(),
        })
}

/// Splits a sequence type into its kind and item type.
fn expect_sequence_type<'a>(
    operator: &'static str,
    input_type: &'a Type,
) -> Result<(SequenceKind, &'a Type), ResultOperatorError> {
    match input_type {
        Type::Sequence { kind, item } => Ok((*kind, item)),
        _ => Err(ResultOperatorError::TypeShape {
            operator,
            expected: SEQUENCE_SHAPE,
            found: input_type.clone(),
        }),
    }
}
