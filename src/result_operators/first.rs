use crate::clauses::CloneContext;
use crate::expression::{Expression, Type, Value};
use crate::result_operators::{
    expect_sequence, expect_sequence_type, ExecutionStrategy, ResultOperation, ResultOperator,
    ResultOperatorError,
};
use crate::streamed_data::StreamedData;
use serde::Serialize;

/// Picks the first item of a sequence.
///
/// An empty sequence is an error, unless the operator was asked for a default, which is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FirstResultOperator {
    return_default_when_empty: bool,
}

impl FirstResultOperator {
    pub fn new(return_default_when_empty: bool) -> Self {
        FirstResultOperator {
            return_default_when_empty,
        }
    }

    pub fn return_default_when_empty(&self) -> bool {
        self.return_default_when_empty
    }
}

impl ResultOperation for FirstResultOperator {
    fn name(&self) -> &'static str {
        if self.return_default_when_empty {
            "FirstOrDefault"
        } else {
            "First"
        }
    }

    fn clone_with(&self, _context: &CloneContext) -> ResultOperator {
        ResultOperator::First(*self)
    }

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError> {
        let sequence = expect_sequence(self.name(), input)?;

        let item_type = sequence.item_expression().ty();

        let value = match sequence.items().first() {
            Some(item) => item.clone(),
            None if self.return_default_when_empty => Value::default_for(item_type),
            None => {
                return Err(ResultOperatorError::EmptySequence {
                    operator: self.name(),
                })
            }
        };

        let value_expression = Expression::typed_constant(value.clone(), item_type.clone());

        Ok(StreamedData::scalar(value, value_expression))
    }

    fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError> {
        let (_, item) = expect_sequence_type(self.name(), input_type)?;

        Ok(item.clone())
    }

    fn execution_strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Single
    }
}
