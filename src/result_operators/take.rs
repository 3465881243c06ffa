use crate::clauses::CloneContext;
use crate::expression::{Expression, Type, Value};
use crate::result_operators::{
    expect_sequence, expect_sequence_type, ExecutionStrategy, ResultOperation, ResultOperator,
    ResultOperatorError,
};
use crate::streamed_data::StreamedData;
use log::debug;
use serde::Serialize;

/// Keeps the first `count` items of a sequence.
///
/// The count is an expression so that it can be handed to a backing store as is. In memory it has
/// to be a constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakeResultOperator {
    count: Expression,
}

impl TakeResultOperator {
    pub fn new(count: Expression) -> Self {
        TakeResultOperator { count }
    }

    pub fn count(&self) -> &Expression {
        &self.count
    }

    pub fn constant_count(&self) -> Result<usize, ResultOperatorError> {
        match self.count.as_constant() {
            Some(Value::Int(count)) => {
                usize::try_from(*count).map_err(|_| self.non_constant_count())
            }
            _ => Err(self.non_constant_count()),
        }
    }

    fn non_constant_count(&self) -> ResultOperatorError {
        ResultOperatorError::NonConstantCount {
            expression: self.count.to_string(),
        }
    }
}

impl ResultOperation for TakeResultOperator {
    fn name(&self) -> &'static str {
        "Take"
    }

    fn clone_with(&self, _context: &CloneContext) -> ResultOperator {
        ResultOperator::Take(self.clone())
    }

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError> {
        let sequence = expect_sequence(self.name(), input)?;
        let count = self.constant_count()?;
        debug!("Taking {} of {} items", count, sequence.items().len());

        let items = sequence.items().iter().take(count).cloned().collect();

        Ok(StreamedData::sequence(
            items,
            sequence.item_expression().clone(),
        ))
    }

    fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError> {
        expect_sequence_type(self.name(), input_type)?;

        Ok(input_type.clone())
    }

    fn execution_strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Collection
    }
}
