use crate::clauses::CloneContext;
use crate::expression::{Expression, Type, Value};
use crate::result_operators::{
    expect_sequence, expect_sequence_type, ExecutionStrategy, ResultOperation, ResultOperator,
    ResultOperatorError,
};
use crate::streamed_data::StreamedData;
use serde::Serialize;

/// Re-types every item of a sequence, failing on the first item that doesn't fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastResultOperator {
    cast_item_type: Type,
}

impl CastResultOperator {
    pub fn new(cast_item_type: Type) -> Self {
        CastResultOperator { cast_item_type }
    }

    pub fn cast_item_type(&self) -> &Type {
        &self.cast_item_type
    }

    fn can_cast(&self, item: &Value) -> bool {
        match item {
            Value::Null => self.cast_item_type.is_nullable(),
            item => item.is_instance_of(&self.cast_item_type),
        }
    }
}

impl ResultOperation for CastResultOperator {
    fn name(&self) -> &'static str {
        "Cast"
    }

    fn clone_with(&self, _context: &CloneContext) -> ResultOperator {
        ResultOperator::Cast(self.clone())
    }

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError> {
        let sequence = expect_sequence(self.name(), input)?;

        if let Some(invalid) = sequence.items().iter().find(|item| !self.can_cast(item)) {
            return Err(ResultOperatorError::InvalidCast {
                value: invalid.clone(),
                target: self.cast_item_type.clone(),
            });
        }

        let item_expression = Expression::convert(
            sequence.item_expression().clone(),
            self.cast_item_type.clone(),
        );

        Ok(StreamedData::sequence(
            sequence.items().to_vec(),
            item_expression,
        ))
    }

    fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError> {
        let (kind, _) = expect_sequence_type(self.name(), input_type)?;

        Ok(Type::sequence(kind, self.cast_item_type.clone()))
    }

    fn execution_strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Collection
    }
}
