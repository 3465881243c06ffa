use crate::clauses::CloneContext;
use crate::expression::{Type, Value};
use crate::result_operators::{
    expect_sequence, expect_sequence_type, ExecutionStrategy, ResultOperation, ResultOperator,
    ResultOperatorError,
};
use crate::streamed_data::StreamedData;
use serde::Serialize;
use std::collections::HashSet;

/// Drops repeated items, keeping the first occurrence of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DistinctResultOperator;

impl ResultOperation for DistinctResultOperator {
    fn name(&self) -> &'static str {
        "Distinct"
    }

    fn clone_with(&self, _context: &CloneContext) -> ResultOperator {
        ResultOperator::Distinct(*self)
    }

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError> {
        let sequence = expect_sequence(self.name(), input)?;

        let mut seen = HashSet::new();
        let items: Vec<Value> = sequence
            .items()
            .iter()
            .filter(|item| seen.insert(*item))
            .cloned()
            .collect();

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

#[cfg(test)]
mod test {
    use super::*;
    use crate::expression::Expression;

    #[test]
    fn keeps_first_occurrences_in_order() {
        let item_expression = Expression::constant(Value::Int(0));
        let input = StreamedData::sequence(
            vec![Value::Int(3), Value::Int(1), Value::Int(3), Value::Int(2), Value::Int(1)],
            item_expression.clone(),
        );

        let result = DistinctResultOperator.execute_in_memory(&input).unwrap();

        let sequence = result.as_sequence().unwrap();
        assert_eq!(&[Value::Int(3), Value::Int(1), Value::Int(2)], sequence.items());
        assert_eq!(&item_expression, sequence.item_expression());
    }

    #[test]
    fn result_type_is_unchanged() {
        let input_type = Type::queryable(Type::String);

        assert_eq!(Ok(input_type.clone()), DistinctResultOperator.result_type(&input_type));
        assert!(DistinctResultOperator.result_type(&Type::String).is_err());
    }
}
