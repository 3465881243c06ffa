use crate::clauses::CloneContext;
use crate::expression::{Expression, Type, Value};
use crate::result_operators::{
    expect_sequence, expect_sequence_type, ExecutionStrategy, ResultOperation, ResultOperator,
    ResultOperatorError,
};
use crate::streamed_data::StreamedData;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CountResultOperator;

impl ResultOperation for CountResultOperator {
    fn name(&self) -> &'static str {
        "Count"
    }

    fn clone_with(&self, _context: &CloneContext) -> ResultOperator {
        ResultOperator::Count(*self)
    }

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError> {
        let sequence = expect_sequence(self.name(), input)?;
        let count = Value::Int(sequence.items().len() as i64);

        Ok(StreamedData::scalar(
            count.clone(),
            Expression::constant(count),
        ))
    }

    fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError> {
        expect_sequence_type(self.name(), input_type)?;

        Ok(Type::Int)
    }

    fn execution_strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Scalar
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts_the_items() {
        let input = StreamedData::sequence(
            vec![Value::Null, Value::Int(1)],
            Expression::constant(Value::Null),
        );

        let result = CountResultOperator.execute_in_memory(&input).unwrap();

        let scalar = result.as_scalar().unwrap();
        assert_eq!(&Value::Int(2), scalar.value());
        assert_eq!(&Type::Int, scalar.value_expression().ty());
    }

    #[test]
    fn counting_a_scalar_fails() {
        let input = StreamedData::scalar(Value::Int(2), Expression::constant(Value::Int(2)));

        assert!(CountResultOperator.execute_in_memory(&input).is_err());
    }
}
