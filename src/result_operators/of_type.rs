use crate::clauses::CloneContext;
use crate::expression::{Expression, Type, Value};
use crate::result_operators::{
    expect_sequence, expect_sequence_type, ExecutionStrategy, ResultOperation, ResultOperator,
    ResultOperatorError,
};
use crate::streamed_data::StreamedData;
use log::debug;
use serde::Serialize;

/// Keeps only the items whose *runtime* type is the searched type, or derives from it.
///
/// Because the decision depends on runtime types, this can never be handed to a backing store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfTypeResultOperator {
    searched_item_type: Type,
}

impl OfTypeResultOperator {
    pub fn new(searched_item_type: Type) -> Self {
        OfTypeResultOperator { searched_item_type }
    }

    pub fn searched_item_type(&self) -> &Type {
        &self.searched_item_type
    }
}

impl ResultOperation for OfTypeResultOperator {
    fn name(&self) -> &'static str {
        "OfType"
    }

    fn clone_with(&self, _context: &CloneContext) -> ResultOperator {
        ResultOperator::OfType(self.clone())
    }

    fn execute_in_memory(&self, input: &StreamedData) -> Result<StreamedData, ResultOperatorError> {
        let sequence = expect_sequence(self.name(), input)?;

        let items: Vec<Value> = sequence
            .items()
            .iter()
            .filter(|item| item.is_instance_of(&self.searched_item_type))
            .cloned()
            .collect();

        debug!(
            "{} kept {} of {} items",
            self.name(),
            items.len(),
            sequence.items().len()
        );

        let item_expression = Expression::convert(
            sequence.item_expression().clone(),
            self.searched_item_type.clone(),
        );

        Ok(StreamedData::sequence(items, item_expression))
    }

    fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError> {
        let (kind, _) = expect_sequence_type(self.name(), input_type)?;

        Ok(Type::sequence(kind, self.searched_item_type.clone()))
    }

    fn execution_strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Collection
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expression::{ExpressionKind, ObjectValue};
    use crate::test_fixtures::{good_student, student, student_type};

    fn operator() -> OfTypeResultOperator {
        OfTypeResultOperator::new(Type::Object(good_student()))
    }

    #[test]
    fn clone() {
        let operator = operator();

        let clone = operator.clone_with(&CloneContext::default());

        match clone {
            ResultOperator::OfType(clone) => {
                assert_eq!(operator.searched_item_type(), clone.searched_item_type())
            }
            other => panic!("expected an OfType operator, got {}", other.name()),
        }
    }

    #[test]
    fn execute_in_memory() {
        let student1: Value = ObjectValue::new(good_student())
            .with_field("name", Value::String("Ana".into()))
            .into();
        let student2: Value = ObjectValue::new(good_student())
            .with_field("name", Value::String("Bo".into()))
            .into();
        let student3: Value = ObjectValue::new(student())
            .with_field("name", Value::String("Cy".into()))
            .into();
        let item_expression = Expression::typed_constant(student3.clone(), student_type());
        let input = StreamedData::sequence(
            vec![student1.clone(), student2.clone(), student3],
            item_expression.clone(),
        );

        let result = operator().execute_in_memory(&input).unwrap();

        let sequence = result.as_sequence().unwrap();
        assert_eq!(&[student1, student2], sequence.items());
        assert_eq!(&Type::Object(good_student()), sequence.item_expression().ty());
        match sequence.item_expression().kind() {
            ExpressionKind::Convert { operand } => assert_eq!(&item_expression, operand),
            other => panic!("expected a conversion, got {:?}", other),
        }
    }

    #[test]
    fn execute_in_memory_leaves_the_input_alone() {
        let items = vec![Value::Int(1), ObjectValue::new(good_student()).into()];
        let input = StreamedData::sequence(items.clone(), Expression::constant(Value::Int(1)));

        operator().execute_in_memory(&input).unwrap();

        assert_eq!(items.as_slice(), input.as_sequence().unwrap().items());
    }

    #[test]
    fn execute_in_memory_requires_a_sequence() {
        let input = StreamedData::scalar(Value::Int(1), Expression::constant(Value::Int(1)));

        let error = operator().execute_in_memory(&input).unwrap_err();

        assert_eq!(
            ResultOperatorError::UnexpectedStreamShape {
                operator: "OfType",
                expected: "sequence",
                found: "scalar",
            },
            error
        );
    }

    #[test]
    fn execution_strategy() {
        assert_eq!(ExecutionStrategy::Collection, operator().execution_strategy());
    }

    #[test]
    fn get_result_type() {
        assert_eq!(
            Ok(Type::queryable(Type::Object(good_student()))),
            operator().result_type(&Type::queryable(student_type()))
        );
        assert_eq!(
            Ok(Type::enumerable(Type::Object(good_student()))),
            operator().result_type(&Type::enumerable(Type::Int))
        );
    }

    #[test]
    fn get_result_type_invalid_type() {
        let error = operator().result_type(&student_type()).unwrap_err();

        assert!(matches!(error, ResultOperatorError::TypeShape { .. }));
    }
}
