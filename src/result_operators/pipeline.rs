use crate::clauses::CloneContext;
use crate::expression::Type;
use crate::result_operators::{
    ExecutionStrategy, ResultOperation, ResultOperator, ResultOperatorError,
};
use crate::streamed_data::StreamedData;
use log::debug;
use serde::Serialize;

/// The result operators of a query, in the order they are applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultOperatorPipeline {
    operators: Vec<ResultOperator>,
}

impl ResultOperatorPipeline {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push<O: Into<ResultOperator>>(&mut self, operator: O) {
        self.operators.push(operator.into());
    }

    pub fn operators(&self) -> &[ResultOperator] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn clone_with(&self, context: &CloneContext) -> Self {
        ResultOperatorPipeline {
            operators: self
                .operators
                .iter()
                .map(|operator| operator.clone_with(context))
                .collect(),
        }
    }

    /// Runs every operator over the output of the previous one. The first failure stops the run.
    pub fn execute_in_memory(
        &self,
        input: &StreamedData,
    ) -> Result<StreamedData, ResultOperatorError> {
        let mut data = input.clone();

        for operator in &self.operators {
            debug!("Executing {} over a streamed {}", operator.name(), data.shape_name());
            data = operator.execute_in_memory(&data)?;
        }

        Ok(data)
    }

    pub fn result_type(&self, input_type: &Type) -> Result<Type, ResultOperatorError> {
        self.operators
            .iter()
            .try_fold(input_type.clone(), |ty, operator| operator.result_type(&ty))
    }

    /// What the last operator needs; a query without operators yields a collection.
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.operators
            .last()
            .map(|operator| operator.execution_strategy())
            .unwrap_or(ExecutionStrategy::Collection)
    }
}

impl FromIterator<ResultOperator> for ResultOperatorPipeline {
    fn from_iter<T: IntoIterator<Item = ResultOperator>>(iter: T) -> Self {
        ResultOperatorPipeline {
            operators: iter.into_iter().collect(),
        }
    }
}
