//! In-memory data passed between an executor and the result operators.
use crate::expression::{Expression, Value};

/// A realized query result: either a sequence of items or one scalar value.
///
/// Streamed data is never changed in place. Operators read it and produce new data.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamedData {
    Sequence(StreamedSequence),
    Scalar(StreamedScalar),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamedSequence {
    items: Vec<Value>,
    /// Describes the static shape of every item.
    item_expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamedScalar {
    value: Value,
    value_expression: Expression,
}

impl StreamedData {
    pub fn sequence(items: Vec<Value>, item_expression: Expression) -> Self {
        StreamedData::Sequence(StreamedSequence::new(items, item_expression))
    }

    pub fn scalar(value: Value, value_expression: Expression) -> Self {
        StreamedData::Scalar(StreamedScalar::new(value, value_expression))
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            StreamedData::Sequence(_) => "sequence",
            StreamedData::Scalar(_) => "scalar",
        }
    }

    pub fn as_sequence(&self) -> Option<&StreamedSequence> {
        match self {
            StreamedData::Sequence(sequence) => Some(sequence),
            StreamedData::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&StreamedScalar> {
        match self {
            StreamedData::Sequence(_) => None,
            StreamedData::Scalar(scalar) => Some(scalar),
        }
    }
}

impl StreamedSequence {
    pub fn new(items: Vec<Value>, item_expression: Expression) -> Self {
        StreamedSequence {
            items,
            item_expression,
        }
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn item_expression(&self) -> &Expression {
        &self.item_expression
    }
}

impl StreamedScalar {
    pub fn new(value: Value, value_expression: Expression) -> Self {
        StreamedScalar {
            value,
            value_expression,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_expression(&self) -> &Expression {
        &self.value_expression
    }
}
