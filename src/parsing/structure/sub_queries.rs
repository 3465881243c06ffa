use crate::expression::{Expression, ExpressionId};
use crate::parsing::ParseResultCollector;
use std::collections::HashMap;

/// Decides whether the generator of a source fragment is a complete query of its own.
///
/// The builder hands over the generator with any enclosing lambda already stripped. Returning the
/// collected fragments of that inner query makes the builder nest it as a sub-query; returning
/// `None` makes the source a plain additional from clause.
pub trait SubQueryRecognizer {
    fn recognize(&self, generator: &Expression) -> Option<&ParseResultCollector>;
}

/// Never recognizes anything, every source is a plain sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubQueries;

impl SubQueryRecognizer for NoSubQueries {
    fn recognize(&self, _generator: &Expression) -> Option<&ParseResultCollector> {
        None
    }
}

/// Inner queries the recognizer already collected, keyed by the identity of their root expression.
#[derive(Debug, Clone, Default)]
pub struct RecognizedSubQueries {
    queries: HashMap<ExpressionId, ParseResultCollector>,
}

impl RecognizedSubQueries {
    pub fn new() -> Self {
        Default::default()
    }

    /// The collector's root expression is what a generator must be to match it.
    pub fn register(&mut self, collector: ParseResultCollector) {
        self.queries
            .insert(collector.root_expression().id(), collector);
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl SubQueryRecognizer for RecognizedSubQueries {
    fn recognize(&self, generator: &Expression) -> Option<&ParseResultCollector> {
        self.queries.get(&generator.id())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parsing::SourceFragment;
    use crate::test_fixtures::{create_parameter_expression, create_query_source};

    #[test]
    fn matches_by_identity_only() {
        let root = create_query_source();
        let look_alike = create_query_source();
        let collector = ParseResultCollector::new(
            root.clone(),
            SourceFragment {
                identifier: create_parameter_expression(),
                generator: create_query_source(),
            },
        );

        let mut recognizer = RecognizedSubQueries::new();
        recognizer.register(collector);

        assert_eq!(1, recognizer.len());
        assert!(recognizer.recognize(&root).is_some());
        assert!(recognizer.recognize(&look_alike).is_none());
        assert!(NoSubQueries.recognize(&root).is_none());
    }
}
