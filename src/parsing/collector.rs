use crate::expression::Expression;
use crate::parsing::{Fragment, SourceFragment};

/// Everything the recognizer found in a query, in left-to-right order.
///
/// A query always starts with a source, so the first source fragment is required up front and kept
/// apart from the rest. Once handed to the builder, a collector is only ever read.
#[derive(Debug, Clone)]
pub struct ParseResultCollector {
    root_expression: Expression,
    main_source: SourceFragment,
    body_fragments: Vec<Fragment>,
    projections: Vec<Expression>,
    distinct: bool,
}

impl ParseResultCollector {
    pub fn new(root_expression: Expression, main_source: SourceFragment) -> Self {
        ParseResultCollector {
            root_expression,
            main_source,
            body_fragments: Vec::new(),
            projections: Vec::new(),
            distinct: false,
        }
    }

    pub fn add_body_fragment<F: Into<Fragment>>(&mut self, fragment: F) {
        self.body_fragments.push(fragment.into());
    }

    pub fn add_projection(&mut self, projection: Expression) {
        self.projections.push(projection);
    }

    pub fn set_distinct(&mut self) {
        self.distinct = true;
    }

    pub fn root_expression(&self) -> &Expression {
        &self.root_expression
    }

    pub fn main_source(&self) -> &SourceFragment {
        &self.main_source
    }

    /// The fragments after the main source.
    pub fn body_fragments(&self) -> &[Fragment] {
        &self.body_fragments
    }

    pub fn projections(&self) -> &[Expression] {
        &self.projections
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clauses::OrderDirection;
    use crate::expression::{Type, Value};

    #[test]
    fn keeps_fragments_in_order() {
        let root = Expression::constant(Value::Int(0));
        let main_source = SourceFragment {
            identifier: Expression::parameter("s", Type::Int),
            generator: Expression::constant(Value::Int(1)),
        };
        let mut collector = ParseResultCollector::new(root.clone(), main_source);

        let predicate = Expression::constant(Value::Bool(true));
        let key = Expression::constant(Value::Int(2));
        collector.add_body_fragment(Fragment::filter(predicate.clone()));
        collector.add_body_fragment(Fragment::order(true, OrderDirection::Asc, key.clone()));

        assert_eq!(&root, collector.root_expression());
        assert_eq!(2, collector.body_fragments().len());
        assert!(matches!(
            &collector.body_fragments()[0],
            Fragment::Filter(filter) if filter.predicate == predicate
        ));
        assert!(matches!(
            &collector.body_fragments()[1],
            Fragment::Order(order) if order.key == key
        ));
    }

    #[test]
    fn distinct_is_off_by_default() {
        let main_source = SourceFragment {
            identifier: Expression::parameter("s", Type::Int),
            generator: Expression::constant(Value::Int(1)),
        };
        let mut collector =
            ParseResultCollector::new(Expression::constant(Value::Int(0)), main_source);

        assert!(!collector.is_distinct());
        collector.set_distinct();
        assert!(collector.is_distinct());
    }
}
