//! Links the fragments of a [ParseResultCollector] into a [QueryExpression].
//!
//! The rules are positional and simple, but easy to get subtly wrong:
//! - the main source becomes the [MainFromClause], every other fragment becomes a body clause
//!   pointing at the clause before it;
//! - the n-th source fragment in the body takes the n-th projection;
//! - the select clause always takes the *last* projection;
//! - consecutive order fragments share an [OrderByClause] unless one starts a new group. Any other
//!   fragment in between closes the group.
//!
//! Sources whose generator is itself a complete query are built recursively into sub-queries. What
//! counts as a complete query is up to the [SubQueryRecognizer].
mod sub_queries;

pub use sub_queries::{NoSubQueries, RecognizedSubQueries, SubQueryRecognizer};

use crate::clauses::{
    AdditionalFromClause, BodyClause, ClauseRef, MainFromClause, OrderByClause, Ordering,
    QueryExpression, QueryId, SelectClause, SelectOrGroupClause, SubQueryFromClause, WhereClause,
};
use crate::expression::Expression;
use crate::parsing::{FilterFragment, Fragment, OrderFragment, ParseResultCollector, SourceFragment};
use log::{debug, trace};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("There is no projection for the select clause.")]
    NoSelectProjection,
    #[error("From expression '{identifier}' ({expression}) doesn't have a projection expression.")]
    MissingProjection {
        identifier: String,
        expression: String,
    },
}

/// Builds a query that has no sub-queries in its from clauses.
pub fn build_query_expression(
    root: &Expression,
    collector: &ParseResultCollector,
) -> Result<QueryExpression, StructureError> {
    build_query_expression_with(root, collector, &NoSubQueries)
}

pub fn build_query_expression_with<R>(
    root: &Expression,
    collector: &ParseResultCollector,
    recognizer: &R,
) -> Result<QueryExpression, StructureError>
where
    R: SubQueryRecognizer + ?Sized,
{
    let builder = QueryStructureBuilder::new(root, collector, recognizer);

    builder.try_build()
}

/// Single use: build one query, then it's gone.
pub struct QueryStructureBuilder<'a, R: ?Sized> {
    root: &'a Expression,
    collector: &'a ParseResultCollector,
    recognizer: &'a R,
    query_id: QueryId,
    parent: Option<QueryId>,
    body_clauses: Vec<BodyClause>,
    last_clause: ClauseRef,
    projection_index: usize,
    current_order_by: Option<usize>,
}

impl<'a, R> QueryStructureBuilder<'a, R>
where
    R: SubQueryRecognizer + ?Sized,
{
    pub fn new(
        root: &'a Expression,
        collector: &'a ParseResultCollector,
        recognizer: &'a R,
    ) -> Self {
        QueryStructureBuilder {
            root,
            collector,
            recognizer,
            query_id: QueryId::next(),
            parent: None,
            body_clauses: Vec::new(),
            last_clause: ClauseRef::MainFrom,
            projection_index: 0,
            current_order_by: None,
        }
    }

    fn nested(
        root: &'a Expression,
        collector: &'a ParseResultCollector,
        recognizer: &'a R,
        parent: QueryId,
    ) -> Self {
        QueryStructureBuilder {
            parent: Some(parent),
            ..Self::new(root, collector, recognizer)
        }
    }

    pub fn try_build(mut self) -> Result<QueryExpression, StructureError> {
        debug!(
            "Building query {:?} from {} body fragments and {} projections",
            self.query_id,
            self.collector.body_fragments().len(),
            self.collector.projections().len()
        );

        let main_source = self.collector.main_source();
        let main_from_clause = MainFromClause {
            identifier: main_source.identifier.clone(),
            query_source: main_source.generator.clone(),
        };

        let collector = self.collector;
        for fragment in collector.body_fragments() {
            self.apply_fragment(fragment)?;
        }

        let select = self.finalize_select()?;

        debug!(
            "Built query {:?} with {} body clauses",
            self.query_id,
            self.body_clauses.len()
        );

        Ok(QueryExpression::new(
            self.query_id,
            self.parent,
            self.root.clone(),
            main_from_clause,
            self.body_clauses,
            SelectOrGroupClause::Select(select),
        ))
    }

    fn apply_fragment(&mut self, fragment: &'a Fragment) -> Result<(), StructureError> {
        trace!(
            "Linking {} fragment after {:?}",
            fragment.get_name(),
            self.last_clause
        );

        match fragment {
            Fragment::Source(source) => self.apply_source(source)?,
            Fragment::Filter(filter) => self.apply_filter(filter),
            Fragment::Order(order) => self.apply_order(order),
        };

        Ok(())
    }

    fn apply_source(&mut self, source: &'a SourceFragment) -> Result<(), StructureError> {
        let projection = self.take_projection(source)?;
        let previous_clause = self.last_clause;
        let generator = source.generator.unwrap_lambda();
        let recognizer = self.recognizer;

        let clause = match recognizer.recognize(generator) {
            Some(sub_collector) => {
                debug!(
                    "Source '{}' of query {:?} is a sub-query",
                    source.identifier, self.query_id
                );

                let sub_query =
                    Self::nested(generator, sub_collector, recognizer, self.query_id).try_build()?;

                BodyClause::SubQueryFrom(SubQueryFromClause {
                    previous_clause,
                    identifier: source.identifier.clone(),
                    sub_query: Box::new(sub_query),
                    projection,
                })
            }
            None => BodyClause::AdditionalFrom(AdditionalFromClause {
                previous_clause,
                identifier: source.identifier.clone(),
                from_expression: generator.clone(),
                projection,
            }),
        };

        self.push_clause(clause);

        Ok(())
    }

    fn apply_filter(&mut self, filter: &FilterFragment) {
        self.push_clause(BodyClause::Where(WhereClause {
            previous_clause: self.last_clause,
            predicate: filter.predicate.clone(),
        }));
    }

    fn apply_order(&mut self, order: &OrderFragment) {
        if !order.starts_group {
            if let Some(index) = self.current_order_by {
                if let Some(BodyClause::OrderBy(order_by)) = self.body_clauses.get_mut(index) {
                    // Then-by keys stay inside the open clause, the body does not grow.
                    order_by.orderings.push(Ordering::new(
                        ClauseRef::Body(index),
                        order.direction,
                        order.key.clone(),
                    ));

                    return;
                }
            }
        }

        let previous_clause = self.last_clause;
        let order_by = OrderByClause {
            previous_clause,
            orderings: vec![Ordering::new(
                previous_clause,
                order.direction,
                order.key.clone(),
            )],
        };

        let clause_ref = self.push_clause(BodyClause::OrderBy(order_by));
        self.current_order_by = clause_ref.body_index();
    }

    /// Appends to the body, making the clause the new previous clause. Closes any open
    /// order by group.
    fn push_clause(&mut self, clause: BodyClause) -> ClauseRef {
        self.body_clauses.push(clause);
        self.last_clause = ClauseRef::Body(self.body_clauses.len() - 1);
        self.current_order_by = None;

        self.last_clause
    }

    fn take_projection(&mut self, source: &SourceFragment) -> Result<Expression, StructureError> {
        let projection = self
            .collector
            .projections()
            .get(self.projection_index)
            .cloned()
            .ok_or_else(|| StructureError::MissingProjection {
                identifier: source.identifier.to_string(),
                expression: source.generator.to_string(),
            })?;

        self.projection_index += 1;

        Ok(projection)
    }

    fn finalize_select(&self) -> Result<SelectClause, StructureError> {
        let projection = self
            .collector
            .projections()
            .last()
            .cloned()
            .ok_or(StructureError::NoSelectProjection)?;

        Ok(SelectClause {
            previous_clause: self.last_clause,
            projection,
            distinct: self.collector.is_distinct(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clauses::OrderDirection;
    use crate::test_fixtures::{
        a_student, create_lambda_expression, create_parameter_expression, create_query_source,
    };

    fn collector_with_main_source() -> (Expression, ParseResultCollector) {
        let root = create_query_source();
        let main_source = SourceFragment {
            identifier: create_parameter_expression(),
            generator: create_query_source(),
        };

        (root.clone(), ParseResultCollector::new(root, main_source))
    }

    #[test]
    fn no_projection_for_select_clause() {
        let (root, collector) = collector_with_main_source();

        let error = build_query_expression(&root, &collector).unwrap_err();

        assert_eq!(StructureError::NoSelectProjection, error);
        assert_eq!(
            "There is no projection for the select clause.",
            error.to_string()
        );
    }

    #[test]
    fn from_expression_without_projection() {
        let (root, mut collector) = collector_with_main_source();
        collector.add_body_fragment(Fragment::source(
            create_parameter_expression(),
            create_lambda_expression(),
        ));

        let error = build_query_expression(&root, &collector).unwrap_err();

        assert_eq!(
            "From expression 'i' (() => 0) doesn't have a projection expression.",
            error.to_string()
        );
    }

    #[test]
    fn main_source_is_not_repeated_in_the_body() {
        let (root, mut collector) = collector_with_main_source();
        collector.add_projection(create_lambda_expression());

        let query = build_query_expression(&root, &collector).unwrap();

        assert!(query.body_clauses().is_empty());
        assert_eq!(
            &collector.main_source().identifier,
            &query.main_from_clause().identifier
        );
        assert_eq!(
            &collector.main_source().generator,
            &query.main_from_clause().query_source
        );
    }

    #[test]
    fn additional_from_unwraps_the_generator_lambda() {
        let (root, mut collector) = collector_with_main_source();
        let generator_body = create_query_source();
        let generator =
            Expression::lambda(vec![create_parameter_expression()], generator_body.clone());
        collector.add_body_fragment(Fragment::source(create_parameter_expression(), generator));
        collector.add_projection(create_lambda_expression());

        let query = build_query_expression(&root, &collector).unwrap();

        match &query.body_clauses()[0] {
            BodyClause::AdditionalFrom(from) => assert_eq!(generator_body, from.from_expression),
            other => panic!("expected an additional from clause, got {}", other.name()),
        }
    }

    #[test]
    fn order_fragment_starts_a_group_after_a_filter() {
        let (root, mut collector) = collector_with_main_source();
        collector.add_body_fragment(Fragment::order(
            true,
            OrderDirection::Asc,
            create_lambda_expression(),
        ));
        collector.add_body_fragment(Fragment::filter(create_lambda_expression()));
        // Not marked as a group start, but the filter closed the previous group.
        collector.add_body_fragment(Fragment::order(
            false,
            OrderDirection::Desc,
            create_lambda_expression(),
        ));
        collector.add_projection(create_lambda_expression());

        let query = build_query_expression(&root, &collector).unwrap();

        assert_eq!(3, query.body_clauses().len());
        let last = query.body_clauses()[2].as_order_by().unwrap();
        assert_eq!(1, last.orderings.len());
        assert_eq!(ClauseRef::Body(1), last.previous_clause);
        assert_eq!(ClauseRef::Body(1), last.orderings[0].previous_clause);
    }

    #[test]
    fn then_by_without_order_by_starts_a_group() {
        let (root, mut collector) = collector_with_main_source();
        collector.add_body_fragment(Fragment::order(
            false,
            OrderDirection::Desc,
            create_lambda_expression(),
        ));
        collector.add_projection(create_lambda_expression());

        let query = build_query_expression(&root, &collector).unwrap();

        let order_by = query.body_clauses()[0].as_order_by().unwrap();
        assert_eq!(ClauseRef::MainFrom, order_by.orderings[0].previous_clause);
        assert_eq!(OrderDirection::Desc, order_by.orderings[0].direction);
    }

    #[test]
    fn each_build_gets_its_own_query_id() {
        let (root, mut collector) = collector_with_main_source();
        collector.add_projection(create_lambda_expression());

        let first = build_query_expression(&root, &collector).unwrap();
        let second = build_query_expression(&root, &collector).unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(None, first.parent_query());
    }

    #[test]
    fn sub_query_errors_abort_the_outer_build() {
        let (root, mut collector) = collector_with_main_source();

        let sub_query_root = create_query_source();
        // The sub-query has no projection at all.
        let sub_collector = ParseResultCollector::new(
            sub_query_root.clone(),
            SourceFragment {
                identifier: create_parameter_expression(),
                generator: Expression::constant(a_student()),
            },
        );
        let mut recognizer = RecognizedSubQueries::new();
        recognizer.register(sub_collector);

        collector.add_body_fragment(Fragment::source(
            create_parameter_expression(),
            Expression::lambda(vec![create_parameter_expression()], sub_query_root),
        ));
        collector.add_projection(create_lambda_expression());

        let error = build_query_expression_with(&root, &collector, &recognizer).unwrap_err();

        assert_eq!(StructureError::NoSelectProjection, error);
    }
}
