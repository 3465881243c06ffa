//! The clause graph: the linked, structural shape of a query.
//!
//! A [QueryExpression] owns its clauses in an append-only list. Clauses do not point at each other
//! directly, they hold a [ClauseRef] to the clause preceding them, so the whole graph stays a plain
//! tree of owned values. Sub-queries are owned by the clause that introduces them, and only know
//! their parent by its [QueryId].
mod body;
mod cloning;

pub use body::{
    AdditionalFromClause, BodyClause, OrderByClause, Ordering, SubQueryFromClause, WhereClause,
};
pub use cloning::{CloneContext, QuerySourceId, QuerySourceMapping};

use crate::expression::{Expression, Type};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a [QueryExpression] for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QueryId(u64);

impl QueryId {
    pub(crate) fn next() -> Self {
        QueryId(NEXT_QUERY_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Points at a clause inside the query that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClauseRef {
    MainFrom,
    /// Index into [QueryExpression::body_clauses].
    Body(usize),
}

impl ClauseRef {
    pub fn body_index(self) -> Option<usize> {
        match self {
            ClauseRef::MainFrom => None,
            ClauseRef::Body(index) => Some(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize)]
pub struct MainFromClause {
    pub identifier: Expression,
    pub query_source: Expression,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectClause {
    pub previous_clause: ClauseRef,
    pub projection: Expression,
    pub distinct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupClause {
    pub previous_clause: ClauseRef,
    pub group_expression: Expression,
    pub by_expression: Expression,
}

/// The clause that ends a query and shapes its output.
#[derive(Debug, Clone, Serialize)]
pub enum SelectOrGroupClause {
    Select(SelectClause),
    Group(GroupClause),
}

impl SelectOrGroupClause {
    pub fn previous_clause(&self) -> ClauseRef {
        match self {
            SelectOrGroupClause::Select(select) => select.previous_clause,
            SelectOrGroupClause::Group(group) => group.previous_clause,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryExpression {
    id: QueryId,
    parent_query: Option<QueryId>,
    result_type: Type,
    expression_tree: Expression,
    main_from_clause: MainFromClause,
    body_clauses: Vec<BodyClause>,
    select_or_group_clause: SelectOrGroupClause,
}

/// A borrowed view of any clause that can be the previous clause of another.
#[derive(Debug, Clone, Copy)]
pub enum Clause<'a> {
    MainFrom(&'a MainFromClause),
    Body(&'a BodyClause),
}

impl Clause<'_> {
    pub fn previous_clause(&self) -> Option<ClauseRef> {
        match self {
            Clause::MainFrom(_) => None,
            Clause::Body(body) => Some(body.previous_clause()),
        }
    }
}

impl QueryExpression {
    pub(crate) fn new(
        id: QueryId,
        parent_query: Option<QueryId>,
        expression_tree: Expression,
        main_from_clause: MainFromClause,
        body_clauses: Vec<BodyClause>,
        select_or_group_clause: SelectOrGroupClause,
    ) -> Self {
        QueryExpression {
            id,
            parent_query,
            // The result type is whatever the parsed expression says it is, the clauses never
            // get a say in it.
            result_type: expression_tree.ty().clone(),
            expression_tree,
            main_from_clause,
            body_clauses,
            select_or_group_clause,
        }
    }

    pub fn id(&self) -> QueryId {
        self.id
    }

    /// The query this one is nested in, if it is a sub-query. Resolve it with
    /// [QueryExpression::find_query] or [QueryExpression::parent_of] from the outermost query.
    pub fn parent_query(&self) -> Option<QueryId> {
        self.parent_query
    }

    pub fn result_type(&self) -> &Type {
        &self.result_type
    }

    /// The expression this query was built from.
    pub fn expression_tree(&self) -> &Expression {
        &self.expression_tree
    }

    pub fn main_from_clause(&self) -> &MainFromClause {
        &self.main_from_clause
    }

    pub fn body_clauses(&self) -> &[BodyClause] {
        &self.body_clauses
    }

    pub fn select_or_group_clause(&self) -> &SelectOrGroupClause {
        &self.select_or_group_clause
    }

    pub fn select_clause(&self) -> Option<&SelectClause> {
        match &self.select_or_group_clause {
            SelectOrGroupClause::Select(select) => Some(select),
            SelectOrGroupClause::Group(_) => None,
        }
    }

    pub fn clause(&self, clause_ref: ClauseRef) -> Option<Clause<'_>> {
        match clause_ref {
            ClauseRef::MainFrom => Some(Clause::MainFrom(&self.main_from_clause)),
            ClauseRef::Body(index) => self.body_clauses.get(index).map(Clause::Body),
        }
    }

    /// Walks backwards from the terminal clause, ending with the main from clause.
    pub fn previous_clause_chain(&self) -> PreviousClauses<'_> {
        PreviousClauses {
            query: self,
            next: Some(self.select_or_group_clause.previous_clause()),
            remaining: self.body_clauses.len() + 1,
        }
    }

    /// The queries nested directly in this one, in body order.
    pub fn sub_queries(&self) -> impl Iterator<Item = &QueryExpression> + '_ {
        self.body_clauses
            .iter()
            .filter_map(|clause| match clause {
                BodyClause::SubQueryFrom(sub_query_from) => Some(sub_query_from.sub_query.as_ref()),
                _ => None,
            })
    }

    /// Finds this query or any query nested in it, at any depth.
    pub fn find_query(&self, id: QueryId) -> Option<&QueryExpression> {
        if self.id == id {
            return Some(self);
        }

        self.sub_queries().find_map(|sub_query| sub_query.find_query(id))
    }

    /// Resolves the parent of a query nested somewhere inside this one.
    pub fn parent_of(&self, nested: &QueryExpression) -> Option<&QueryExpression> {
        nested
            .parent_query
            .and_then(|parent_id| self.find_query(parent_id))
    }

    pub fn to_json(&self) -> Result<String, crate::Error> {
        Ok(serde_json::to_string(self)?)
    }
}

pub struct PreviousClauses<'a> {
    query: &'a QueryExpression,
    next: Option<ClauseRef>,
    // A well formed chain visits every clause once, this just makes sure we stop either way.
    remaining: usize,
}

impl Iterator for PreviousClauses<'_> {
    type Item = ClauseRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.next?;
        self.next = self
            .query
            .clause(current)
            .and_then(|clause| clause.previous_clause());
        self.remaining -= 1;

        Some(current)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expression::Value;

    fn simple_query(parent_query: Option<QueryId>) -> QueryExpression {
        let identifier = Expression::parameter("s", Type::object("Student"));
        let source = Expression::constant(Value::String("students".into()));
        let predicate = Expression::constant(Value::Bool(true));

        QueryExpression::new(
            QueryId::next(),
            parent_query,
            Expression::constant(Value::Int(0)),
            MainFromClause {
                identifier: identifier.clone(),
                query_source: source,
            },
            vec![BodyClause::Where(WhereClause {
                previous_clause: ClauseRef::MainFrom,
                predicate,
            })],
            SelectOrGroupClause::Group(GroupClause {
                previous_clause: ClauseRef::Body(0),
                group_expression: identifier.clone(),
                by_expression: identifier,
            }),
        )
    }

    #[test]
    fn result_type_comes_from_the_expression_tree() {
        let query = simple_query(None);

        assert_eq!(&Type::Int, query.result_type());
    }

    #[test]
    fn previous_clause_chain_ends_at_main_from() {
        let query = simple_query(None);
        let chain: Vec<_> = query.previous_clause_chain().collect();

        assert_eq!(vec![ClauseRef::Body(0), ClauseRef::MainFrom], chain);
    }

    #[test]
    fn group_clauses_are_not_select_clauses() {
        let query = simple_query(None);

        assert!(query.select_clause().is_none());
        assert!(matches!(
            query.select_or_group_clause(),
            SelectOrGroupClause::Group(_)
        ));
    }

    #[test]
    fn find_query_without_sub_queries() {
        let query = simple_query(None);

        assert!(query.find_query(query.id()).is_some());
        assert!(query.find_query(QueryId::next()).is_none());
    }

    #[test]
    fn clause_lookup_out_of_range() {
        let query = simple_query(None);

        assert!(query.clause(ClauseRef::Body(3)).is_none());
        assert!(matches!(
            query.clause(ClauseRef::MainFrom),
            Some(Clause::MainFrom(_))
        ));
    }
}
