use crate::clauses::{ClauseRef, OrderDirection, QueryExpression};
use crate::expression::Expression;
use serde::Serialize;

/// Clauses between the main from clause and the select clause.
#[derive(Debug, Serialize)]
pub enum BodyClause {
    AdditionalFrom(AdditionalFromClause),
    SubQueryFrom(SubQueryFromClause),
    Where(WhereClause),
    OrderBy(OrderByClause),
}

/// `from x in generator`, where the generator is a plain sequence.
#[derive(Debug, Clone, Serialize)]
pub struct AdditionalFromClause {
    pub previous_clause: ClauseRef,
    pub identifier: Expression,
    pub from_expression: Expression,
    pub projection: Expression,
}

/// `from x in (from ... select ...)`.
#[derive(Debug, Serialize)]
pub struct SubQueryFromClause {
    pub previous_clause: ClauseRef,
    pub identifier: Expression,
    pub sub_query: Box<QueryExpression>,
    pub projection: Expression,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhereClause {
    pub previous_clause: ClauseRef,
    pub predicate: Expression,
}

/// One `orderby a, b` group. Never empty.
#[derive(Debug, Clone, Serialize)]
pub struct OrderByClause {
    pub previous_clause: ClauseRef,
    pub orderings: Vec<Ordering>,
}

/// A single ordering key.
///
/// The first ordering of a clause points at whatever came before the clause; every ordering after
/// it points at the owning [OrderByClause].
#[derive(Debug, Clone, Serialize)]
pub struct Ordering {
    pub previous_clause: ClauseRef,
    pub expression: Expression,
    pub direction: OrderDirection,
}

impl BodyClause {
    pub fn previous_clause(&self) -> ClauseRef {
        match self {
            BodyClause::AdditionalFrom(clause) => clause.previous_clause,
            BodyClause::SubQueryFrom(clause) => clause.previous_clause,
            BodyClause::Where(clause) => clause.previous_clause,
            BodyClause::OrderBy(clause) => clause.previous_clause,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BodyClause::AdditionalFrom(_) => "additional from",
            BodyClause::SubQueryFrom(_) => "sub-query from",
            BodyClause::Where(_) => "where",
            BodyClause::OrderBy(_) => "order by",
        }
    }

    /// The identifier introduced by from clauses.
    pub fn identifier(&self) -> Option<&Expression> {
        match self {
            BodyClause::AdditionalFrom(clause) => Some(&clause.identifier),
            BodyClause::SubQueryFrom(clause) => Some(&clause.identifier),
            BodyClause::Where(_) | BodyClause::OrderBy(_) => None,
        }
    }

    pub fn as_order_by(&self) -> Option<&OrderByClause> {
        match self {
            BodyClause::OrderBy(clause) => Some(clause),
            _ => None,
        }
    }
}

impl Ordering {
    pub fn new(
        previous_clause: ClauseRef,
        direction: OrderDirection,
        expression: Expression,
    ) -> Self {
        Ordering {
            previous_clause,
            expression,
            direction,
        }
    }
}
