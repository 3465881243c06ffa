//! Deep copies of clause graphs.
//!
//! Cloning a query hands out fresh [QueryId]s, so the copy never gets confused with the original.
//! Every query source (main from clause, additional and sub-query from clauses) that gets copied is
//! recorded in the [QuerySourceMapping] of the [CloneContext], so anything that referenced the old
//! sources, like result operators, can be rebound to the new ones.
use crate::clauses::{BodyClause, ClauseRef, QueryExpression, QueryId, SubQueryFromClause};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// A from clause of a particular query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuerySourceId {
    pub query: QueryId,
    pub clause: ClauseRef,
}

#[derive(Debug, Clone, Default)]
pub struct QuerySourceMapping {
    mappings: HashMap<QuerySourceId, QuerySourceId>,
}

impl QuerySourceMapping {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the previous replacement, if `original` was already mapped.
    pub fn add_mapping(
        &mut self,
        original: QuerySourceId,
        replacement: QuerySourceId,
    ) -> Option<QuerySourceId> {
        self.mappings.insert(original, replacement)
    }

    pub fn get(&self, original: &QuerySourceId) -> Option<QuerySourceId> {
        self.mappings.get(original).copied()
    }

    pub fn contains(&self, original: &QuerySourceId) -> bool {
        self.mappings.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CloneContext {
    query_source_mapping: QuerySourceMapping,
}

impl CloneContext {
    pub fn new(query_source_mapping: QuerySourceMapping) -> Self {
        CloneContext {
            query_source_mapping,
        }
    }

    pub fn query_source_mapping(&self) -> &QuerySourceMapping {
        &self.query_source_mapping
    }

    pub fn query_source_mapping_mut(&mut self) -> &mut QuerySourceMapping {
        &mut self.query_source_mapping
    }
}

impl QueryExpression {
    /// Copies the whole graph, sub-queries included. The copy keeps the parent of the original.
    pub fn clone_with(&self, context: &mut CloneContext) -> QueryExpression {
        self.clone_into_parent(self.parent_query, context)
    }

    /// Copies the graph as a sub-query of `parent`.
    pub fn clone_into_parent(
        &self,
        parent: Option<QueryId>,
        context: &mut CloneContext,
    ) -> QueryExpression {
        let id = QueryId::next();
        debug!("Cloning query {:?} into {:?}", self.id, id);

        let mapping = context.query_source_mapping_mut();
        mapping.add_mapping(
            QuerySourceId {
                query: self.id,
                clause: ClauseRef::MainFrom,
            },
            QuerySourceId {
                query: id,
                clause: ClauseRef::MainFrom,
            },
        );

        let body_clauses = self
            .body_clauses
            .iter()
            .enumerate()
            .map(|(index, clause)| clone_body_clause(self.id, id, index, clause, context))
            .collect();

        QueryExpression {
            id,
            parent_query: parent,
            result_type: self.result_type.clone(),
            expression_tree: self.expression_tree.clone(),
            main_from_clause: self.main_from_clause.clone(),
            body_clauses,
            select_or_group_clause: self.select_or_group_clause.clone(),
        }
    }
}

fn clone_body_clause(
    original_query: QueryId,
    cloned_query: QueryId,
    index: usize,
    clause: &BodyClause,
    context: &mut CloneContext,
) -> BodyClause {
    let map_source = |context: &mut CloneContext| {
        context.query_source_mapping_mut().add_mapping(
            QuerySourceId {
                query: original_query,
                clause: ClauseRef::Body(index),
            },
            QuerySourceId {
                query: cloned_query,
                clause: ClauseRef::Body(index),
            },
        );
    };

    match clause {
        BodyClause::AdditionalFrom(additional_from) => {
            map_source(context);

            BodyClause::AdditionalFrom(additional_from.clone())
        }
        BodyClause::SubQueryFrom(sub_query_from) => {
            map_source(context);

            let sub_query = sub_query_from
                .sub_query
                .clone_into_parent(Some(cloned_query), context);

            BodyClause::SubQueryFrom(SubQueryFromClause {
                previous_clause: sub_query_from.previous_clause,
                identifier: sub_query_from.identifier.clone(),
                sub_query: Box::new(sub_query),
                projection: sub_query_from.projection.clone(),
            })
        }
        BodyClause::Where(where_clause) => BodyClause::Where(where_clause.clone()),
        BodyClause::OrderBy(order_by) => BodyClause::OrderBy(order_by.clone()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mappings_can_be_replaced() {
        let original = QuerySourceId {
            query: QueryId::next(),
            clause: ClauseRef::MainFrom,
        };
        let first = QuerySourceId {
            query: QueryId::next(),
            clause: ClauseRef::MainFrom,
        };
        let second = QuerySourceId {
            query: QueryId::next(),
            clause: ClauseRef::Body(0),
        };

        let mut mapping = QuerySourceMapping::new();
        assert_eq!(None, mapping.add_mapping(original, first));
        assert_eq!(Some(first), mapping.add_mapping(original, second));

        assert_eq!(Some(second), mapping.get(&original));
        assert!(!mapping.contains(&first));
        assert_eq!(1, mapping.len());
    }
}
