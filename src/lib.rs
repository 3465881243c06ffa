//! Turns the fragments recognized in a LINQ-style query into a linked clause graph, and
//! post-processes query results with result operators.
pub mod clauses;
mod error;
pub mod expression;
pub mod parsing;
mod rendering;
pub mod result_operators;
pub mod streamed_data;

#[cfg(test)]
mod test_fixtures;

pub use error::{Error, ErrorKind};
pub use parsing::structure::{build_query_expression, build_query_expression_with, StructureError};
pub use result_operators::ResultOperatorError;
