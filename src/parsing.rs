//! What the recognizer hands over: query fragments in textual order, plus the projections that
//! belong to them. [structure] links them into a clause graph.
mod collector;
mod fragments;
pub mod structure;

pub use collector::ParseResultCollector;
pub use fragments::{FilterFragment, Fragment, OrderFragment, SourceFragment};
