use crate::clauses::OrderDirection;
use crate::expression::Expression;

/// A recognized piece of the query, not yet linked to anything.
#[derive(Debug, Clone)]
pub enum Fragment {
    Source(SourceFragment),
    Filter(FilterFragment),
    Order(OrderFragment),
}

/// `from identifier in generator`
#[derive(Debug, Clone)]
pub struct SourceFragment {
    pub identifier: Expression,
    /// Usually a lambda producing the sequence.
    pub generator: Expression,
}

/// `where predicate`
#[derive(Debug, Clone)]
pub struct FilterFragment {
    pub predicate: Expression,
}

/// `orderby key` when it starts a group, `thenby key` otherwise.
#[derive(Debug, Clone)]
pub struct OrderFragment {
    pub starts_group: bool,
    pub direction: OrderDirection,
    pub key: Expression,
}

impl Fragment {
    pub fn source(identifier: Expression, generator: Expression) -> Self {
        Fragment::Source(SourceFragment {
            identifier,
            generator,
        })
    }

    pub fn filter(predicate: Expression) -> Self {
        Fragment::Filter(FilterFragment { predicate })
    }

    pub fn order(starts_group: bool, direction: OrderDirection, key: Expression) -> Self {
        Fragment::Order(OrderFragment {
            starts_group,
            direction,
            key,
        })
    }

    pub fn get_name(&self) -> &str {
        match self {
            Fragment::Source(_) => "source",
            Fragment::Filter(_) => "filter",
            Fragment::Order(_) => "order",
        }
    }
}

impl From<SourceFragment> for Fragment {
    fn from(value: SourceFragment) -> Self {
        Fragment::Source(value)
    }
}

impl From<FilterFragment> for Fragment {
    fn from(value: FilterFragment) -> Self {
        Fragment::Filter(value)
    }
}

impl From<OrderFragment> for Fragment {
    fn from(value: OrderFragment) -> Self {
        Fragment::Order(value)
    }
}
