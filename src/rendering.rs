//! Textual rendering of expressions, types and clause graphs.
//!
//! The output reads like LINQ query syntax. It is meant for error messages and logs, not for
//! parsing back.
use crate::clauses::{
    BodyClause, MainFromClause, OrderByClause, OrderDirection, Ordering, QueryExpression,
    SelectOrGroupClause,
};
use crate::expression::{Expression, ExpressionKind, SequenceKind, Type, Value};
use std::fmt::{Display, Formatter};

/// Renders items with a separator between them.
struct Separated<'a, T>(&'a [T], &'static str);

impl<T: Display> Display for Separated<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some((last, first)) = self.0.split_last() {
            for item in first {
                write!(f, "{}{}", item, self.1)?;
            }

            write!(f, "{}", last)?;
        }

        Ok(())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            // Sequences have no literal form, so we only say what they are.
            ExpressionKind::Constant(_) if self.ty().sequence_kind().is_some() => {
                write!(f, "value({})", self.ty())
            }
            ExpressionKind::Constant(value) => write!(f, "{}", value),
            ExpressionKind::Parameter { name } => write!(f, "{}", name),
            ExpressionKind::Lambda { parameters, body } => match parameters.as_slice() {
                [parameter] => write!(f, "{} => {}", parameter, body),
                parameters => write!(f, "({}) => {}", Separated(parameters, ", "), body),
            },
            ExpressionKind::Convert { operand } => write!(f, "Convert({})", operand),
            ExpressionKind::Member { target, member } => write!(f, "{}.{}", target, member),
            ExpressionKind::Call {
                target,
                method,
                arguments,
            } => {
                if let Some(target) = target {
                    write!(f, "{}.", target)?;
                }

                write!(f, "{}({})", method, Separated(arguments.as_slice(), ", "))
            }
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Any => write!(f, "object"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::String => write!(f, "string"),
            Type::Object(object) => write!(f, "{}", object.name()),
            Type::Sequence {
                kind: SequenceKind::Queryable,
                item,
            } => write!(f, "IQueryable<{}>", item),
            Type::Sequence {
                kind: SequenceKind::Enumerable,
                item,
            } => write!(f, "IEnumerable<{}>", item),
            Type::Function { parameters, result } if parameters.is_empty() => {
                write!(f, "Func<{}>", result)
            }
            Type::Function { parameters, result } => {
                write!(f, "Func<{}, {}>", Separated(parameters.as_slice(), ", "), result)
            }
            Type::Tuple(items) => write!(f, "Tuple<{}>", Separated(items.as_slice(), ", ")),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{:?}", value),
            Value::Object(object) => write!(f, "value({})", object.ty().name()),
        }
    }
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "asc"),
            OrderDirection::Desc => write!(f, "desc"),
        }
    }
}

impl Display for QueryExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.main_from_clause())?;

        for clause in self.body_clauses() {
            write!(f, " {}", clause)?;
        }

        write!(f, " {}", self.select_or_group_clause())
    }
}

impl Display for MainFromClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "from {} in {}", self.identifier, self.query_source)
    }
}

impl Display for BodyClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyClause::AdditionalFrom(clause) => {
                write!(f, "from {} in {}", clause.identifier, clause.from_expression)
            }
            BodyClause::SubQueryFrom(clause) => {
                write!(f, "from {} in ({})", clause.identifier, clause.sub_query)
            }
            BodyClause::Where(clause) => write!(f, "where {}", clause.predicate),
            BodyClause::OrderBy(clause) => write!(f, "{}", clause),
        }
    }
}

impl Display for OrderByClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "orderby {}", Separated(self.orderings.as_slice(), ", "))
    }
}

impl Display for Ordering {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.expression, self.direction)
    }
}

impl Display for SelectOrGroupClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectOrGroupClause::Select(select) if select.distinct => {
                write!(f, "select distinct {}", select.projection)
            }
            SelectOrGroupClause::Select(select) => write!(f, "select {}", select.projection),
            SelectOrGroupClause::Group(group) => {
                write!(f, "group {} by {}", group.group_expression, group.by_expression)
            }
        }
    }
}
