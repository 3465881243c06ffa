use serde::{Deserialize, Serialize};

/// Static types of expressions, and runtime types of values.
///
/// Only the shapes the query structure cares about are modelled: object hierarchies (for runtime
/// type filtering) and the generic sequence shapes result operators check their input against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// The root of every hierarchy, everything is assignable to it.
    Any,
    Bool,
    Int,
    String,
    Object(ObjectType),
    Sequence {
        kind: SequenceKind,
        item: Box<Type>,
    },
    Function {
        parameters: Vec<Type>,
        result: Box<Type>,
    },
    Tuple(Vec<Type>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Can still be translated to a backing store.
    Queryable,
    /// Lives in memory.
    Enumerable,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectType {
    name: String,
    base: Option<Box<ObjectType>>,
}

impl ObjectType {
    pub fn new<N: Into<String>>(name: N) -> Self {
        ObjectType {
            name: name.into(),
            base: None,
        }
    }

    pub fn derived<N: Into<String>>(name: N, base: &ObjectType) -> Self {
        ObjectType {
            name: name.into(),
            base: Some(Box::new(base.clone())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&ObjectType> {
        self.base.as_deref()
    }

    /// True for the type itself and for anything derived from it.
    pub fn is_subtype_of(&self, other: &ObjectType) -> bool {
        let mut current = Some(self);

        while let Some(ty) = current {
            if ty == other {
                return true;
            }

            current = ty.base();
        }

        false
    }
}

impl Type {
    pub fn object<N: Into<String>>(name: N) -> Self {
        Type::Object(ObjectType::new(name))
    }

    pub fn sequence(kind: SequenceKind, item: Type) -> Self {
        Type::Sequence {
            kind,
            item: Box::new(item),
        }
    }

    pub fn queryable(item: Type) -> Self {
        Self::sequence(SequenceKind::Queryable, item)
    }

    pub fn enumerable(item: Type) -> Self {
        Self::sequence(SequenceKind::Enumerable, item)
    }

    pub fn function(parameters: Vec<Type>, result: Type) -> Self {
        Type::Function {
            parameters,
            result: Box::new(result),
        }
    }

    pub fn sequence_kind(&self) -> Option<SequenceKind> {
        match self {
            Type::Sequence { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn sequence_item(&self) -> Option<&Type> {
        match self {
            Type::Sequence { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Whether a null value can be held by this type.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, Type::Bool | Type::Int)
    }

    /// Can a value of type `other` be stored in something of this type?
    ///
    /// Queryables are enumerables too, and both are covariant in their items.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Any, _) => true,
            (Type::Object(target), Type::Object(source)) => source.is_subtype_of(target),
            (
                Type::Sequence {
                    kind: target_kind,
                    item: target_item,
                },
                Type::Sequence {
                    kind: source_kind,
                    item: source_item,
                },
            ) => {
                let kind_matches =
                    target_kind == source_kind || *target_kind == SequenceKind::Enumerable;

                kind_matches && target_item.is_assignable_from(source_item)
            }
            _ => self == other,
        }
    }
}
