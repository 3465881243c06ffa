//! Expressions are the building blocks handed to us by the recognizer.
//!
//! We never look inside them much: they carry a static type, they can be rendered for error
//! messages, and they are compared by *identity*. Two expressions are equal only if they are the
//! same node, no matter how similar they look. Cloning an [Expression] is cheap and keeps the
//! identity, because it only clones a handle to the shared node.
mod types;
mod value;

pub use types::{ObjectType, SequenceKind, Type};
pub use value::{ObjectValue, Value};

use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_EXPRESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExpressionId(u64);

impl ExpressionId {
    fn next() -> Self {
        ExpressionId(NEXT_EXPRESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone)]
pub struct Expression(Arc<ExpressionNode>);

#[derive(Debug, Serialize)]
struct ExpressionNode {
    id: ExpressionId,
    #[serde(rename = "type")]
    ty: Type,
    kind: ExpressionKind,
}

#[derive(Debug, Serialize)]
#[serde(tag = "node", content = "data", rename_all = "snake_case")]
pub enum ExpressionKind {
    Constant(Value),
    Parameter {
        name: String,
    },
    Lambda {
        parameters: Vec<Expression>,
        body: Expression,
    },
    /// A type conversion; the expression's own type is the conversion target.
    Convert {
        operand: Expression,
    },
    Member {
        target: Expression,
        member: String,
    },
    Call {
        target: Option<Expression>,
        method: String,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    fn from_kind(ty: Type, kind: ExpressionKind) -> Self {
        Expression(Arc::new(ExpressionNode {
            id: ExpressionId::next(),
            ty,
            kind,
        }))
    }

    /// A constant typed after its own value.
    pub fn constant(value: Value) -> Self {
        let ty = value.static_type();

        Self::from_kind(ty, ExpressionKind::Constant(value))
    }

    /// A constant whose static type is wider than the value itself, like a `GoodStudent` held
    /// as a `Student`.
    pub fn typed_constant(value: Value, ty: Type) -> Self {
        Self::from_kind(ty, ExpressionKind::Constant(value))
    }

    pub fn parameter<N: Into<String>>(name: N, ty: Type) -> Self {
        Self::from_kind(ty, ExpressionKind::Parameter { name: name.into() })
    }

    pub fn lambda(parameters: Vec<Expression>, body: Expression) -> Self {
        let ty = Type::function(
            parameters.iter().map(|p| p.ty().clone()).collect(),
            body.ty().clone(),
        );

        Self::from_kind(ty, ExpressionKind::Lambda { parameters, body })
    }

    pub fn convert(operand: Expression, ty: Type) -> Self {
        Self::from_kind(ty, ExpressionKind::Convert { operand })
    }

    pub fn member<M: Into<String>>(target: Expression, member: M, ty: Type) -> Self {
        Self::from_kind(
            ty,
            ExpressionKind::Member {
                target,
                member: member.into(),
            },
        )
    }

    pub fn call<M: Into<String>>(
        target: Option<Expression>,
        method: M,
        arguments: Vec<Expression>,
        ty: Type,
    ) -> Self {
        Self::from_kind(
            ty,
            ExpressionKind::Call {
                target,
                method: method.into(),
                arguments,
            },
        )
    }

    pub fn id(&self) -> ExpressionId {
        self.0.id
    }

    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    pub fn kind(&self) -> &ExpressionKind {
        &self.0.kind
    }

    /// Strips one enclosing lambda, giving back its body. Anything else is returned as is.
    pub fn unwrap_lambda(&self) -> &Expression {
        match self.kind() {
            ExpressionKind::Lambda { body, .. } => body,
            _ => self,
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self.kind() {
            ExpressionKind::Constant(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

impl Serialize for Expression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}
