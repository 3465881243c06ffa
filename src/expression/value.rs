use crate::expression::{ObjectType, Type};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A runtime value, as found in a realized query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    Object(ObjectValue),
}

/// An instance of some [ObjectType], with whatever fields the test domain needs to tell
/// instances apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectValue {
    ty: ObjectType,
    fields: BTreeMap<String, Value>,
}

impl ObjectValue {
    pub fn new(ty: ObjectType) -> Self {
        ObjectValue {
            ty,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field<N: Into<String>>(mut self, name: N, value: Value) -> Self {
        self.fields.insert(name.into(), value);

        self
    }

    pub fn ty(&self) -> &ObjectType {
        &self.ty
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Value {
    /// The most specific type of the value. Null has no type of its own, so it gets [Type::Any].
    pub fn static_type(&self) -> Type {
        match self {
            Value::Null => Type::Any,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::String(_) => Type::String,
            Value::Object(object) => Type::Object(object.ty().clone()),
        }
    }

    /// What an empty slot of the given type holds: `null`, unless the type cannot hold it.
    pub fn default_for(ty: &Type) -> Value {
        match ty {
            Type::Bool => Value::Bool(false),
            Type::Int => Value::Int(0),
            _ => Value::Null,
        }
    }

    /// Runtime type check. Null is never an instance of anything.
    pub fn is_instance_of(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Value::Null, _) => false,
            (Value::Object(object), Type::Object(target)) => object.ty().is_subtype_of(target),
            (value, ty) => ty.is_assignable_from(&value.static_type()),
        }
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Value::Object(value)
    }
}
