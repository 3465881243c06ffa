//! Shared building blocks for tests: a small `Student` domain and the expressions the builder
//! tests keep reaching for.
use crate::expression::{Expression, ObjectType, ObjectValue, Type, Value};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn student() -> ObjectType {
    ObjectType::new("Student")
}

pub fn good_student() -> ObjectType {
    ObjectType::derived("GoodStudent", &student())
}

pub fn student_type() -> Type {
    Type::Object(student())
}

pub fn a_student() -> Value {
    ObjectValue::new(student())
        .with_field("name", Value::String("Maria".into()))
        .into()
}

/// A fresh `IQueryable<Student>` source. Every call is a different expression.
pub fn create_query_source() -> Expression {
    Expression::typed_constant(Value::Null, Type::queryable(student_type()))
}

pub fn create_parameter_expression() -> Expression {
    Expression::parameter("i", Type::Int)
}

/// `() => 0`
pub fn create_lambda_expression() -> Expression {
    Expression::lambda(vec![], Expression::constant(Value::Int(0)))
}
