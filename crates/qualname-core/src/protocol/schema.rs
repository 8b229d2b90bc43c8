//! Wire schemas and value-to-type inference.
//!
//! The wire-type set is closed: `boolean`, `int64`, `double`, `string`,
//! `bytes`, `array<T>`, `map<T>` (string keys), `row<schema>` and
//! `nullable<T>`. [`infer_type`] is total over well-formed values:
//!
//! - scalars map to their obvious type;
//! - a bare `null` becomes `nullable<string>`;
//! - collections unify their element types; nulls make the element nullable,
//!   an empty collection defaults its element type to `string`;
//! - collections mixing incompatible element types are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{QualnameError, Result};
use crate::value::{Row, Value};

/// Semantic type of one schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    Int64,
    Double,
    #[serde(rename = "string")]
    Str,
    Bytes,
    Array { element: Box<FieldType> },
    Map { value: Box<FieldType> },
    Row { schema: Schema },
    Nullable { inner: Box<FieldType> },
}

impl FieldType {
    pub fn array(element: FieldType) -> Self {
        FieldType::Array {
            element: Box::new(element),
        }
    }

    pub fn map(value: FieldType) -> Self {
        FieldType::Map {
            value: Box::new(value),
        }
    }

    pub fn nullable(inner: FieldType) -> Self {
        match inner {
            FieldType::Nullable { .. } => inner,
            other => FieldType::Nullable {
                inner: Box::new(other),
            },
        }
    }

    pub fn row(schema: Schema) -> Self {
        FieldType::Row { schema }
    }
}

/// A named, typed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// Ordered list of fields describing a row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style append.
    pub fn with(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rejects duplicate field names.
    pub fn validate(&self) -> Result<()> {
        for (i, f) in self.fields.iter().enumerate() {
            if self.fields.iter().skip(i + 1).any(|o| o.name == f.name) {
                return Err(QualnameError::codec(format!(
                    "duplicate field name in schema: {}",
                    f.name
                )));
            }
            if let FieldType::Row { schema } = &f.ty {
                schema.validate()?;
            }
        }
        Ok(())
    }
}

/// Infer the wire type of a single value.
pub fn infer_type(value: &Value) -> Result<FieldType> {
    Ok(shape_of(value)?.finish())
}

/// Infer a row schema, one field per row field, in declared order.
pub fn infer_schema(row: &Row) -> Result<Schema> {
    let mut schema = Schema::new();
    for (name, value) in row.fields() {
        schema = schema.with(name, infer_type(value)?);
    }
    schema.validate()?;
    Ok(schema)
}

/// Partially-known type used while unifying collection elements.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    /// No evidence yet (empty collection).
    Unknown,
    /// Only nulls seen.
    Null,
    Known(FieldType),
    Array(Box<Shape>),
    Map(Box<Shape>),
    /// Field shapes in declared order; finished only once unification is done.
    Row(Vec<(String, Shape)>),
    Nullable(Box<Shape>),
}

impl Shape {
    fn nullable(self) -> Shape {
        match self {
            Shape::Null | Shape::Nullable(_) => self,
            other => Shape::Nullable(Box::new(other)),
        }
    }

    fn finish(self) -> FieldType {
        match self {
            Shape::Unknown => FieldType::Str,
            Shape::Null => FieldType::nullable(FieldType::Str),
            Shape::Known(t) => t,
            Shape::Array(s) => FieldType::array(s.finish()),
            Shape::Map(s) => FieldType::map(s.finish()),
            Shape::Row(fields) => FieldType::row(Schema {
                fields: fields
                    .into_iter()
                    .map(|(name, s)| Field { name, ty: s.finish() })
                    .collect(),
            }),
            Shape::Nullable(s) => FieldType::nullable(s.finish()),
        }
    }
}

fn shape_of(value: &Value) -> Result<Shape> {
    Ok(match value {
        Value::Null => Shape::Null,
        Value::Bool(_) => Shape::Known(FieldType::Boolean),
        Value::Int(_) => Shape::Known(FieldType::Int64),
        Value::Float(_) => Shape::Known(FieldType::Double),
        Value::Str(_) => Shape::Known(FieldType::Str),
        Value::Bytes(_) => Shape::Known(FieldType::Bytes),
        Value::List(items) => Shape::Array(Box::new(unify_all(items.iter())?)),
        Value::Map(entries) => Shape::Map(Box::new(unify_all(entries.values())?)),
        Value::Row(row) => {
            let mut fields: Vec<(String, Shape)> = Vec::with_capacity(row.len());
            for (name, v) in row.fields() {
                if fields.iter().any(|(n, _)| n == name) {
                    return Err(QualnameError::codec(format!(
                        "duplicate field name in schema: {name}"
                    )));
                }
                fields.push((name.to_string(), shape_of(v)?));
            }
            Shape::Row(fields)
        }
    })
}

fn unify_all<'a>(values: impl Iterator<Item = &'a Value>) -> Result<Shape> {
    let mut acc = Shape::Unknown;
    for v in values {
        acc = unify(acc, shape_of(v)?)?;
    }
    Ok(acc)
}

fn unify(a: Shape, b: Shape) -> Result<Shape> {
    if a == b {
        return Ok(a);
    }
    match (a, b) {
        (Shape::Unknown, other) | (other, Shape::Unknown) => Ok(other),
        (Shape::Null, other) | (other, Shape::Null) => Ok(other.nullable()),
        (Shape::Nullable(x), Shape::Nullable(y)) => Ok(unify(*x, *y)?.nullable()),
        (Shape::Nullable(x), other) | (other, Shape::Nullable(x)) => {
            Ok(unify(*x, other)?.nullable())
        }
        (Shape::Array(x), Shape::Array(y)) => Ok(Shape::Array(Box::new(unify(*x, *y)?))),
        (Shape::Map(x), Shape::Map(y)) => Ok(Shape::Map(Box::new(unify(*x, *y)?))),
        (Shape::Row(x), Shape::Row(y))
            if x.len() == y.len() && x.iter().zip(&y).all(|((a, _), (b, _))| a == b) =>
        {
            let mut fields = Vec::with_capacity(x.len());
            for ((name, a), (_, b)) in x.into_iter().zip(y) {
                fields.push((name, unify(a, b)?));
            }
            Ok(Shape::Row(fields))
        }
        (x, y) => Err(QualnameError::codec(format!(
            "heterogeneous collection: {:?} and {:?}",
            x.finish(),
            y.finish()
        ))),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(infer_type(&Value::Int(42)).unwrap(), FieldType::Int64);
        assert_eq!(infer_type(&Value::from("x")).unwrap(), FieldType::Str);
        assert_eq!(infer_type(&Value::Bool(true)).unwrap(), FieldType::Boolean);
        assert_eq!(
            infer_type(&Value::Null).unwrap(),
            FieldType::nullable(FieldType::Str)
        );
    }

    #[test]
    fn list_with_nulls_is_nullable() {
        let v = Value::List(vec![Value::Int(1), Value::Null, Value::Int(3)]);
        assert_eq!(
            infer_type(&v).unwrap(),
            FieldType::array(FieldType::nullable(FieldType::Int64))
        );
    }

    #[test]
    fn empty_list_defaults_to_string() {
        assert_eq!(
            infer_type(&Value::List(vec![])).unwrap(),
            FieldType::array(FieldType::Str)
        );
    }

    #[test]
    fn empty_inner_list_unifies_with_populated() {
        let v = Value::List(vec![
            Value::List(vec![]),
            Value::List(vec![Value::Float(1.5)]),
        ]);
        assert_eq!(
            infer_type(&v).unwrap(),
            FieldType::array(FieldType::array(FieldType::Double))
        );
    }

    #[test]
    fn rows_with_null_field_unify_to_nullable() {
        let v = Value::List(vec![
            Value::Row(Row::new().with("x", 1)),
            Value::Row(Row::new().with("x", Value::Null)),
        ]);
        assert_eq!(
            infer_type(&v).unwrap(),
            FieldType::array(FieldType::row(
                Schema::new().with("x", FieldType::nullable(FieldType::Int64))
            ))
        );
    }

    #[test]
    fn rows_with_empty_inner_list_unify_with_populated() {
        let v = Value::List(vec![
            Value::Row(Row::new().with("xs", Value::List(vec![]))),
            Value::Row(Row::new().with("xs", vec![Value::Int(1)])),
        ]);
        assert_eq!(
            infer_type(&v).unwrap(),
            FieldType::array(FieldType::row(
                Schema::new().with("xs", FieldType::array(FieldType::Int64))
            ))
        );
    }

    #[test]
    fn rows_with_different_fields_rejected() {
        let v = Value::List(vec![
            Value::Row(Row::new().with("x", 1)),
            Value::Row(Row::new().with("y", 1)),
        ]);
        assert_eq!(infer_type(&v).unwrap_err().code().as_str(), "CODEC_FAILURE");
    }

    #[test]
    fn heterogeneous_list_rejected() {
        let v = Value::List(vec![Value::Int(1), Value::from("a")]);
        let err = infer_type(&v).unwrap_err();
        assert_eq!(err.code().as_str(), "CODEC_FAILURE");
    }

    #[test]
    fn nested_row_schema() {
        let row = Row::new().with("x", 1).with("tags", vec![Value::from("a")]);
        let schema = infer_schema(&row).unwrap();
        assert_eq!(
            schema,
            Schema::new()
                .with("x", FieldType::Int64)
                .with("tags", FieldType::array(FieldType::Str))
        );
    }

    #[test]
    fn duplicate_field_names_rejected() {
        let row = Row::new().with("a", 1).with("a", 2);
        assert!(infer_schema(&row).is_err());
    }

    #[test]
    fn schema_json_shape() {
        let schema = Schema::new().with("arg0", FieldType::nullable(FieldType::Int64));
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": [
                    { "name": "arg0", "type": { "kind": "nullable", "inner": { "kind": "int64" } } }
                ]
            })
        );
    }
}
