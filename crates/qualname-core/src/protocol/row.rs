//! Row codec: schema-directed binary encoding of records (panic-free).
//!
//! Layout (all integers little-endian):
//! - row: `u32` field count, then each field value in schema order
//! - `boolean`: one byte, `0` or `1`
//! - `int64` / `double`: 8 bytes
//! - `string` / `bytes`: `u32` length + raw bytes (`string` must be UTF-8)
//! - `array<T>`: `u32` count + elements
//! - `map<T>`: `u32` count + (`string` key, `T` value) pairs
//! - `nullable<T>`: presence byte (`0` = null, `1` = present) + `T`
//!
//! Parsing rules:
//! - Never index raw buffers; always check `remaining()` before `get_*`.
//! - Trailing bytes after the top-level row are an error.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{QualnameError, Result};
use crate::protocol::schema::{FieldType, Schema};
use crate::value::{Row, Value};

/// Encode `row` under `schema`. Field names and order must match exactly.
pub fn encode_row(schema: &Schema, row: &Row) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    put_row(&mut buf, schema, row)?;
    Ok(buf.freeze())
}

/// Decode a row previously produced by [`encode_row`] with the same schema.
pub fn decode_row(schema: &Schema, mut buf: Bytes) -> Result<Row> {
    let row = get_row(&mut buf, schema)?;
    if buf.has_remaining() {
        return Err(QualnameError::codec(format!(
            "{} trailing bytes after row",
            buf.remaining()
        )));
    }
    Ok(row)
}

fn put_len(buf: &mut BytesMut, n: usize) -> Result<()> {
    let n = u32::try_from(n).map_err(|_| QualnameError::codec("length exceeds u32"))?;
    buf.put_u32_le(n);
    Ok(())
}

fn put_row(buf: &mut BytesMut, schema: &Schema, row: &Row) -> Result<()> {
    if row.len() != schema.len() {
        return Err(QualnameError::codec(format!(
            "row has {} fields, schema declares {}",
            row.len(),
            schema.len()
        )));
    }
    put_len(buf, schema.len())?;
    for (field, (name, value)) in schema.fields.iter().zip(row.fields()) {
        if field.name != name {
            return Err(QualnameError::codec(format!(
                "field order mismatch: schema has {}, row has {name}",
                field.name
            )));
        }
        put_value(buf, &field.ty, value)?;
    }
    Ok(())
}

fn put_value(buf: &mut BytesMut, ty: &FieldType, value: &Value) -> Result<()> {
    match (ty, value) {
        (FieldType::Nullable { .. }, v) if v.is_null() => buf.put_u8(0),
        (FieldType::Nullable { inner }, v) => {
            buf.put_u8(1);
            put_value(buf, inner, v)?;
        }
        (FieldType::Boolean, Value::Bool(b)) => buf.put_u8(u8::from(*b)),
        (FieldType::Int64, Value::Int(i)) => buf.put_i64_le(*i),
        (FieldType::Double, Value::Float(f)) => buf.put_f64_le(*f),
        (FieldType::Str, Value::Str(s)) => {
            put_len(buf, s.len())?;
            buf.put_slice(s.as_bytes());
        }
        (FieldType::Bytes, Value::Bytes(b)) => {
            put_len(buf, b.len())?;
            buf.put_slice(b);
        }
        (FieldType::Array { element }, Value::List(items)) => {
            put_len(buf, items.len())?;
            for item in items {
                put_value(buf, element, item)?;
            }
        }
        (FieldType::Map { value: vt }, Value::Map(entries)) => {
            put_len(buf, entries.len())?;
            for (k, v) in entries {
                put_len(buf, k.len())?;
                buf.put_slice(k.as_bytes());
                put_value(buf, vt, v)?;
            }
        }
        (FieldType::Row { schema }, Value::Row(r)) => put_row(buf, schema, r)?,
        (ty, v) => {
            return Err(QualnameError::codec(format!(
                "{} value does not match declared type {ty:?}",
                v.kind()
            )))
        }
    }
    Ok(())
}

fn need(buf: &Bytes, n: usize, what: &str) -> Result<()> {
    if buf.remaining() < n {
        return Err(QualnameError::codec(format!(
            "truncated {what}: need {n} bytes, have {}",
            buf.remaining()
        )));
    }
    Ok(())
}

fn get_len(buf: &mut Bytes) -> Result<usize> {
    need(buf, 4, "length")?;
    Ok(buf.get_u32_le() as usize)
}

fn get_blob(buf: &mut Bytes, what: &str) -> Result<Bytes> {
    let n = get_len(buf)?;
    need(buf, n, what)?;
    Ok(buf.copy_to_bytes(n))
}

fn get_string(buf: &mut Bytes) -> Result<String> {
    let raw = get_blob(buf, "string")?;
    String::from_utf8(raw.to_vec()).map_err(|e| QualnameError::codec(format!("invalid utf-8: {e}")))
}

fn get_row(buf: &mut Bytes, schema: &Schema) -> Result<Row> {
    let n = get_len(buf)?;
    if n != schema.len() {
        return Err(QualnameError::codec(format!(
            "encoded row has {n} fields, schema declares {}",
            schema.len()
        )));
    }
    let mut row = Row::new();
    for field in &schema.fields {
        let v = get_value(buf, &field.ty)?;
        row.push(field.name.clone(), v);
    }
    Ok(row)
}

fn get_value(buf: &mut Bytes, ty: &FieldType) -> Result<Value> {
    let v = match ty {
        FieldType::Nullable { inner } => {
            need(buf, 1, "presence byte")?;
            match buf.get_u8() {
                0 => Value::Null,
                1 => get_value(buf, inner)?,
                other => {
                    return Err(QualnameError::codec(format!(
                        "invalid presence byte: {other}"
                    )))
                }
            }
        }
        FieldType::Boolean => {
            need(buf, 1, "boolean")?;
            match buf.get_u8() {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => return Err(QualnameError::codec(format!("invalid boolean: {other}"))),
            }
        }
        FieldType::Int64 => {
            need(buf, 8, "int64")?;
            Value::Int(buf.get_i64_le())
        }
        FieldType::Double => {
            need(buf, 8, "double")?;
            Value::Float(buf.get_f64_le())
        }
        FieldType::Str => Value::Str(get_string(buf)?),
        FieldType::Bytes => Value::Bytes(get_blob(buf, "bytes")?.to_vec()),
        FieldType::Array { element } => {
            let n = get_len(buf)?;
            // Every element consumes at least one byte; do not trust `n` for allocation.
            let mut items = Vec::new();
            for _ in 0..n {
                items.push(get_value(buf, element)?);
            }
            Value::List(items)
        }
        FieldType::Map { value: vt } => {
            let n = get_len(buf)?;
            let mut entries = std::collections::BTreeMap::new();
            for _ in 0..n {
                let k = get_string(buf)?;
                let v = get_value(buf, vt)?;
                entries.insert(k, v);
            }
            Value::Map(entries)
        }
        FieldType::Row { schema } => Value::Row(get_row(buf, schema)?),
    };
    Ok(v)
}
