//! The operation registry: a frozen op-id -> schema table, and the
//! `Operation` decode entry point built on top of it.

mod registry;

use indexmap::IndexMap;
use serde_json::Value;

pub use registry::{operation_name, schema_for};

use crate::codec::decode_field_map;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::render::RenderConfig;

/// An ordered sequence of `(field_name, type_tag)` pairs: the decode order
/// and the emission order are the same thing (spec §3, `OperationSchema`).
pub struct OperationSchema {
    pub name: &'static str,
    pub fields: Vec<(&'static str, crate::codec::TypeTag)>,
}

/// A decoded operation: its canonical name paired with its ordered field
/// map (spec §3, `Operation`).
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub op_name: String,
    pub fields: IndexMap<String, Value>,
}

impl serde::Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("op_name", &self.op_name)?;
        map.serialize_entry("fields", &self.fields)?;
        map.end()
    }
}

/// Reads a `uint8` op-id, looks up its schema, and decodes its fields in
/// schema order. Unknown op-ids are fatal (`UnknownOperation`); there is no
/// length prefix that would let a decoder skip past one safely.
pub fn decode_operation(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Operation> {
    let offset = cursor.offset();
    let op_id = cursor.read_u8()?;

    let schema = schema_for(op_id).ok_or(Error::UnknownOperation { op_id, offset })?;
    let fields = decode_field_map(&schema.fields, cursor, cfg)?;

    Ok(Operation {
        op_name: schema.name.to_string(),
        fields,
    })
}
