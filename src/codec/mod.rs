//! Type-directed decoding over the closed set of wire-format type tags
//! (spec §6.3). `TypeTag` enumerates every tag; `decode_tagged` is the
//! single recursive dispatch point every composite codec and the operation
//! registry route through, so adding a tag means touching exactly one
//! match arm here instead of a runtime string lookup.

mod composite;

pub use composite::*;

use serde_json::Value;

use crate::cursor::Cursor;
use crate::error::Result;
use crate::render::RenderConfig;

/// A type tag drawn from the closed set in spec §6.3. `List` nests any
/// other tag; there is no other recursive shape in the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    Varint,
    Str,
    Hex,
    Hex20,
    Hex32,
    Hex33,
    Hex65,
    Timestamp,
    Amount,
    Pubkey,
    OptPubkey,
    Permission,
    OptPermission,
    Props,
    PowWork,
    BlockExtensions,
    Beneficiary,
    CommentOptionsExtension,
    ExchangeRate,
    List(Box<TypeTag>),
}

/// Decodes one value of the given tag, returning it as a JSON leaf or tree.
pub fn decode_tagged(tag: &TypeTag, cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    use TypeTag::*;

    Ok(match tag {
        Uint8 => Value::from(cursor.read_u8()?),
        Uint16 => Value::from(cursor.read_u16()?),
        Uint32 => Value::from(cursor.read_u32()?),
        Uint64 => Value::from(cursor.read_u64()?),
        Bool => Value::from(cursor.read_bool()?),
        Varint => Value::from(cursor.read_varint()?),
        Str => Value::from(cursor.read_string()?),
        Hex => Value::from(cursor.read_hex_dynamic()?),
        Hex20 => Value::from(cursor.read_hex_fixed(20)?),
        Hex32 => Value::from(cursor.read_hex_fixed(32)?),
        Hex33 => Value::from(cursor.read_hex_fixed(33)?),
        Hex65 => Value::from(cursor.read_hex_fixed(65)?),
        Timestamp => {
            let secs = cursor.read_u32()?;
            cfg.render_timestamp(secs)
        }
        Amount => composite::decode_amount(cursor, cfg)?,
        Pubkey => composite::decode_pubkey(cursor, cfg)?,
        OptPubkey => match composite::decode_opt(&Pubkey, cursor, cfg)? {
            Some(v) => v,
            None => Value::Null,
        },
        Permission => composite::decode_permission(cursor, cfg)?,
        OptPermission => match composite::decode_opt(&Permission, cursor, cfg)? {
            Some(v) => v,
            None => Value::Null,
        },
        Props => composite::decode_props(cursor, cfg)?,
        PowWork => composite::decode_pow_work(cursor, cfg)?,
        BlockExtensions => composite::decode_block_extensions(cursor, cfg)?,
        Beneficiary => composite::decode_beneficiary(cursor, cfg)?,
        CommentOptionsExtension => composite::decode_comment_options_extension(cursor, cfg)?,
        ExchangeRate => composite::decode_exchange_rate(cursor, cfg)?,
        List(inner) => composite::decode_list(inner, cursor, cfg)?,
    })
}

/// Whether a field of this tag is optional (an `opt<T>` wrapper). Used by
/// the operation decoder to know when an absent field should be dropped
/// from the emitted field map rather than stored as `null`.
pub fn is_optional(tag: &TypeTag) -> bool {
    matches!(tag, TypeTag::OptPubkey | TypeTag::OptPermission)
}
