use indexmap::IndexMap;
use serde_json::{json, Value};

use super::TypeTag;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::render::RenderConfig;

/// `uint64 raw`, `uint8 precision`, 7 raw bytes of NUL-padded ASCII symbol.
pub fn decode_amount(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let raw = cursor.read_u64()?;
    let precision = cursor.read_u8()?;
    let symbol_bytes = cursor.read_fixed_bytes(7)?;
    let symbol_offset = cursor.offset() - 7;
    let symbol = String::from_utf8(symbol_bytes)
        .map_err(|_| Error::Encoding {
            offset: symbol_offset,
        })?
        .trim_end_matches('\0')
        .to_string();
    Ok(cfg.render_amount(raw, precision, &symbol))
}

/// Fixed 33 raw bytes, rendered per `RenderConfig::key_format`.
pub fn decode_pubkey(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let bytes = cursor.read_fixed_bytes(33)?;
    let arr: [u8; 33] = bytes.try_into().expect("read_fixed_bytes(33) returns 33 bytes");
    Ok(cfg.render_pubkey(&arr))
}

/// `pubkey` + `uint16` weight, as a `[pubkey, weight]` pair.
pub fn decode_key_authority(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let key = decode_pubkey(cursor, cfg)?;
    let weight = cursor.read_u16()?;
    Ok(json!([key, weight]))
}

/// `string` account name + `uint16` weight, as a `[account, weight]` pair.
pub fn decode_account_authority(cursor: &mut Cursor, _cfg: &RenderConfig) -> Result<Value> {
    let account = cursor.read_string()?;
    let weight = cursor.read_u16()?;
    Ok(json!([account, weight]))
}

/// `{weight_threshold, account_auths: [...], key_auths: [...]}`.
pub fn decode_permission(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let weight_threshold = cursor.read_u32()?;

    let n_accounts = cursor.read_u8()?;
    let mut account_auths = Vec::with_capacity(n_accounts as usize);
    for _ in 0..n_accounts {
        account_auths.push(decode_account_authority(cursor, cfg)?);
    }

    let n_keys = cursor.read_u8()?;
    let mut key_auths = Vec::with_capacity(n_keys as usize);
    for _ in 0..n_keys {
        key_auths.push(decode_key_authority(cursor, cfg)?);
    }

    Ok(json!({
        "weight_threshold": weight_threshold,
        "account_auths": account_auths,
        "key_auths": key_auths,
    }))
}

/// `amount account_creation_fee`, `uint32 maximum_block_size`, `uint16 sbd_interest_rate`.
pub fn decode_props(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let account_creation_fee = decode_amount(cursor, cfg)?;
    let maximum_block_size = cursor.read_u32()?;
    let sbd_interest_rate = cursor.read_u16()?;
    Ok(json!({
        "account_creation_fee": account_creation_fee,
        "maximum_block_size": maximum_block_size,
        "sbd_interest_rate": sbd_interest_rate,
    }))
}

/// `uint8 variant` discriminates a legacy scalar-nonce proof (0) from an
/// Equihash proof (1). Both end in a trailing `uint32 pow_summary`.
pub fn decode_pow_work(cursor: &mut Cursor, _cfg: &RenderConfig) -> Result<Value> {
    let offset = cursor.offset();
    let variant = cursor.read_u8()?;

    match variant {
        0 => {
            let worker_account = cursor.read_string()?;
            let prev_block = cursor.read_hex_fixed(20)?;
            let nonce = cursor.read_u64()?;
            let pow_summary = cursor.read_u32()?;
            Ok(json!({
                "worker_account": worker_account,
                "prev_block": prev_block,
                "nonce": nonce,
                "pow_summary": pow_summary,
            }))
        }
        1 => {
            let n = cursor.read_u32()?;
            let k = cursor.read_u32()?;
            let seed = cursor.read_hex_fixed(32)?;
            let n_inputs = cursor.read_varint()?;
            let mut inputs = Vec::with_capacity(n_inputs as usize);
            for _ in 0..n_inputs {
                inputs.push(cursor.read_u32()?);
            }
            let prev_block = cursor.read_hex_fixed(20)?;
            let pow_summary = cursor.read_u32()?;
            Ok(json!({
                "n": n,
                "k": k,
                "seed": seed,
                "inputs": inputs,
                "prev_block": prev_block,
                "pow_summary": pow_summary,
            }))
        }
        other => Err(Error::UnknownTag {
            what: "pow_work variant",
            tag: other,
            offset,
        }),
    }
}

/// `uint8 count` (not varint — the wire format requires a single byte
/// here, unlike every other list in the format), then `count` entries of
/// `{hf_format, major, minor, release}`, with `hf_format = 1` carrying a
/// trailing `timestamp`.
pub fn decode_block_extensions(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let count = cursor.read_u8()?;
    let mut entries = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let offset = cursor.offset();
        let hf_format = cursor.read_u8()?;
        let major = cursor.read_u8()?;
        let minor = cursor.read_u8()?;
        let release = cursor.read_u16()?;
        let hf_version = format!("{major}.{minor}.{release}");

        let entry = match hf_format {
            0 => json!([0, hf_version]),
            1 => {
                let secs = cursor.read_u32()?;
                let hf_time = cfg.render_timestamp(secs);
                json!([1, { "hf_version": hf_version, "hf_time": hf_time }])
            }
            other => {
                return Err(Error::UnknownTag {
                    what: "block_extensions hf_format",
                    tag: other,
                    offset,
                })
            }
        };
        entries.push(entry);
    }

    Ok(Value::Array(entries))
}

/// `string account` + `uint16 weight`.
pub fn decode_beneficiary(cursor: &mut Cursor, _cfg: &RenderConfig) -> Result<Value> {
    let account = cursor.read_string()?;
    let weight = cursor.read_u16()?;
    Ok(json!({ "account": account, "weight": weight }))
}

/// `uint8 ext_id`; only `0` is defined.
pub fn decode_comment_options_extension(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let offset = cursor.offset();
    let ext_id = cursor.read_u8()?;
    if ext_id != 0 {
        return Err(Error::UnknownTag {
            what: "comment_options_extension ext_id",
            tag: ext_id,
            offset,
        });
    }
    let beneficiaries = decode_list(&TypeTag::Beneficiary, cursor, cfg)?;
    Ok(json!([0, { "beneficiaries": beneficiaries }]))
}

/// Two `amount`s, `{base, quote}`.
pub fn decode_exchange_rate(cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let base = decode_amount(cursor, cfg)?;
    let quote = decode_amount(cursor, cfg)?;
    Ok(json!({ "base": base, "quote": quote }))
}

/// One `bool` flag; if false the value is absent and no further bytes are
/// read.
pub fn decode_opt(inner: &TypeTag, cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Option<Value>> {
    if cursor.read_bool()? {
        Ok(Some(super::decode_tagged(inner, cursor, cfg)?))
    } else {
        Ok(None)
    }
}

/// `varint count` followed by `count` values of the inner tag.
pub fn decode_list(inner: &TypeTag, cursor: &mut Cursor, cfg: &RenderConfig) -> Result<Value> {
    let count = cursor.read_varint()?;
    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(super::decode_tagged(inner, cursor, cfg)?);
    }
    Ok(Value::Array(items))
}

/// Builds the ordered field map a single decoded operation emits, dropping
/// any optional field whose presence flag was false.
pub fn decode_field_map(
    fields: &[(&'static str, TypeTag)],
    cursor: &mut Cursor,
    cfg: &RenderConfig,
) -> Result<IndexMap<String, Value>> {
    let mut map = IndexMap::with_capacity(fields.len());
    for (name, tag) in fields {
        let value = super::decode_tagged(tag, cursor, cfg)?;
        if value.is_null() && super::is_optional(tag) {
            continue;
        }
        map.insert((*name).to_string(), value);
    }
    Ok(map)
}
