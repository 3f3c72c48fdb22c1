//! End-to-end scenarios, hand-built byte fixtures (no external test-vector
//! files exist for this wire format).

use std::io::Write;

use serde_json::json;
use steem_block_log::{BlockLogReader, Error};

fn write_block_log(dir: &std::path::Path, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join("block_log");
    std::fs::write(&path, bytes).unwrap();
    path
}

/// S1 — single empty block.
#[test]
fn s1_single_empty_block() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0u8; 20]); // previous
    bytes.extend_from_slice(&0u32.to_le_bytes()); // timestamp
    bytes.push(0); // witness = ""
    bytes.extend_from_slice(&[0u8; 20]); // merkle
    bytes.push(0); // block_extensions count
    bytes.extend_from_slice(&[0u8; 65]); // witness_signature
    bytes.push(0); // transactions count
    bytes.extend_from_slice(&0u64.to_le_bytes()); // start_offset

    let path = write_block_log(dir.path(), &bytes);
    let reader = BlockLogReader::open(&path).unwrap();
    let blocks: Vec<_> = reader.blocks(None, None).collect::<steem_block_log::Result<_>>().unwrap();

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].block_num, 1);
    assert_eq!(blocks[0].block_id, "00000001");
    assert!(blocks[0].transactions.is_empty());
}

/// S2 — transfer operation, rendered with amount_format = string.
#[test]
fn s2_transfer_operation() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 65]);

    bytes.push(1); // one transaction
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(1); // one operation

    bytes.push(0x02); // transfer
    bytes.push(5);
    bytes.extend_from_slice(b"alice");
    bytes.push(3);
    bytes.extend_from_slice(b"bob");
    bytes.extend_from_slice(&[0xD2, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03]);
    bytes.extend_from_slice(b"STEEM\0\0");
    bytes.push(0); // memo = ""

    bytes.push(0); // extensions
    bytes.push(0); // signatures

    bytes.extend_from_slice(&0u64.to_le_bytes());

    let path = write_block_log(dir.path(), &bytes);
    let reader = BlockLogReader::open(&path).unwrap();
    let block = reader.blocks(None, None).next().unwrap().unwrap();

    let op = &block.transactions[0].operations[0];
    assert_eq!(op.op_name, "transfer");
    assert_eq!(op.fields["from"], json!("alice"));
    assert_eq!(op.fields["to"], json!("bob"));
    assert_eq!(op.fields["amount"], json!("1.234 STEEM"));
    assert_eq!(op.fields["memo"], json!(""));
}

/// S3 — optional field absent: `account_update` with `owner` flag false.
#[test]
fn s3_optional_absent() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 65]);

    bytes.push(1);
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(1);

    bytes.push(0x0A); // account_update
    bytes.push(4);
    bytes.extend_from_slice(b"jane");
    bytes.push(0); // owner absent
    bytes.push(0); // active absent
    bytes.push(0); // posting absent
    bytes.extend_from_slice(&[0u8; 33]); // memo_key
    bytes.push(0); // json_metadata

    bytes.push(0);
    bytes.push(0);
    bytes.extend_from_slice(&0u64.to_le_bytes());

    let path = write_block_log(dir.path(), &bytes);
    let reader = BlockLogReader::open(&path).unwrap();
    let block = reader.blocks(None, None).next().unwrap().unwrap();
    let op = &block.transactions[0].operations[0];

    assert!(!op.fields.contains_key("owner"));
    assert!(!op.fields.contains_key("active"));
    assert!(!op.fields.contains_key("posting"));
}

/// S4 — unknown op-id (16) is fatal and reports the op byte offset.
#[test]
fn s4_unknown_op_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 65]);

    bytes.push(1);
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(1);
    let op_offset = bytes.len();
    bytes.push(16); // unknown op-id

    let path = write_block_log(dir.path(), &bytes);
    let reader = BlockLogReader::open(&path).unwrap();
    let result = reader.blocks(None, None).next().unwrap();

    match result {
        Err(Error::UnknownOperation { op_id, offset }) => {
            assert_eq!(op_id, 16);
            assert_eq!(offset, op_offset);
        }
        other => panic!("expected UnknownOperation, got {other:?}"),
    }
}

/// S5 — filtered stream over a block with two operations (vote, transfer)
/// yields exactly the transfer, with the right trx_num.
#[test]
fn s5_filtered_stream() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 20]);
    bytes.push(0);
    bytes.extend_from_slice(&[0u8; 65]);

    bytes.push(1); // one transaction
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(2); // two operations

    bytes.push(0x00); // vote
    bytes.push(5);
    bytes.extend_from_slice(b"alice");
    bytes.push(5);
    bytes.extend_from_slice(b"carol");
    bytes.push(4);
    bytes.extend_from_slice(b"post");
    bytes.extend_from_slice(&10000u16.to_le_bytes());

    bytes.push(0x02); // transfer
    bytes.push(5);
    bytes.extend_from_slice(b"alice");
    bytes.push(3);
    bytes.extend_from_slice(b"bob");
    bytes.extend_from_slice(&[0xD2, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03]);
    bytes.extend_from_slice(b"STEEM\0\0");
    bytes.push(0);

    bytes.push(0);
    bytes.push(0);
    bytes.extend_from_slice(&0u64.to_le_bytes());

    let path = write_block_log(dir.path(), &bytes);
    let reader = BlockLogReader::open(&path).unwrap();
    let names = vec!["transfer".to_string()];
    let records: Vec<_> = reader
        .stream(None, None, &names, false)
        .collect::<steem_block_log::Result<_>>()
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["type"], json!("transfer"));
    assert_eq!(records[0]["trx_num"], json!(0));
}

/// S6 — indexed lookup: `index_log` with three entries, `block_at_number(2)`
/// returns the block starting at the second entry's offset.
#[test]
fn s6_indexed_lookup() {
    let dir = tempfile::tempdir().unwrap();

    fn empty_block(start_offset: u64) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&[0u8; 20]);
        b.extend_from_slice(&0u32.to_le_bytes());
        b.push(0);
        b.extend_from_slice(&[0u8; 20]);
        b.push(0);
        b.extend_from_slice(&[0u8; 65]);
        b.push(0);
        b.extend_from_slice(&start_offset.to_le_bytes());
        b
    }

    let b1 = empty_block(0);
    let off2 = b1.len() as u64;
    let b2 = empty_block(off2);
    let off3 = off2 + b2.len() as u64;
    let b3 = empty_block(off3);

    let mut all = b1.clone();
    all.extend_from_slice(&b2);
    all.extend_from_slice(&b3);
    let block_path = write_block_log(dir.path(), &all);

    let index_path = dir.path().join("index_log");
    let mut idx = std::fs::File::create(&index_path).unwrap();
    idx.write_all(&0u64.to_le_bytes()).unwrap();
    idx.write_all(&off2.to_le_bytes()).unwrap();
    idx.write_all(&off3.to_le_bytes()).unwrap();
    drop(idx);

    let reader = BlockLogReader::open(&block_path).unwrap();
    let block = reader.block_at_number(2).unwrap();
    assert_eq!(block.start_offset, off2);
}
