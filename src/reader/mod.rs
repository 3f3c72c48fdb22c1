//! The block-log reader: memory-maps the log (and, when present, the
//! sibling index), and exposes `blocks()`/`stream()` as single-pass lazy
//! iterators over it (spec §4.5).

mod index;

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::cursor::{ByteSource, Cursor};
use crate::error::{Error, Result};
use crate::model::{decode_block, Block};
use crate::ops::Operation;
use crate::render::RenderConfig;

pub use index::IndexLog;

/// A reader over one block-log file, optionally paired with its
/// `index_log` sibling. Owns the mapped byte source and any cursors
/// derived from it; dropping the reader releases the mapping.
pub struct BlockLogReader {
    source: Arc<ByteSource>,
    index: Option<Arc<IndexLog>>,
    render: RenderConfig,
}

impl BlockLogReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_render_config(path, RenderConfig::default())
    }

    pub fn with_render_config(path: impl AsRef<Path>, render: RenderConfig) -> Result<Self> {
        let path = path.as_ref();
        let source = Arc::new(ByteSource::open(path)?);

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let index = index::shared_index(dir)?;
        debug!(
            path = %path.display(),
            has_index = index.is_some(),
            "opened block-log reader"
        );

        Ok(Self {
            source,
            index,
            render,
        })
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Decodes one block starting at `offset`. The cursor ends just past
    /// that block's trailing `start_offset` field.
    pub fn block_at_offset(&self, offset: u64) -> Result<Block> {
        let mut cursor = Cursor::at(self.source.clone(), offset as usize);
        decode_block(&mut cursor, &self.render)
    }

    /// Looks up block number `n` via the index log. Fails with
    /// `IndexMissing` if no `index_log` was found at construction.
    pub fn block_at_number(&self, n: u64) -> Result<Block> {
        let index = self.index.as_ref().ok_or(Error::IndexMissing)?;
        let offset = index.offset_of(n).ok_or(Error::IndexMissing)?;
        self.block_at_offset(offset)
    }

    /// Blocks in file order. `start` is advisory: if an index is present
    /// and `start` is given, the cursor seeks there directly; otherwise
    /// (or with no index) the cursor starts at offset 0. The sequence
    /// terminates at end-of-file or once a decoded block's `block_num`
    /// exceeds `stop`.
    pub fn blocks(&self, start: Option<u64>, stop: Option<u32>) -> BlockIter {
        let offset = match (start, &self.index) {
            (Some(n), Some(index)) => index.offset_of(n).unwrap_or(0),
            _ => 0,
        };

        BlockIter {
            cursor: Cursor::at(self.source.clone(), offset as usize),
            render: self.render.clone(),
            stop,
            done: false,
        }
    }

    /// Filtered operation stream, flattening every block's transactions
    /// and operations in order (spec §4.5).
    pub fn stream(
        &self,
        start: Option<u64>,
        stop: Option<u32>,
        op_names: &[String],
        raw_ops: bool,
    ) -> OperationStream {
        OperationStream {
            blocks: self.blocks(start, stop),
            op_names: if op_names.is_empty() {
                None
            } else {
                Some(op_names.iter().cloned().collect())
            },
            raw_ops,
            pending: VecDeque::new(),
        }
    }
}

/// Single-pass iterator over decoded blocks. Re-invoking
/// `BlockLogReader::blocks` creates a fresh iterator at a fresh cursor
/// position; this one only ever advances.
pub struct BlockIter {
    cursor: Cursor,
    render: RenderConfig,
    stop: Option<u32>,
    done: bool,
}

impl Iterator for BlockIter {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.is_at_end() {
            return None;
        }

        match decode_block(&mut self.cursor, &self.render) {
            Ok(block) => {
                if let Some(stop) = self.stop {
                    if block.block_num > stop {
                        self.done = true;
                        return None;
                    }
                }
                Some(Ok(block))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Single-pass iterator over filtered operation records.
pub struct OperationStream {
    blocks: BlockIter,
    op_names: Option<HashSet<String>>,
    raw_ops: bool,
    pending: VecDeque<Result<Value>>,
}

impl Iterator for OperationStream {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }

            match self.blocks.next()? {
                Err(err) => return Some(Err(err)),
                Ok(block) => {
                    let block_num = block.block_num;
                    let timestamp = block.timestamp.clone();

                    for (trx_num, trx) in block.transactions.into_iter().enumerate() {
                        for op in trx.operations {
                            let matches = self
                                .op_names
                                .as_ref()
                                .map_or(true, |names| names.contains(&op.op_name));
                            if !matches {
                                continue;
                            }

                            let record = if self.raw_ops {
                                raw_record(block_num, trx_num, op, &timestamp)
                            } else {
                                flat_record(block_num, trx_num, op, &timestamp)
                            };
                            self.pending.push_back(Ok(record));
                        }
                    }
                }
            }
        }
    }
}

fn raw_record(block_num: u32, trx_num: usize, op: Operation, timestamp: &Value) -> Value {
    json!({
        "block_num": block_num,
        "trx_num": trx_num,
        "op": [op.op_name, op.fields],
        "timestamp": timestamp,
    })
}

fn flat_record(block_num: u32, trx_num: usize, op: Operation, timestamp: &Value) -> Value {
    let mut fields = op.fields;
    fields.insert("type".to_string(), json!(op.op_name));
    fields.insert("timestamp".to_string(), timestamp.clone());
    fields.insert("block_num".to_string(), json!(block_num));
    fields.insert("trx_num".to_string(), json!(trx_num));
    serde_json::to_value(fields).expect("field map values are already JSON")
}
