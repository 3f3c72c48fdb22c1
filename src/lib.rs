//! Reader for Steem-style blockchain block-log files.
//!
//! A block log is a flat, append-only file of serialized blocks; paired
//! with an optional fixed-width `index_log` sibling, it can be read
//! sequentially or by block number. This crate owns the binary decoder —
//! a recursive, type-directed deserializer over a memory-mapped buffer —
//! and a streaming interface over the decoded blocks and their operations.
//!
//! Higher-level concerns (chain clients, wallets, RPC, signature/merkle
//! verification, the block-log writer) are explicitly out of scope; see
//! `SPEC_FULL.md` for the full boundary.

pub mod codec;
pub mod cursor;
pub mod error;
pub mod model;
pub mod ops;
pub mod reader;
pub mod render;

pub use cursor::{ByteSource, Cursor};
pub use error::{Error, Result};
pub use model::{Block, Transaction};
pub use ops::{operation_name, Operation, OperationSchema};
pub use reader::{BlockIter, BlockLogReader, IndexLog, OperationStream};
pub use render::{AmountFormat, KeyFormat, PubkeyRenderer, RenderConfig, TimestampFormat};
