use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::cursor::ByteSource;
use crate::error::Result;

/// Sibling `index_log` file: a packed array of little-endian `uint64`
/// entries. Entry `k` (0-based) is the byte offset at which block number
/// `k+1` begins (spec §6.2).
pub struct IndexLog {
    source: ByteSource,
}

impl IndexLog {
    pub fn open(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join("index_log");
        if !path.exists() {
            debug!(dir = %dir.display(), "no index_log found");
            return Ok(None);
        }
        let source = ByteSource::open(&path)?;
        debug!(entries = source.len() / 8, "loaded index_log");
        Ok(Some(Self { source }))
    }

    pub fn last_block_number(&self) -> u64 {
        (self.source.len() / 8) as u64
    }

    /// Byte offset in the block log at which block number `n` begins.
    /// `n` is 1-based, matching the block-numbering scheme in spec §3.
    pub fn offset_of(&self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let start = 8 * (n as usize - 1);
        let end = start + 8;
        let data = self.source.as_slice();
        let bytes: [u8; 8] = data.get(start..end)?.try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }
}

pub fn shared_index(dir: &Path) -> Result<Option<Arc<IndexLog>>> {
    Ok(IndexLog::open(dir)?.map(Arc::new))
}
