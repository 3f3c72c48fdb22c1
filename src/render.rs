use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{Error, Result};

/// How a decoded `timestamp` is shaped on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// A decomposed UTC instant, `{year, month, day, hour, minute, second}`.
    Datetime,
    /// Raw unix seconds.
    Unix,
    /// `"YYYY-MM-DDTHH:MM:SS"`, UTC, no fractional seconds, no zone suffix.
    String,
}

/// How a decoded `amount` is shaped on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFormat {
    /// `{amount: decimal, asset: symbol}`.
    Structured,
    /// `"<amount to precision> <symbol>"`.
    String,
}

/// How a decoded `pubkey` is shaped on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// 66-char lowercase hex of the 33 compressed bytes.
    Hex,
    /// Delegates to the injected renderer in `RenderConfig::pubkey_renderer`.
    String,
}

/// A pure function from 33 raw compressed-key bytes to a rendered address
/// string (e.g. base58-with-checksum, prefixed by a chain-specific string).
/// Injected rather than hard-coded, since address rendering policy is out
/// of scope for this crate (see spec §1's Out of scope list).
pub type PubkeyRenderer = dyn Fn(&[u8; 33]) -> String + Send + Sync;

/// Output-shape configuration. Fixed for a reader's lifetime; validated
/// eagerly at construction so a misconfiguration never surfaces mid-stream.
#[derive(Clone)]
pub struct RenderConfig {
    pub timestamp_format: TimestampFormat,
    pub amount_format: AmountFormat,
    pub key_format: KeyFormat,
    pubkey_renderer: Option<Arc<PubkeyRenderer>>,
}

impl std::fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderConfig")
            .field("timestamp_format", &self.timestamp_format)
            .field("amount_format", &self.amount_format)
            .field("key_format", &self.key_format)
            .field("pubkey_renderer", &self.pubkey_renderer.is_some())
            .finish()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::String,
            amount_format: AmountFormat::String,
            key_format: KeyFormat::Hex,
            pubkey_renderer: None,
        }
    }
}

impl RenderConfig {
    pub fn new(
        timestamp_format: TimestampFormat,
        amount_format: AmountFormat,
        key_format: KeyFormat,
        pubkey_renderer: Option<Arc<PubkeyRenderer>>,
    ) -> Result<Self> {
        if key_format == KeyFormat::String && pubkey_renderer.is_none() {
            return Err(Error::ConfigInvalid(
                "key_format = string requires a pubkey_renderer",
            ));
        }
        Ok(Self {
            timestamp_format,
            amount_format,
            key_format,
            pubkey_renderer,
        })
    }

    pub fn render_timestamp(&self, unix_secs: u32) -> Value {
        match self.timestamp_format {
            TimestampFormat::Unix => json!(unix_secs),
            TimestampFormat::String => json!(format_datetime(unix_secs)),
            TimestampFormat::Datetime => {
                let (y, mo, d, h, mi, s) = decompose_unix(unix_secs);
                json!({ "year": y, "month": mo, "day": d, "hour": h, "minute": mi, "second": s })
            }
        }
    }

    pub fn render_amount(&self, raw: u64, precision: u8, symbol: &str) -> Value {
        let scale = 10f64.powi(precision as i32);
        let amount = raw as f64 / scale;
        match self.amount_format {
            AmountFormat::Structured => json!({ "amount": amount, "asset": symbol }),
            AmountFormat::String => {
                json!(format!("{:.*} {}", precision as usize, amount, symbol))
            }
        }
    }

    pub fn render_pubkey(&self, raw: &[u8; 33]) -> Value {
        match self.key_format {
            KeyFormat::Hex => json!(hex::encode(raw)),
            KeyFormat::String => {
                let renderer = self
                    .pubkey_renderer
                    .as_ref()
                    .expect("validated at construction");
                json!(renderer(raw))
            }
        }
    }
}

/// Days-from-civil algorithm (Howard Hinnant's); avoids pulling in a date
/// crate the rest of the corpus does not otherwise depend on for this
/// narrow unix-seconds-to-UTC-calendar conversion.
fn decompose_unix(unix_secs: u32) -> (i64, u32, u32, u32, u32, u32) {
    let days = unix_secs as i64 / 86_400;
    let rem = unix_secs as i64 % 86_400;
    let (hour, minute, second) = ((rem / 3600) as u32, ((rem / 60) % 60) as u32, (rem % 60) as u32);

    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = if month <= 2 { y + 1 } else { y };

    (year, month, day, hour, minute, second)
}

fn format_datetime(unix_secs: u32) -> String {
    let (y, mo, d, h, mi, s) = decompose_unix(unix_secs);
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}")
}
