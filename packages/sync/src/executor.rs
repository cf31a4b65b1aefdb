//! Block executor speaking JSON to an HTTP device bridge.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use outbreak_core::{Address, BlockReader, BlockValue, BlockWriter, CancellationToken};

use crate::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct BlockBody {
    value: BlockValue,
}

#[derive(Debug, Serialize, Deserialize)]
struct WriteBody {
    value: BlockValue,
    expected: BlockValue,
}

#[derive(Debug, Serialize, Deserialize)]
struct WriteOutcome {
    written: bool,
}

/// A block executor backed by a blocking HTTP client.
///
/// Maps block operations to requests against a device bridge:
/// - `read_block(address)` performs `GET {base}/blocks/{address}`;
///   404 means the block is absent
/// - `write_block(...)` performs `POST {base}/blocks/{address}` with
///   `{"value", "expected"}` and reads back `{"written": bool}`
///
/// # Example
///
/// ```ignore
/// use outbreak_sync::{HttpBlockExecutor, Session};
///
/// let executor = HttpBlockExecutor::new("http://127.0.0.1:8080")?;
/// let session = Session::connect(executor, "http://127.0.0.1:8080");
/// ```
pub struct HttpBlockExecutor {
    client: Client,
    base_url: Url,
}

impl HttpBlockExecutor {
    /// Create an executor for the bridge at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create an executor whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create an executor with a custom reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("{} cannot be a base URL", base_url),
            });
        }
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn block_url(&self, address: Address) -> Result<Url, Error> {
        self.base_url
            .join(&format!("blocks/{}", address))
            .map_err(Error::from)
    }

    fn get(&self, address: Address) -> Result<Option<BlockValue>, Error> {
        let url = self.block_url(address)?;
        tracing::trace!(%url, "GET block");

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: BlockBody = serde_json::from_str(&response.text()?)?;
        Ok(Some(body.value))
    }

    fn post(
        &self,
        value: &BlockValue,
        address: Address,
        expected: &BlockValue,
    ) -> Result<bool, Error> {
        let url = self.block_url(address)?;
        tracing::trace!(%url, %value, %expected, "POST block");

        let response = self
            .client
            .post(url.clone())
            .json(&WriteBody {
                value: *value,
                expected: *expected,
            })
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let outcome: WriteOutcome = serde_json::from_str(&response.text()?)?;
        Ok(outcome.written)
    }
}

impl BlockReader for HttpBlockExecutor {
    fn read_block(&mut self, address: Address) -> Result<Option<BlockValue>, outbreak_core::Error> {
        Ok(self.get(address)?)
    }
}

impl BlockWriter for HttpBlockExecutor {
    fn write_block(
        &mut self,
        value: &BlockValue,
        address: Address,
        cancel: &CancellationToken,
        expected: &BlockValue,
    ) -> Result<bool, outbreak_core::Error> {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        Ok(self.post(value, address, expected)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_core::{resolve, FieldKind, SlotIndex};

    #[test]
    fn block_urls_keep_base_path() {
        let executor = HttpBlockExecutor::new("http://bridge.local/device").unwrap();
        let address = resolve(SlotIndex::new(4).unwrap(), FieldKind::NumDefeated);
        assert_eq!(
            executor.block_url(address).unwrap().as_str(),
            "http://bridge.local/device/blocks/outbreak/4/num_defeated"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            HttpBlockExecutor::new("mailto:device@example.com"),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpBlockExecutor::new("not a url"),
            Err(Error::UrlParse(_))
        ));
    }

    #[test]
    fn cancelled_write_sends_nothing() {
        // Port 9 is discard; a request would fail with a transport error.
        let mut executor = HttpBlockExecutor::new("http://127.0.0.1:9").unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let address = resolve(SlotIndex::new(1).unwrap(), FieldKind::Found);
        assert!(!executor
            .write_block(&BlockValue::Bool(true), address, &token, &BlockValue::Bool(false))
            .unwrap());
    }

    #[test]
    fn wire_bodies() {
        let body = serde_json::to_value(WriteBody {
            value: BlockValue::I32(7),
            expected: BlockValue::I32(5),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "value": {"type": "i32", "value": 7},
                "expected": {"type": "i32", "value": 5}
            })
        );
    }
}
