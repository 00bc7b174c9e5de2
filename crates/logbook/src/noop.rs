//! No-op logbook: used when no spreadsheet is configured.

use async_trait::async_trait;
use mathrelax_core::error::LogbookError;
use mathrelax_core::logbook::{LogRow, Logbook};

/// A logbook that accepts and discards every row.
pub struct NoopLogbook;

#[async_trait]
impl Logbook for NoopLogbook {
    fn name(&self) -> &str { "none" }

    async fn append(&self, _row: LogRow) -> Result<(), LogbookError> {
        Ok(())
    }
}
