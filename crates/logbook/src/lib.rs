//! Logbook implementations for Math Relax.
//!
//! All logbooks implement the `mathrelax_core::Logbook` trait. Logging is
//! optional: without a usable `[sheets]` section the no-op logbook is used.

pub mod noop;
pub mod sheets;

use std::sync::Arc;

use mathrelax_config::AppConfig;
use mathrelax_core::Logbook;
use tracing::{info, warn};

pub use noop::NoopLogbook;
pub use sheets::SheetsLogbook;

/// Build the logbook from configuration.
///
/// Never fails: an incomplete sheets setup disables logging with a warning,
/// because losing the log must never stop a tutoring session.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Logbook> {
    let Some(sheets) = config.active_sheets() else {
        return Arc::new(NoopLogbook);
    };

    match SheetsLogbook::from_config(sheets) {
        Ok(logbook) => {
            info!(spreadsheet = %sheets.spreadsheet_id, range = %sheets.range, "Spreadsheet logging enabled");
            Arc::new(logbook)
        }
        Err(e) => {
            warn!(error = %e, "Spreadsheet logging disabled");
            Arc::new(NoopLogbook)
        }
    }
}
