//! Per-call request header.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Metadata stamped onto every RPC call.
///
/// The caller sets `client_id` and the creation timestamp; the server
/// stamps `method` and `succeeded` during dispatch. Once a call completes
/// the header is immutable and ownership moves to the activity log queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub client_id: String,
    pub date: DateTime<Utc>,
    pub method: String,
    pub succeeded: bool,
}

impl RequestHeader {
    /// Column heading written at the top of a new log file.
    pub const CSV_HEADING: &'static str = "DateCreated,Method,ClientId,Succeeded";

    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            date: Utc::now(),
            method: String::new(),
            succeeded: false,
        }
    }

    /// Render one CSV data row, timestamp in local time.
    ///
    /// Embedded commas in `client_id` or `method` are NOT escaped. This
    /// matches the format existing log consumers already parse and is kept
    /// as a documented limitation.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{}",
            self.date
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S"),
            self.method,
            self.client_id,
            self.succeeded
        )
    }
}
