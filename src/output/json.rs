//! JSON output.

use std::io::Write;

use serde::Serialize;

use super::{OutputError, ResultWriter};
use crate::extract::{ProgressState, SessionResult, SessionStatus, StopReason};
use crate::models::Record;

#[derive(Debug, Clone, Default)]
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct Report<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopped: Option<StopReason>,
    pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<ProgressState>,
    count: usize,
    records: &'a [Record],
}

impl ResultWriter for JsonWriter {
    fn write<W: Write>(&self, result: &SessionResult, out: W) -> Result<(), OutputError> {
        let stopped = match result.status {
            SessionStatus::Complete => None,
            SessionStatus::StuckPartial(reason) => Some(reason),
        };
        let report = Report {
            status: result.status.as_str(),
            stopped,
            pages: result.pages,
            progress: result.last_progress,
            count: result.records.len(),
            records: &result.records,
        };
        serde_json::to_writer_pretty(out, &report)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{result, stuck};
    use super::*;

    fn render(result: &SessionResult) -> serde_json::Value {
        let mut buf = Vec::new();
        JsonWriter::new().write(result, &mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_json_complete() {
        let json = render(&result(SessionStatus::Complete));
        assert_eq!(json["status"], "complete");
        assert!(json.get("stopped").is_none());
        assert_eq!(json["count"], 2);
        assert_eq!(json["records"][0]["Denomination"], "FARMACIA CENTRALE");
        assert_eq!(json["records"][1]["Tax ID"], "");
    }

    #[test]
    fn test_json_stuck_reason() {
        let json = render(&result(stuck()));
        assert_eq!(json["status"], "stuck_partial");
        assert_eq!(json["stopped"]["reason"], "advance");
        assert_eq!(json["stopped"]["kind"], "retries_exhausted");
        assert_eq!(json["stopped"]["attempts"], 7);
    }
}
