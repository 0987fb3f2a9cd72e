use crate::domain::model::{OperationRequest, ResultRecord};
use crate::utils::error::Result;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Reads input records and writes results for the command-line binary.
#[derive(Debug, Clone)]
pub struct LocalRecordIo {
    input: String,
    output: Option<String>,
}

impl LocalRecordIo {
    pub fn new(input: String, output: Option<String>) -> Self {
        Self { input, output }
    }

    /// 輸入可以是陣列，也可以是單一物件
    pub fn read_records(&self) -> Result<Vec<OperationRequest>> {
        let raw = if self.input == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            fs::read_to_string(&self.input)?
        };

        parse_records(&raw)
    }

    pub fn write_results(&self, results: &[ResultRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;

        match &self.output {
            Some(path) => {
                if let Some(parent) = Path::new(path).parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, json)?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", json)?;
            }
        }
        Ok(())
    }

    /// 寫出結果並回傳派送結果；派送已失敗時，寫檔錯誤只記錄不覆蓋
    pub fn finish(&self, results: &[ResultRecord], outcome: Result<()>) -> Result<()> {
        match (self.write_results(results), outcome) {
            (Ok(()), outcome) => outcome,
            (Err(write_err), Err(dispatch_err)) => {
                tracing::error!("Failed to write partial results: {}", write_err);
                Err(dispatch_err)
            }
            (Err(write_err), Ok(())) => Err(write_err),
        }
    }
}

pub fn parse_records(raw: &str) -> Result<Vec<OperationRequest>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let records = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Payload;
    use crate::utils::error::ConnectorError;
    use tempfile::TempDir;

    #[test]
    fn test_parse_single_object_and_array() {
        let single = parse_records(r#"{"operation": "getMenu", "venueId": "123"}"#).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].venue_id, "123");
        assert_eq!(single[0].data, Payload::default());

        let many = parse_records(
            r#"[{"operation": "getMenu", "venueId": "1"}, {"operation": "updateItems", "venueId": "2", "data": "{}"}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].data, Payload::Raw("{}".to_string()));
    }

    #[test]
    fn test_write_results_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("nested").join("results.json");
        let io = LocalRecordIo::new("-".to_string(), Some(out.to_str().unwrap().to_string()));

        io.write_results(&[ResultRecord::success(serde_json::json!({"ok": true}))])
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written[0]["json"]["ok"], serde_json::json!(true));
    }

    #[test]
    fn test_finish_keeps_dispatch_error_when_write_fails() {
        let temp_dir = TempDir::new().unwrap();
        // 父路徑是檔案，寫入必定失敗
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let out = blocker.join("results.json");
        let io = LocalRecordIo::new("-".to_string(), Some(out.to_str().unwrap().to_string()));

        let dispatch_err = ConnectorError::RecordFailed {
            index: 1,
            operation: "updateItems".to_string(),
            source: Box::new(ConnectorError::HttpStatusError {
                status: 400,
                body: "bad".to_string(),
            }),
        };
        let results = vec![ResultRecord::success(serde_json::json!({"ok": true}))];

        let err = io.finish(&results, Err(dispatch_err)).unwrap_err();
        assert!(matches!(err, ConnectorError::RecordFailed { index: 1, .. }));

        let err = io.finish(&results, Ok(())).unwrap_err();
        assert!(matches!(err, ConnectorError::IoError(_)));
    }
}
