use std::fs;
use std::path::{Path, PathBuf};

use channelboard_client::SuccessEnvelope;
use serde_json::Value;
use tempfile::{Builder, TempDir};

pub fn temp_home_in_tmp(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir_in("/tmp")?;
    let home = dir.path().join("board-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_fixture(base: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    let path = base.join(name);
    fs::write(&path, body)?;
    Ok(path)
}

pub fn payload(result: channelboard_client::ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok(), "command failed: {:?}", result.as_ref().err());
    if let Ok(success) = result {
        let value = serde_json::to_value(success);
        assert!(value.is_ok());
        if let Ok(value) = value {
            return value;
        }
    }
    Value::Null
}

pub fn error_code(result: channelboard_client::ClientResult<SuccessEnvelope>) -> Option<String> {
    result.err().map(|error| error.code)
}

pub fn store_report_csv() -> String {
    [
        "Transaction Date,Transaction Type,Transaction Amount,Developer Rev Share",
        "2024-03-01,Purchase,\"1,200.50\",840.35",
        "2024-03-02,Cancellation,-4.99,-3.49",
        "2024-03-03,Purchase,0,0",
        "2024-03-04,Refund,2.00,1.40",
    ]
    .join("\n")
}

pub fn direct_report_csv() -> String {
    [
        "Transaction Date,Transaction Type,Transaction Amount,Video Title",
        "2024-01-15,purchase,10.00,Intro",
        "2024-01-20,purchase,5.00,Finale",
        "2024-02-01,cancellation,-5.00,Intro",
        "not a date,purchase,1.50,Intro",
    ]
    .join("\n")
}
