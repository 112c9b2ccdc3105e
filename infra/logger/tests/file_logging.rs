use jtool_logger::{LevelFilter, Logger, Rotation};
use std::time::Duration;

#[test]
fn test_file_sink_writes_log() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let logs = dir.path().join("nested").join("logs");

    let logger = Logger::builder()
        .name("file-app")
        .console(false)
        .level(LevelFilter::INFO)
        .path(&logs)
        .rotation(Rotation::NEVER)
        .max_files(2)
        .init()?;

    assert!(logger.has_file());
    tracing::info!(user = "alice", "written to disk");
    drop(logger);
    std::thread::sleep(Duration::from_millis(50));

    let files: Vec<_> = std::fs::read_dir(&logs)?.flatten().map(|e| e.path()).collect();
    assert!(files.iter().any(|p| p.extension().is_some_and(|e| e == "log")));

    let body = std::fs::read_to_string(&files[0])?;
    assert!(body.contains("written to disk"));
    Ok(())
}
