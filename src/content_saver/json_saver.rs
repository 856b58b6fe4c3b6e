use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

/// Timeout for blocking JSON serialization
/// Prevents hangs on pathological data structures
const BLOCKING_SERIALIZATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Write `data` as pretty-printed UTF-8 JSON (non-ASCII kept as-is)
pub async fn save_json(data: serde_json::Value, path: &Path) -> Result<()> {
    // serialization is CPU bound; keep it off the runtime threads
    let blocking_task = tokio::task::spawn_blocking(move || serde_json::to_string_pretty(&data));

    let json_str = match timeout(BLOCKING_SERIALIZATION_TIMEOUT, blocking_task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => return Err(anyhow::anyhow!("JSON serialization task panicked: {e}")),
        Err(_) => {
            return Err(anyhow::anyhow!(
                "JSON serialization timed out after {BLOCKING_SERIALIZATION_TIMEOUT:?}"
            ));
        }
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, json_str)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Serialize any value and write it with [`save_json`]
pub async fn save_serializable<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    let data = serde_json::to_value(value).context("Failed to convert record to JSON")?;
    save_json(data, path).await
}
