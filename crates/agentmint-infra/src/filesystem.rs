//! Data directory resolution and atomic file writes.

use std::path::{Path, PathBuf};

/// Resolve the AgentMint data directory.
///
/// Priority:
/// 1. `AGENTMINT_DATA_DIR` environment variable
/// 2. `~/.agentmint` via `dirs::home_dir()`
/// 3. `.agentmint` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AGENTMINT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".agentmint");
    }

    PathBuf::from(".agentmint")
}

/// Replace `path` with `bytes` so readers never see a half-written file.
///
/// Writes a sibling temp file, syncs it, then renames it over the target.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let file = {
        use tokio::io::AsyncWriteExt;
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file
    };
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_ends_with_agentmint() {
        if std::env::var("AGENTMINT_DATA_DIR").is_ok() {
            return;
        }
        let dir = resolve_data_dir();
        assert!(dir.ends_with(".agentmint"));
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("agents.json");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "second");
        assert!(!tmp.path().join("nested").join("agents.json.tmp").exists());
    }
}
