//! Streaming file write shared by every writer.
//!
//! The file is opened once, chunks are written strictly in order, and the
//! handle is closed on every exit path. When a write fails the close is
//! still attempted, but the write error is the one returned.

use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::{WriteError, WriteResult};
use crate::models::FileSummary;

/// Write `chunks` to `path` in order and report how many were written.
///
/// Parent directories are created as needed and an existing file is
/// truncated.
pub async fn write_chunks<I, C>(path: &Path, chunks: I) -> WriteResult<FileSummary>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut file = open_for_write(path).await?;

    let written = write_all(&mut file, path, chunks).await;
    let closed = close(file, path).await;

    // The write error takes precedence over a failed close.
    let entry_count = written?;
    closed?;

    Ok(FileSummary {
        file_path: path.display().to_string(),
        entry_count,
    })
}

async fn open_for_write(path: &Path) -> WriteResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    File::create(path).await.map_err(|source| WriteError::Open {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_all<I, C>(file: &mut File, path: &Path, chunks: I) -> WriteResult<usize>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut count = 0;
    for chunk in chunks {
        file.write_all(chunk.as_ref())
            .await
            .map_err(|source| WriteError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        count += 1;
    }

    // tokio hands writes to a background task; flushing surfaces their errors here
    file.flush().await.map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(count)
}

async fn close(mut file: File, path: &Path) -> WriteResult<()> {
    file.shutdown().await.map_err(|source| WriteError::Close {
        path: path.to_path_buf(),
        source,
    })
}
