//! Local side of a download.

use crate::error::{SftpError, SftpErrorExt};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::warn;

/// Copies `reader` into a new file at `local`. A failed copy removes the partial file.
pub(crate) async fn copy_to_local<R>(reader: &mut R, local: &Path) -> Result<u64, SftpError>
where
    R: AsyncRead + Unpin + Send,
{
    let context = local.display().to_string();
    let mut file = tokio::fs::File::create(local).await.context(context.clone())?;

    let copied = match tokio::io::copy(reader, &mut file).await {
        Ok(copied) => file.flush().await.map(|()| copied),
        Err(e) => Err(e),
    };
    drop(file);

    match copied {
        Ok(copied) => Ok(copied),
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(local).await {
                warn!(local = %context, error = %cleanup, "Failed to remove partial download");
            }
            Err::<u64, _>(e).context(context)
        },
    }
}
