use crate::error::{SftpError, SftpErrorExt};
use crate::local::copy_to_local;
use crate::paths::{ancestors, is_dot_entry, matches_filter, remote_path};
use async_trait::async_trait;
use jtool_domain::config::SftpConfig;
use russh::client::{self, Handle};
use russh::Disconnect;
use russh_keys::key::PublicKey;
use russh_sftp::client::SftpSession;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(60);

/// Accepts any host key, as password-only transfers to internal hosts always have.
#[derive(Debug)]
struct TrustingHandler;

#[async_trait]
impl client::Handler for TrustingHandler {
    type Error = russh::Error;

    async fn check_server_key(&mut self, key: &PublicKey) -> Result<bool, Self::Error> {
        debug!(algorithm = key.name(), "Accepting server key");
        Ok(true)
    }
}

pub struct SftpClient {
    session: Handle<TrustingHandler>,
    sftp: SftpSession,
    host: String,
}

impl fmt::Debug for SftpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SftpClient").field("host", &self.host).finish_non_exhaustive()
    }
}

impl SftpClient {
    /// Opens an SSH session with password auth and starts the `sftp` subsystem.
    ///
    /// # Errors
    /// [`SftpError::Internal`] for an empty host, [`SftpError::Auth`] when the password is
    /// rejected, [`SftpError::Ssh`] or [`SftpError::Sftp`] when the handshake fails.
    #[instrument(skip_all, fields(host = %config.host, port = config.port), err)]
    pub async fn connect(config: &SftpConfig) -> Result<Self, SftpError> {
        if config.host.trim().is_empty() {
            return Err(SftpError::from("sftp host is empty"));
        }

        let ssh_config =
            client::Config { inactivity_timeout: Some(INACTIVITY_TIMEOUT), ..Default::default() };
        let mut session = client::connect(
            Arc::new(ssh_config),
            (config.host.as_str(), config.port),
            TrustingHandler,
        )
        .await
        .context("connect")?;

        let authenticated = session
            .authenticate_password(config.username.as_str(), config.password.as_str())
            .await
            .context("authenticate")?;
        if !authenticated {
            return Err(SftpError::Auth { user: config.username.clone(), context: None });
        }

        let channel = session.channel_open_session().await.context("open channel")?;
        channel.request_subsystem(true, "sftp").await.context("request subsystem")?;
        let sftp = SftpSession::new(channel.into_stream()).await.context("start session")?;

        info!("SFTP session opened");
        Ok(Self { session, sftp, host: config.host.clone() })
    }

    /// # Errors
    /// [`SftpError::Sftp`] when the server cannot stat `path`.
    pub async fn is_dir(&self, path: &str) -> Result<bool, SftpError> {
        if !self.sftp.try_exists(path).await.context(path.to_owned())? {
            return Ok(false);
        }
        Ok(self.sftp.metadata(path).await.context(path.to_owned())?.is_dir())
    }

    /// Creates `path` and any missing parents.
    ///
    /// # Errors
    /// [`SftpError::Sftp`] when a level cannot be checked or created.
    pub async fn create_dir(&self, path: &str) -> Result<(), SftpError> {
        for dir in ancestors(path) {
            if !self.sftp.try_exists(dir.as_str()).await.context(dir.clone())? {
                self.sftp.create_dir(dir.as_str()).await.context(dir.clone())?;
                debug!(%dir, "Created remote directory");
            }
        }
        Ok(())
    }

    /// # Errors
    /// [`SftpError::Sftp`] when the server refuses the removal.
    pub async fn delete_file(&self, path: &str) -> Result<(), SftpError> {
        self.sftp.remove_file(path).await.context(path.to_owned())?;
        debug!(%path, "Deleted remote file");
        Ok(())
    }

    /// Names of the regular files directly under `dir`.
    ///
    /// # Errors
    /// [`SftpError::Sftp`] when `dir` cannot be read.
    pub async fn list_files(&self, dir: &str) -> Result<Vec<String>, SftpError> {
        let entries = self.sftp.read_dir(dir).await.context(dir.to_owned())?;
        let mut names: Vec<String> = entries
            .filter(|entry| !entry.file_type().is_dir())
            .map(|entry| entry.file_name())
            .filter(|name| !is_dot_entry(name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Streams `remote_dir/remote_name` into `writer` and returns the bytes copied.
    ///
    /// # Errors
    /// [`SftpError::Sftp`] when the remote file cannot be opened, [`SftpError::Io`] when the
    /// copy or flush fails.
    pub async fn download_to<W>(
        &self,
        remote_dir: &str,
        remote_name: &str,
        writer: &mut W,
    ) -> Result<u64, SftpError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let path = remote_path(remote_dir, remote_name);
        let mut remote = self.sftp.open(path.as_str()).await.context(path.clone())?;
        let copied = tokio::io::copy(&mut remote, writer).await.context(path.clone())?;
        writer.flush().await.context(path)?;
        Ok(copied)
    }

    /// Downloads into `local_dir/local_name`, creating the local directory. Returns `false`
    /// when the remote file does not exist. A failed transfer removes the partial local file.
    ///
    /// # Errors
    /// [`SftpError::Io`] for local directory or file failures and broken transfers,
    /// [`SftpError::Sftp`] for remote failures.
    pub async fn download_file(
        &self,
        remote_dir: &str,
        remote_name: &str,
        local_dir: impl AsRef<Path>,
        local_name: &str,
    ) -> Result<bool, SftpError> {
        let path = remote_path(remote_dir, remote_name);
        if !self.sftp.try_exists(path.as_str()).await.context(path.clone())? {
            warn!(%path, "Remote file not found");
            return Ok(false);
        }

        let local_dir = local_dir.as_ref();
        tokio::fs::create_dir_all(local_dir).await.context(local_dir.display().to_string())?;
        let local = local_dir.join(local_name);
        let mut remote = self.sftp.open(path.as_str()).await.context(path.clone())?;
        let bytes = copy_to_local(&mut remote, &local).await?;

        info!(%path, local = %local.display(), bytes, "Downloaded");
        Ok(true)
    }

    /// Downloads every regular file in `remote_dir` whose name passes the prefix and suffix
    /// filter. Returns the local paths written.
    ///
    /// # Errors
    /// The first failure from [`SftpClient::download_file`] or [`SftpClient::delete_file`];
    /// files already written stay in place.
    pub async fn batch_download(
        &self,
        remote_dir: &str,
        local_dir: impl AsRef<Path>,
        prefix: Option<&str>,
        suffix: Option<&str>,
        delete_remote: bool,
    ) -> Result<Vec<String>, SftpError> {
        let local_dir = local_dir.as_ref();
        let mut downloaded = Vec::new();

        for name in self.list_files(remote_dir).await? {
            if !matches_filter(&name, prefix, suffix) {
                continue;
            }
            if self.download_file(remote_dir, &name, local_dir, &name).await? {
                downloaded.push(local_dir.join(&name).display().to_string());
                if delete_remote {
                    self.delete_file(&remote_path(remote_dir, &name)).await?;
                }
            }
        }

        Ok(downloaded)
    }

    /// Writes `reader` to `remote_dir/remote_name`, creating the remote directory first.
    ///
    /// # Errors
    /// [`SftpError::Sftp`] when the directory or file cannot be created, [`SftpError::Io`] when
    /// the copy fails.
    pub async fn upload_from<R>(
        &self,
        remote_dir: &str,
        remote_name: &str,
        reader: &mut R,
    ) -> Result<u64, SftpError>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.create_dir(remote_dir).await?;
        let path = remote_path(remote_dir, remote_name);
        let mut remote = self.sftp.create(path.as_str()).await.context(path.clone())?;
        let copied = tokio::io::copy(reader, &mut remote).await.context(path.clone())?;
        remote.shutdown().await.context(path)?;
        Ok(copied)
    }

    /// # Errors
    /// [`SftpError::Io`] when the local file cannot be opened, otherwise as
    /// [`SftpClient::upload_from`].
    pub async fn upload_file(
        &self,
        remote_dir: &str,
        remote_name: &str,
        local_dir: impl AsRef<Path>,
        local_name: &str,
    ) -> Result<(), SftpError> {
        let local = local_dir.as_ref().join(local_name);
        let mut file = tokio::fs::File::open(&local).await.context(local.display().to_string())?;
        let bytes = self.upload_from(remote_dir, remote_name, &mut file).await?;
        info!(local = %local.display(), remote = %remote_path(remote_dir, remote_name), bytes, "Uploaded");
        Ok(())
    }

    /// Uploads the regular files directly under `local_dir`. Returns the uploaded names.
    ///
    /// # Errors
    /// [`SftpError::Io`] when `local_dir` cannot be listed or a local file cannot be removed,
    /// otherwise the first failure from [`SftpClient::upload_file`].
    pub async fn batch_upload(
        &self,
        remote_dir: &str,
        local_dir: impl AsRef<Path>,
        delete_local: bool,
    ) -> Result<Vec<String>, SftpError> {
        let local_dir = local_dir.as_ref();
        let context = local_dir.display().to_string();
        let mut entries = tokio::fs::read_dir(local_dir).await.context(context.clone())?;
        let mut uploaded = Vec::new();

        while let Some(entry) = entries.next_entry().await.context(context.clone())? {
            if !entry.file_type().await.context(context.clone())?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            self.upload_file(remote_dir, &name, local_dir, &name).await?;
            if delete_local {
                tokio::fs::remove_file(entry.path()).await.context(name.clone())?;
            }
            uploaded.push(name);
        }

        Ok(uploaded)
    }

    /// # Errors
    /// [`SftpError::Sftp`] or [`SftpError::Ssh`] when the close handshake fails.
    pub async fn disconnect(self) -> Result<(), SftpError> {
        self.sftp.close().await.context("close sftp")?;
        self.session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .context("disconnect")?;
        info!(host = %self.host, "SFTP session closed");
        Ok(())
    }
}
