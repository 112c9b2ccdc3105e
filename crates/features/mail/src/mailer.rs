use crate::error::{MailError, MailErrorExt};
use crate::message::{AttachmentFile, MailContent, build_message, parse_addresses};
use jtool_domain::config::MailConfig;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::fmt;
use tracing::{info, instrument};

/// The sending account. `receivers` is the default `,` separated recipient list used by
/// [`Mailer::send`].
#[derive(Clone)]
pub struct MailAccount {
    pub sender: String,
    pub sender_name: Option<String>,
    pub password: String,
    pub receivers: String,
}

impl fmt::Debug for MailAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailAccount")
            .field("sender", &self.sender)
            .field("sender_name", &self.sender_name)
            .field("password", &"***")
            .field("receivers", &self.receivers)
            .finish()
    }
}

impl MailAccount {
    /// # Errors
    /// [`MailError::Address`] when `sender` is not an address.
    pub fn mailbox(&self) -> Result<Mailbox, MailError> {
        let address = self.sender.parse::<Address>().context(self.sender.clone())?;
        Ok(Mailbox::new(self.sender_name.clone(), address))
    }
}

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    account: MailAccount,
    from: Mailbox,
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer").field("account", &self.account).finish_non_exhaustive()
    }
}

impl Mailer {
    /// Prepares the transport without connecting. `ssl` selects implicit TLS, otherwise the
    /// connection is upgraded with STARTTLS.
    ///
    /// # Errors
    /// [`MailError::Internal`] for an empty host or a protocol other than smtp/smtps,
    /// [`MailError::Address`] for a bad sender, [`MailError::Transport`] when the relay cannot
    /// be configured.
    pub fn new(config: &MailConfig, account: MailAccount) -> Result<Self, MailError> {
        if config.host.trim().is_empty() {
            return Err(MailError::from("mail host is empty"));
        }
        if !matches!(config.protocol.to_ascii_lowercase().as_str(), "smtp" | "smtps") {
            return Err(MailError::from(format!("unsupported mail protocol `{}`", config.protocol)));
        }

        let from = account.mailbox()?;
        let builder = if config.ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .context(config.host.clone())?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(account.sender.clone(), account.password.clone()))
            .build();

        Ok(Self { transport, account, from })
    }

    pub const fn account(&self) -> &MailAccount {
        &self.account
    }

    /// Sends to the account's default receivers.
    ///
    /// # Errors
    /// [`MailError::Address`] when a receiver does not parse, otherwise as [`Self::send_to`].
    pub async fn send(&self, content: &MailContent) -> Result<(), MailError> {
        let to = parse_addresses(&self.account.receivers)?;
        self.send_to(&to, &[], content).await
    }

    /// Plain-text mail to `,` or `;` separated lists.
    ///
    /// # Errors
    /// [`MailError::Address`] for a bad address, otherwise as [`Self::send_to`].
    pub async fn send_simple(
        &self,
        to: &str,
        cc: Option<&str>,
        subject: &str,
        text: &str,
    ) -> Result<(), MailError> {
        let content = MailContent::builder().subject(subject).content(text).build();
        self.send_lists(to, cc, &content).await
    }

    /// HTML mail to `,` or `;` separated lists.
    ///
    /// # Errors
    /// [`MailError::Address`] for a bad address, otherwise as [`Self::send_to`].
    pub async fn send_html(
        &self,
        to: &str,
        cc: Option<&str>,
        subject: &str,
        html: &str,
    ) -> Result<(), MailError> {
        let content = MailContent::builder().subject(subject).content(html).html(true).build();
        self.send_lists(to, cc, &content).await
    }

    /// Each entry may itself be a separated list.
    ///
    /// # Errors
    /// [`MailError::Address`] for a bad address, otherwise as [`Self::send_to`].
    pub async fn send_to_many(
        &self,
        to: &[&str],
        cc: &[&str],
        content: &MailContent,
    ) -> Result<(), MailError> {
        let to = to.iter().map(|s| parse_addresses(s)).collect::<Result<Vec<_>, _>>()?;
        let cc = cc.iter().map(|s| parse_addresses(s)).collect::<Result<Vec<_>, _>>()?;
        self.send_to(&to.concat(), &cc.concat(), content).await
    }

    /// Reads the attachments, builds the message and hands it to the SMTP transport.
    ///
    /// # Errors
    /// [`MailError::Io`] when an attachment cannot be read, [`MailError::NoRecipients`] for an
    /// empty `to`, [`MailError::Build`] when lettre rejects the message and
    /// [`MailError::Transport`] when delivery fails.
    #[instrument(skip_all, fields(subject = %content.subject, to = to.len()), err)]
    pub async fn send_to(
        &self,
        to: &[Mailbox],
        cc: &[Mailbox],
        content: &MailContent,
    ) -> Result<(), MailError> {
        let mut files = Vec::with_capacity(content.attachments.len());
        for path in &content.attachments {
            files.push(AttachmentFile::read(path).await?);
        }

        let message = build_message(self.from.clone(), to, cc, content, files)?;
        let response = self.transport.send(message).await.context("send")?;
        info!(code = %response.code(), "Mail delivered");
        Ok(())
    }

    async fn send_lists(
        &self,
        to: &str,
        cc: Option<&str>,
        content: &MailContent,
    ) -> Result<(), MailError> {
        let to = parse_addresses(to)?;
        let cc = cc.map(parse_addresses).transpose()?.unwrap_or_default();
        self.send_to(&to, &cc, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> MailAccount {
        MailAccount {
            sender: "robot@example.com".to_owned(),
            sender_name: Some("Robot".to_owned()),
            password: "secret".to_owned(),
            receivers: "ops@example.com".to_owned(),
        }
    }

    #[test]
    fn test_mailer_builds_without_connecting() {
        let config = MailConfig { host: "smtp.example.com".to_owned(), ..MailConfig::default() };
        let mailer = Mailer::new(&config, account()).unwrap();
        assert_eq!(mailer.account().sender, "robot@example.com");
        assert!(!format!("{mailer:?}").contains("secret"));
    }

    #[test]
    fn test_mailer_rejects_empty_host() {
        let err = Mailer::new(&MailConfig::default(), account()).unwrap_err();
        assert!(matches!(err, MailError::Internal { .. }));
    }

    #[test]
    fn test_mailer_rejects_unknown_protocol() {
        let config = MailConfig {
            host: "smtp.example.com".to_owned(),
            protocol: "imap".to_owned(),
            ..MailConfig::default()
        };
        assert!(Mailer::new(&config, account()).is_err());
    }

    #[test]
    fn test_sender_mailbox_keeps_display_name() {
        let mailbox = account().mailbox().unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Robot"));
    }
}
