use crate::error::{MailError, MailErrorExt};
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use std::path::{Path, PathBuf};
use typed_builder::TypedBuilder;

const OCTET_STREAM: &str = "application/octet-stream";

/// Subject, body and attachments of one message.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MailContent {
    #[builder(setter(into))]
    pub subject: String,
    #[builder(setter(into))]
    pub content: String,
    /// Sends `content` as `text/html` instead of `text/plain`.
    #[builder(default)]
    pub html: bool,
    #[builder(default)]
    pub attachments: Vec<PathBuf>,
}

/// An attachment already read into memory.
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }

    /// Loads `path`, named after its file name.
    ///
    /// # Errors
    /// [`MailError::Io`] when the file cannot be read.
    pub async fn read(path: &Path) -> Result<Self, MailError> {
        let bytes = tokio::fs::read(path).await.context(path.display().to_string())?;
        let name = path
            .file_name()
            .map_or_else(|| "attachment".to_owned(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }
}

/// Splits a `,` or `;` separated address list. Blank entries are skipped.
///
/// # Errors
/// [`MailError::Address`] for the first entry that does not parse.
pub fn parse_addresses(list: &str) -> Result<Vec<Mailbox>, MailError> {
    list.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Mailbox>().context(s.to_owned()))
        .collect()
}

/// Content type guessed from the file extension.
///
/// # Errors
/// [`MailError::Internal`] if the table entry fails to parse.
pub fn content_type_of(file_name: &str) -> Result<ContentType, MailError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "txt" | "log" => "text/plain",
        "htm" | "html" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => OCTET_STREAM,
    };

    ContentType::parse(mime).map_err(|e| MailError::from(format!("content type {mime}: {e}")))
}

/// Assembles the multipart message: the body part first, then each attachment in order.
///
/// # Errors
/// [`MailError::NoRecipients`] for an empty `to`, [`MailError::Build`] when lettre rejects the
/// message.
pub fn build_message(
    from: Mailbox,
    to: &[Mailbox],
    cc: &[Mailbox],
    content: &MailContent,
    attachments: Vec<AttachmentFile>,
) -> Result<Message, MailError> {
    if to.is_empty() {
        return Err(MailError::NoRecipients { context: Some(content.subject.clone().into()) });
    }

    let mut builder = Message::builder().from(from).subject(content.subject.as_str()).date_now();
    for mailbox in to {
        builder = builder.to(mailbox.clone());
    }
    for mailbox in cc {
        builder = builder.cc(mailbox.clone());
    }

    let body = if content.html {
        SinglePart::html(content.content.clone())
    } else {
        SinglePart::plain(content.content.clone())
    };

    let mut parts = MultiPart::mixed().singlepart(body);
    for file in attachments {
        let content_type = content_type_of(&file.name)?;
        parts = parts.singlepart(Attachment::new(file.name).body(file.bytes, content_type));
    }

    Ok(builder.multipart(parts)?)
}
