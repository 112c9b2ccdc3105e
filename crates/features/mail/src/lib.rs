//! SMTP mail sending. A [`Mailer`] is bound to one server and one sending account; every
//! message is a multipart body with either a text or an HTML part plus optional file attachments.

mod error;
mod mailer;
mod message;

pub use crate::error::{MailError, MailErrorExt};
pub use crate::mailer::{MailAccount, Mailer};
pub use crate::message::{AttachmentFile, MailContent, build_message, content_type_of, parse_addresses};
pub use jtool_domain::config::MailConfig;
pub use lettre::Message;
pub use lettre::message::Mailbox;
