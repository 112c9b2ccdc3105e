//! XML through quick-xml's serde support.
//!
//! Struct fields become child elements; fields renamed with a leading `@` become attributes
//! and `$text` holds element text. Date fields marked `#[serde(with = "xml_date")]` use the
//! pattern given to [`to_xml_with_date_format`] or [`from_xml_with_date_format`], and
//! `yyyy-MM-dd HH:mm:ss` otherwise.

use crate::CodecError;
use quick_xml::se::Serializer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;

thread_local! {
    static DATE_FORMAT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sets the date pattern for this thread until dropped, then restores the previous one.
struct DateFormatScope {
    previous: Option<String>,
}

impl DateFormatScope {
    fn enter(pattern: &str) -> Self {
        let previous = DATE_FORMAT.with(|slot| slot.replace(Some(pattern.to_owned())));
        Self { previous }
    }
}

impl Drop for DateFormatScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        DATE_FORMAT.with(|slot| *slot.borrow_mut() = previous);
    }
}

fn date_format() -> String {
    DATE_FORMAT.with(|slot| slot.borrow().clone()).unwrap_or_default()
}

/// Root element used when the caller passes an empty name.
pub const DEFAULT_ROOT: &str = "xml";

fn root_or_default(root: &str) -> &str {
    if root.is_empty() { DEFAULT_ROOT } else { root }
}

/// Serializes `value` under a `<root>` element.
///
/// # Errors
/// [`CodecError::XmlSerialize`] for unsupported shapes or an invalid root name.
pub fn to_xml<T: Serialize + ?Sized>(value: &T, root: &str) -> Result<String, CodecError> {
    Ok(quick_xml::se::to_string_with_root(root_or_default(root), value)?)
}

/// [`to_xml`] with two-space indentation.
///
/// # Errors
/// [`CodecError::XmlSerialize`] for unsupported shapes or an invalid root name.
pub fn to_xml_pretty<T: Serialize + ?Sized>(value: &T, root: &str) -> Result<String, CodecError> {
    let mut out = String::new();
    let mut serializer = Serializer::with_root(&mut out, Some(root_or_default(root)))?;
    serializer.indent(' ', 2);
    value.serialize(serializer)?;
    Ok(out)
}

/// The root element name is not checked.
///
/// # Errors
/// [`CodecError::XmlDeserialize`] for malformed XML or a shape mismatch.
pub fn from_xml<T: DeserializeOwned>(xml: &str) -> Result<T, CodecError> {
    Ok(quick_xml::de::from_str(xml)?)
}

/// [`to_xml`] with `xml_date` fields written in `pattern`.
///
/// # Errors
/// [`CodecError::XmlSerialize`] for unsupported shapes, an invalid root name or a date that
/// cannot be written in `pattern`.
pub fn to_xml_with_date_format<T: Serialize + ?Sized>(
    value: &T,
    root: &str,
    pattern: &str,
) -> Result<String, CodecError> {
    let _scope = DateFormatScope::enter(pattern);
    to_xml(value, root)
}

/// [`from_xml`] with `xml_date` fields read in `pattern`. Epoch milliseconds are accepted too.
///
/// # Errors
/// [`CodecError::XmlDeserialize`] for malformed XML, a shape mismatch or a required date that
/// does not parse.
pub fn from_xml_with_date_format<T: DeserializeOwned>(
    xml: &str,
    pattern: &str,
) -> Result<T, CodecError> {
    let _scope = DateFormatScope::enter(pattern);
    from_xml(xml)
}

/// Serde `with` module for [`NaiveDateTime`](jtool_datetime::NaiveDateTime) fields in XML.
///
/// ```ignore
/// #[serde(with = "jtool_codec::xml_date")]
/// created_at: NaiveDateTime,
/// #[serde(default, with = "jtool_codec::xml_date::option")]
/// paid_at: Option<NaiveDateTime>,
/// ```
pub mod xml_date {
    use crate::xml::date_format;
    use jtool_datetime::NaiveDateTime;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    /// When the pattern cannot render `date`.
    pub fn serialize<S: Serializer>(
        date: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text =
            jtool_datetime::format_pattern(*date, &date_format()).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// # Errors
    /// When the text matches neither the pattern nor epoch milliseconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        jtool_datetime::parse(&text, &date_format()).map_err(D::Error::custom)
    }

    /// Optional dates. Empty or unparseable text reads as `None`.
    pub mod option {
        use crate::xml::date_format;
        use jtool_datetime::NaiveDateTime;
        use serde::ser::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};
        use tracing::warn;

        /// # Errors
        /// When the pattern cannot render the date.
        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => {
                    let text = jtool_datetime::format_pattern(*date, &date_format())
                        .map_err(S::Error::custom)?;
                    serializer.serialize_some(&text)
                },
                None => serializer.serialize_none(),
            }
        }

        /// # Errors
        /// When the element is not text.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let Some(text) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };
            if text.trim().is_empty() {
                return Ok(None);
            }
            let pattern = date_format();
            match jtool_datetime::parse(&text, &pattern) {
                Ok(date) => Ok(Some(date)),
                Err(e) => {
                    warn!(%text, %pattern, error = %e, "Unreadable XML date, leaving it empty");
                    Ok(None)
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Notify {
        return_code: String,
        amount: u32,
    }

    #[test]
    fn test_default_root() {
        let notify = Notify { return_code: "SUCCESS".into(), amount: 100 };
        let xml = to_xml(&notify, "").unwrap();
        assert_eq!(xml, "<xml><return_code>SUCCESS</return_code><amount>100</amount></xml>");
        assert_eq!(from_xml::<Notify>(&xml).unwrap(), notify);
    }

    #[test]
    fn test_pretty_keeps_content() {
        let notify = Notify { return_code: "FAIL".into(), amount: 0 };
        let pretty = to_xml_pretty(&notify, "notify").unwrap();
        assert!(pretty.starts_with("<notify>\n  <return_code>"));
        assert_eq!(from_xml::<Notify>(&pretty).unwrap(), notify);
    }

    #[test]
    fn test_scope_restores_previous_format() {
        {
            let _outer = DateFormatScope::enter("yyyyMMdd");
            {
                let _inner = DateFormatScope::enter("HH:mm");
                assert_eq!(date_format(), "HH:mm");
            }
            assert_eq!(date_format(), "yyyyMMdd");
        }
        assert_eq!(date_format(), "");
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(from_xml::<Notify>("<xml><amount>x</amount>"), Err(CodecError::XmlDeserialize { .. })));
    }
}
