use crate::CodecError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// # Errors
/// [`CodecError::Json`] when `value` cannot be represented as JSON (e.g. non-string map keys).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// # Errors
/// [`CodecError::Json`] when `value` cannot be represented as JSON.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// # Errors
/// [`CodecError::Json`] for malformed input or a shape mismatch.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Parses a JSON array into a `Vec<T>`.
///
/// # Errors
/// [`CodecError::Json`] for malformed input or when the document is not an array of `T`.
pub fn from_json_list<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Serializes with every object key in `snake_case` and every `null` member removed.
///
/// # Errors
/// [`CodecError::Json`] when `value` cannot be represented as JSON.
pub fn to_snake_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&to_snake_value(value)?)?)
}

/// [`to_snake_json`] without the final rendering step.
///
/// # Errors
/// [`CodecError::Json`] when `value` cannot be represented as JSON.
pub fn to_snake_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, CodecError> {
    Ok(snake_keys(serde_json::to_value(value)?))
}

fn snake_keys(value: Value) -> Value {
    match value {
        Value::Object(members) => Value::Object(
            members
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (snake_case(&k), snake_keys(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(snake_keys).collect()),
        other => other,
    }
}

/// `userName` -> `user_name`, `HTTPServer` -> `http_server`; existing underscores are kept.
fn snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p));
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if *p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Account {
        user_name: String,
        login_count: u32,
        nick_name: Option<String>,
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("userName"), "user_name");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("userID"), "user_id");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("Field2Name"), "field2_name");
    }

    #[test]
    fn test_to_snake_value_recurses_and_drops_nulls() {
        let value = json!({ "outerKey": { "innerKey": 1, "gone": null }, "listItems": [{ "aB": null, "cD": 2 }] });
        assert_eq!(
            to_snake_value(&value).unwrap(),
            json!({ "outer_key": { "inner_key": 1 }, "list_items": [{ "c_d": 2 }] })
        );
    }

    #[test]
    fn test_json_round_trip() {
        let account = Account { user_name: "ada".into(), login_count: 3, nick_name: None };
        let json = to_json(&account).unwrap();
        assert_eq!(json, r#"{"userName":"ada","loginCount":3,"nickName":null}"#);
        assert_eq!(from_json::<Account>(&json).unwrap(), account);
        assert_eq!(to_snake_json(&account).unwrap(), r#"{"login_count":3,"user_name":"ada"}"#);
    }

    #[test]
    fn test_from_json_list() {
        let list: Vec<u8> = from_json_list("[1,2,3]").unwrap();
        assert_eq!(list, [1, 2, 3]);
        assert!(matches!(from_json_list::<u8>("{}"), Err(CodecError::Json { .. })));
    }
}
