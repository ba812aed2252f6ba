// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body payload extraction

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One form field with every value the host reported for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub values: Vec<String>,
}

impl FormField {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Field with a single value
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, vec![value.into()])
    }
}

/// One element of a raw upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadData {
    /// In-memory bytes
    Bytes(Bytes),
    /// File-backed element; only its path is known
    File(String),
}

/// Request body in whichever shape the host parsed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` or multipart fields, in order
    FormData(Vec<FormField>),
    /// Unparsed upload elements
    Raw(Vec<UploadData>),
}

impl RequestBody {
    /// Form body from `(name, value)` pairs
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::FormData(
            pairs
                .into_iter()
                .map(|(k, v)| FormField::single(k, v))
                .collect(),
        )
    }

    /// Raw body from a single buffer
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        RequestBody::Raw(vec![UploadData::Bytes(bytes.into())])
    }

    /// Serialize the body into the payload string handed to the downloader
    ///
    /// Form fields become `key=value` pairs joined with `&`, using the first
    /// value of each field. Raw elements are concatenated and decoded as
    /// UTF-8; malformed UTF-8 is an [`Error::Decode`].
    pub fn to_payload(&self) -> Result<String> {
        match self {
            RequestBody::FormData(fields) => Ok(fields
                .iter()
                .map(|field| {
                    let value = field.values.first().map(String::as_str).unwrap_or("");
                    format!("{}={}", encode_component(&field.name), encode_component(value))
                })
                .collect::<Vec<_>>()
                .join("&")),
            RequestBody::Raw(elements) => {
                let mut buf = BytesMut::new();
                for element in elements {
                    match element {
                        UploadData::Bytes(bytes) => buf.extend_from_slice(bytes),
                        UploadData::File(path) => {
                            tracing::warn!(path = %path, "Skipping file-backed upload element");
                        }
                    }
                }
                String::from_utf8(buf.to_vec())
                    .map_err(|e| Error::decode(format!("raw body is not UTF-8: {}", e)))
            }
        }
    }
}

/// Percent-encode a string the way `encodeURIComponent` does
///
/// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` as is and encodes every other
/// byte of the UTF-8 form as `%XX`.
pub fn encode_component(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => result.push(byte as char),
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}

/// Decode one percent-encoded component; bad escapes are kept literally
fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Split a `key=value&...` payload into decoded pairs, in order
pub fn parse_form_payload(payload: &str) -> Vec<(String, String)> {
    payload
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_payload() {
        let body = RequestBody::FormData(vec![
            FormField::new("a", vec!["1".into()]),
            FormField::new("b", vec!["2".into()]),
        ]);
        assert_eq!(body.to_payload().unwrap(), "a=1&b=2");
    }

    #[test]
    fn test_form_uses_first_value_and_encodes() {
        let body = RequestBody::FormData(vec![
            FormField::new("file name", vec!["a&b=c".into(), "ignored".into()]),
            FormField::new("token", vec!["x+y/z".into()]),
            FormField::new("empty", vec![]),
        ]);
        assert_eq!(
            body.to_payload().unwrap(),
            "file%20name=a%26b%3Dc&token=x%2By%2Fz&empty="
        );
    }

    #[test]
    fn test_form_payload_reparses_to_first_values() {
        let fields = vec![
            FormField::new("_csrf", vec!["3f9a-77==".into()]),
            FormField::new("attachIds", vec!["12,13".into(), "99".into()]),
            FormField::new("név", vec!["ünïcødé ✓".into()]),
            FormField::new("q", vec!["(a) 'b' *c* ~d! e%f".into()]),
        ];
        let payload = RequestBody::FormData(fields.clone()).to_payload().unwrap();
        let parsed = parse_form_payload(&payload);

        assert_eq!(parsed.len(), fields.len());
        for (field, (name, value)) in fields.iter().zip(parsed.iter()) {
            assert_eq!(&field.name, name);
            assert_eq!(&field.values[0], value);
        }
    }

    #[test]
    fn test_encode_component_unreserved() {
        assert_eq!(encode_component("AZaz09-_.!~*'()"), "AZaz09-_.!~*'()");
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(encode_component(" "), "%20");
    }

    #[test]
    fn test_raw_utf8_round_trip() {
        let text = "{\"ids\":[1,2,3],\"name\":\"파일.tar.gz\"}";
        let body = RequestBody::raw(text.as_bytes().to_vec());
        assert_eq!(body.to_payload().unwrap(), text);
    }

    #[test]
    fn test_raw_chunks_concatenate_and_skip_files() {
        let body = RequestBody::Raw(vec![
            UploadData::Bytes(Bytes::from_static(b"part1-")),
            UploadData::File("/tmp/upload.bin".into()),
            UploadData::Bytes(Bytes::from_static(b"part2")),
        ]);
        assert_eq!(body.to_payload().unwrap(), "part1-part2");
    }

    #[test]
    fn test_raw_invalid_utf8() {
        let body = RequestBody::raw(vec![0xff, 0xfe, 0x00]);
        assert!(matches!(body.to_payload(), Err(Error::Decode(_))));
    }

    #[test]
    fn test_parse_keeps_bad_escapes() {
        let parsed = parse_form_payload("a=%zz&b=%4&c");
        assert_eq!(
            parsed,
            vec![
                ("a".to_string(), "%zz".to_string()),
                ("b".to_string(), "%4".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
    }
}
