//! Form-style percent escaping for URI query values.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::UriError;

/// Bytes left bare by form encoding; everything else is escaped, including
/// space (as `%20`, never `+`), `&`, `+`, `=` and `~`.
const FIELD_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'*');

/// Percent-encode a label, message or parameter value as UTF-8.
pub fn encode_field(text: &str) -> String {
    utf8_percent_encode(text, FIELD_VALUE).to_string()
}

/// Reverse [`encode_field`]. A bare `+` is read as a space, as form decoders do.
///
/// Fails when the escapes do not spell out valid UTF-8.
pub fn decode_field(text: &str) -> Result<String, UriError> {
    let spaced = text.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|err| UriError::bad_syntax(format!("escaped value is not UTF-8: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_space_ampersand_and_plus() {
        assert_eq!(encode_field("Hello World"), "Hello%20World");
        assert_eq!(
            encode_field("Mess & age + hope"),
            "Mess%20%26%20age%20%2B%20hope"
        );
        assert_eq!(encode_field("a=b"), "a%3Db");
    }

    #[test]
    fn leaves_form_safe_characters_alone() {
        assert_eq!(encode_field("AZaz09-._*"), "AZaz09-._*");
        assert_eq!(encode_field("~"), "%7E");
    }

    #[test]
    fn encodes_multibyte_utf8() {
        let moscow = "\u{041c}\u{043e}\u{0441}\u{043a}\u{0432}\u{0430}";
        let encoded = encode_field(moscow);
        assert_eq!(encoded, "%D0%9C%D0%BE%D1%81%D0%BA%D0%B2%D0%B0");
        assert_eq!(decode_field(&encoded).unwrap(), moscow);
    }

    #[test]
    fn decodes_plus_as_space_and_escaped_plus_as_plus() {
        assert_eq!(decode_field("Hello+World").unwrap(), "Hello World");
        assert_eq!(decode_field("1%2B1").unwrap(), "1+1");
    }

    #[test]
    fn decode_inverts_encode() {
        let text = "Hello Earth & Mars + Venus = 100% \u{1F600}";
        assert_eq!(decode_field(&encode_field(text)).unwrap(), text);
    }

    #[test]
    fn rejects_escapes_that_are_not_utf8() {
        let err = decode_field("%FF%FE").unwrap_err();
        assert!(matches!(err, UriError::BadSyntax { .. }));
    }
}
