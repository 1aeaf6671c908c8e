//! Ordered validation pipeline from URI text to a [`PaymentRequest`].
//!
//! Checks run in a fixed order and the first failure is returned: overall
//! syntax, scheme, question marks, address, then each query pair left to
//! right. When a known key repeats, the first value is kept but later values
//! must still be valid.

use std::collections::HashSet;

use crate::address::{Address, AddressResolver, Base58CheckResolver};
use crate::amount::{parse_decimal, Amount};
use crate::error::{AmountError, UriError};
use crate::escape::decode_field;
use crate::network::NetworkParams;
use crate::request::{PaymentRequest, REQUIRED_PREFIX};

/// Parse `uri` on `network`, resolving the address as base58check.
///
/// Values are percent-decoded; parameter names are not, and a name holding
/// an escape is a [`UriError::MalformedPair`].
pub fn parse(uri: &str, network: &NetworkParams) -> Result<PaymentRequest, UriError> {
    parse_with(uri, network, &Base58CheckResolver)
}

/// Parse `uri` on `network` with a caller-supplied address resolver.
pub fn parse_with<R>(
    uri: &str,
    network: &NetworkParams,
    resolver: &R,
) -> Result<PaymentRequest, UriError>
where
    R: AddressResolver + ?Sized,
{
    match parse_request(uri, network, resolver) {
        Ok(request) => {
            tracing::trace!(
                network = %network.id,
                address = %request.address(),
                "accepted payment request URI"
            );
            Ok(request)
        }
        Err(err) => {
            tracing::debug!(
                network = %network.id,
                code = err.code(),
                error = %err,
                "rejected payment request URI"
            );
            Err(err)
        }
    }
}

fn parse_request<R>(
    uri: &str,
    network: &NetworkParams,
    resolver: &R,
) -> Result<PaymentRequest, UriError>
where
    R: AddressResolver + ?Sized,
{
    check_uri_characters(uri)?;

    let rest = strip_scheme(uri, &network.uri_scheme)?;
    // Legacy `scheme://ADDRESS` form.
    let rest = rest.strip_prefix("//").unwrap_or(rest);

    let mut segments = rest.split('?');
    let address_segment = segments.next().unwrap_or_default();
    let query = segments.next();
    if segments.next().is_some() {
        return Err(UriError::TooManyQuestionMarks);
    }

    let address = resolve_segment(address_segment, network, resolver)?;
    let fields = match query {
        Some(query) => parse_query(query)?,
        None => QueryFields::default(),
    };

    Ok(PaymentRequest::from_parts(
        address,
        fields.amount,
        fields.label,
        fields.message,
        fields.extra_parameters,
    ))
}

/// Reject text that is not a syntactically valid URI reference.
///
/// ASCII is limited to RFC 3986 unreserved and reserved characters, every `%`
/// must start a two-digit hex escape, and fragments are not allowed.
/// Non-ASCII text is tolerated unless it is whitespace or a control character.
fn check_uri_characters(uri: &str) -> Result<(), UriError> {
    for (index, ch) in uri.char_indices() {
        match ch {
            '#' => {
                return Err(UriError::bad_syntax(format!(
                    "fragment not allowed at index {index}"
                )))
            }
            '%' => {
                let escape = uri.get(index + 1..index + 3);
                if !escape.is_some_and(|hex| hex.bytes().all(|byte| byte.is_ascii_hexdigit())) {
                    return Err(UriError::bad_syntax(format!(
                        "malformed escape at index {index}"
                    )));
                }
            }
            ch if ch.is_ascii() => {
                if !(is_unreserved(ch) || is_reserved(ch)) {
                    return Err(illegal_character(ch, index));
                }
            }
            ch if ch.is_whitespace() || ch.is_control() => {
                return Err(illegal_character(ch, index));
            }
            _ => {}
        }
    }
    Ok(())
}

fn illegal_character(ch: char, index: usize) -> UriError {
    UriError::bad_syntax(format!(
        "illegal character '{}' at index {index}",
        ch.escape_default()
    ))
}

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')
}

fn is_sub_delim(ch: char) -> bool {
    matches!(
        ch,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

fn is_reserved(ch: char) -> bool {
    is_sub_delim(ch) || matches!(ch, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

fn strip_scheme<'a>(uri: &'a str, scheme: &str) -> Result<&'a str, UriError> {
    match uri.split_once(':') {
        Some((found, rest)) if found == scheme => Ok(rest),
        Some((found, _)) => Err(UriError::SchemeMismatch {
            expected: scheme.to_string(),
            found: found.to_string(),
        }),
        None if uri == scheme => Err(UriError::MissingAddress),
        None => Err(UriError::SchemeMismatch {
            expected: scheme.to_string(),
            found: uri.to_string(),
        }),
    }
}

fn resolve_segment<R>(
    segment: &str,
    network: &NetworkParams,
    resolver: &R,
) -> Result<Address, UriError>
where
    R: AddressResolver + ?Sized,
{
    if segment.is_empty() {
        return Err(UriError::MissingAddress);
    }
    // Path characters without escapes; `/` and `%` never belong in an address.
    if let Some(ch) = segment
        .chars()
        .find(|&ch| !(is_unreserved(ch) || is_sub_delim(ch) || matches!(ch, ':' | '@')))
    {
        return Err(UriError::bad_syntax(format!(
            "illegal character '{}' in address",
            ch.escape_default()
        )));
    }

    resolver
        .resolve(network, segment)
        .map_err(|source| UriError::BadAddress {
            address: segment.to_string(),
            source,
        })
}

#[derive(Debug, Default)]
struct QueryFields {
    amount: Option<Amount>,
    label: Option<String>,
    message: Option<String>,
    extra_parameters: Vec<(String, String)>,
}

enum FieldName<'a> {
    Address,
    Amount,
    Label,
    Message,
    UnknownRequired(&'a str),
    Optional(&'a str),
}

impl<'a> FieldName<'a> {
    fn classify(key: &'a str) -> Self {
        match key {
            "address" => Self::Address,
            "amount" => Self::Amount,
            "label" => Self::Label,
            "message" => Self::Message,
            _ if key.starts_with(REQUIRED_PREFIX) => Self::UnknownRequired(key),
            _ => Self::Optional(key),
        }
    }
}

fn parse_query(query: &str) -> Result<QueryFields, UriError> {
    let mut fields = QueryFields::default();
    let mut seen_extra = HashSet::new();

    for token in query.split('&') {
        let (key, raw_value) = split_pair(token)?;
        match FieldName::classify(key) {
            FieldName::Address => return Err(UriError::DuplicateAddressField),
            FieldName::Amount => {
                let amount = parse_amount(raw_value)?;
                fields.amount.get_or_insert(amount);
            }
            FieldName::Label => {
                let label = decode_non_empty("label", raw_value)?;
                fields.label.get_or_insert(label);
            }
            FieldName::Message => {
                let message = decode_non_empty("message", raw_value)?;
                fields.message.get_or_insert(message);
            }
            FieldName::UnknownRequired(key) => {
                return Err(UriError::UnrecognizedRequiredField {
                    key: key.to_string(),
                })
            }
            FieldName::Optional(key) => {
                let value = decode_field(raw_value)?;
                if seen_extra.insert(key) {
                    fields.extra_parameters.push((key.to_string(), value));
                }
            }
        }
    }

    Ok(fields)
}

/// Split `key=value`; exactly one `=` and a non-empty key are required.
///
/// Keys are matched as written, so an escaped key could slip past the
/// `address` and `req-` checks; keys containing `%` are refused.
fn split_pair(token: &str) -> Result<(&str, &str), UriError> {
    match token.split_once('=') {
        Some((key, value)) if !key.is_empty() && !key.contains('%') && !value.contains('=') => {
            Ok((key, value))
        }
        _ => Err(UriError::MalformedPair {
            token: token.to_string(),
        }),
    }
}

fn parse_amount(raw: &str) -> Result<Amount, UriError> {
    let value = decode_field(raw).map_err(|_| UriError::InvalidAmount {
        value: raw.to_string(),
        source: AmountError::InvalidCharacters,
    })?;
    let amount = parse_decimal(&value).map_err(|source| UriError::InvalidAmount {
        value: value.clone(),
        source,
    })?;
    if amount.is_negative() {
        return Err(UriError::InvalidAmount {
            value,
            source: AmountError::Negative,
        });
    }
    Ok(amount)
}

fn decode_non_empty(field: &'static str, raw: &str) -> Result<String, UriError> {
    let value = decode_field(raw)
        .map_err(|_| UriError::bad_syntax(format!("'{field}' is not valid UTF-8")))?;
    if value.is_empty() {
        return Err(UriError::EmptyFieldValue { field });
    }
    Ok(value)
}
