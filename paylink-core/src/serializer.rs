//! Canonical payment request URI text.

use crate::address::Address;
use crate::amount::Amount;
use crate::error::UriError;
use crate::escape::encode_field;
use crate::network::NetworkParams;

/// Build `scheme:ADDRESS[?amount=..&label=..&message=..]`.
///
/// Fields appear in that order; absent or empty ones are left out. Label and
/// message are percent-encoded, the amount is written in plain decimal form.
pub fn build_uri(
    network: &NetworkParams,
    address: &Address,
    amount: Option<Amount>,
    label: Option<&str>,
    message: Option<&str>,
) -> Result<String, UriError> {
    if amount.is_some_and(Amount::is_negative) {
        return Err(UriError::invalid_argument("Amount must be positive"));
    }
    Ok(write_uri(
        &network.uri_scheme,
        address,
        amount,
        label,
        message,
        &[],
    ))
}

pub(crate) fn write_uri(
    scheme: &str,
    address: &Address,
    amount: Option<Amount>,
    label: Option<&str>,
    message: Option<&str>,
    extra_parameters: &[(String, String)],
) -> String {
    let mut fields: Vec<(&str, String)> = Vec::with_capacity(3 + extra_parameters.len());
    if let Some(amount) = amount {
        fields.push(("amount", amount.to_plain_string()));
    }
    if let Some(label) = label.filter(|label| !label.is_empty()) {
        fields.push(("label", encode_field(label)));
    }
    if let Some(message) = message.filter(|message| !message.is_empty()) {
        fields.push(("message", encode_field(message)));
    }
    for (key, value) in extra_parameters {
        fields.push((key.as_str(), encode_field(value)));
    }

    let mut uri = format!("{scheme}:{address}");
    for (index, (key, value)) in fields.iter().enumerate() {
        uri.push(if index == 0 { '?' } else { '&' });
        uri.push_str(key);
        uri.push('=');
        uri.push_str(value);
    }
    uri
}
