//! The immutable payment request and its builder.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::{self, Display};

use serde::{Serialize, Serializer};

use crate::address::Address;
use crate::amount::Amount;
use crate::error::UriError;
use crate::network::NetworkParams;
use crate::{parser, serializer};

/// Query key prefix marking a parameter the reader must understand.
pub const REQUIRED_PREFIX: &str = "req-";

/// A validated payment request: address plus optional amount, label,
/// message and any further parameters, in the order they were given.
///
/// Only produced by [`parser::parse`] or [`PaymentRequestBuilder::build`];
/// it cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_pairs"
    )]
    extra_parameters: Vec<(String, String)>,
}

impl PaymentRequest {
    pub(crate) fn from_parts(
        address: Address,
        amount: Option<Amount>,
        label: Option<String>,
        message: Option<String>,
        extra_parameters: Vec<(String, String)>,
    ) -> Self {
        Self {
            address,
            amount,
            label,
            message,
            extra_parameters,
        }
    }

    /// Parse `uri` with the default base58check address rules.
    pub fn parse(uri: &str, network: &NetworkParams) -> Result<Self, UriError> {
        parser::parse(uri, network)
    }

    /// Start a request for `address`, to be serialized with [`Self::to_uri`].
    pub fn builder(address: Address) -> PaymentRequestBuilder {
        PaymentRequestBuilder::new(address)
    }

    /// Resolved payee address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Requested amount, never negative
    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    /// Payee label, never empty
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Note for the payer, never empty
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Parameters other than address, amount, label and message.
    pub fn extra_parameters(&self) -> &[(String, String)] {
        &self.extra_parameters
    }

    /// Decoded value of a query parameter, with `amount` rendered plain.
    pub fn parameter(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "amount" => self.amount.map(|amount| Cow::Owned(amount.to_plain_string())),
            "label" => self.label().map(Cow::Borrowed),
            "message" => self.message().map(Cow::Borrowed),
            _ => self
                .extra_parameters
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| Cow::Borrowed(value.as_str())),
        }
    }

    /// Canonical URI text, extra parameters appended in their original order.
    pub fn to_uri(&self, network: &NetworkParams) -> String {
        serializer::write_uri(
            &network.uri_scheme,
            &self.address,
            self.amount,
            self.label(),
            self.message(),
            &self.extra_parameters,
        )
    }
}

impl Display for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaymentRequest['address'='{}'", self.address)?;
        if let Some(amount) = self.amount {
            write!(f, ",'amount'='{}'", amount.units())?;
        }
        if let Some(label) = &self.label {
            write!(f, ",'label'='{label}'")?;
        }
        if let Some(message) = &self.message {
            write!(f, ",'message'='{message}'")?;
        }
        for (key, value) in &self.extra_parameters {
            write!(f, ",'{key}'='{value}'")?;
        }
        f.write_str("]")
    }
}

fn serialize_pairs<S: Serializer>(
    pairs: &[(String, String)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(key, value)| (key, value)))
}

/// Assembles a [`PaymentRequest`] for serialization.
#[derive(Debug, Clone)]
pub struct PaymentRequestBuilder {
    address: Address,
    amount: Option<Amount>,
    label: Option<String>,
    message: Option<String>,
    extra_parameters: Vec<(String, String)>,
}

impl PaymentRequestBuilder {
    /// Builder with only the address set.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            amount: None,
            label: None,
            message: None,
            extra_parameters: Vec::new(),
        }
    }

    /// Amount to request; must not be negative by the time of [`Self::build`].
    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// An empty label is the same as no label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// An empty message is the same as no message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Append an extra parameter. Keys must be unreserved URI characters and
    /// cannot be a known field or start with `req-`.
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_parameters.push((key.into(), value.into()));
        self
    }

    /// Check the collected fields and freeze them into a [`PaymentRequest`].
    pub fn build(self) -> Result<PaymentRequest, UriError> {
        if self.amount.is_some_and(Amount::is_negative) {
            return Err(UriError::invalid_argument("Amount must be positive"));
        }

        {
            let mut seen = HashSet::with_capacity(self.extra_parameters.len());
            for (key, _) in &self.extra_parameters {
                check_extra_key(key)?;
                if !seen.insert(key.as_str()) {
                    return Err(UriError::invalid_argument(format!(
                        "parameter '{key}' given more than once"
                    )));
                }
            }
        }

        Ok(PaymentRequest::from_parts(
            self.address,
            self.amount,
            self.label.filter(|label| !label.is_empty()),
            self.message.filter(|message| !message.is_empty()),
            self.extra_parameters,
        ))
    }
}

fn check_extra_key(key: &str) -> Result<(), UriError> {
    if matches!(key, "address" | "amount" | "label" | "message") {
        return Err(UriError::invalid_argument(format!(
            "'{key}' cannot be set as an extra parameter"
        )));
    }
    if key.starts_with(REQUIRED_PREFIX) {
        return Err(UriError::invalid_argument(format!(
            "required parameter '{key}' is not supported"
        )));
    }
    if key.is_empty()
        || !key
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~'))
    {
        return Err(UriError::invalid_argument(format!(
            "parameter name '{key}' must be non-empty and URI-safe"
        )));
    }
    Ok(())
}
