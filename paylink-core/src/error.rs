//! Error taxonomy for payment request URIs and the amount codec.

use serde::Serialize;
use thiserror::Error;

/// Failures of the fixed-point amount codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// No digits at all
    #[error("amount is empty")]
    Empty,
    /// Something other than digits, sign, `.` or exponent marker
    #[error("amount contains invalid characters")]
    InvalidCharacters,
    /// Allowed characters in an impossible arrangement
    #[error("amount is not a decimal number")]
    InvalidFormat,
    /// More than 8 decimal places
    #[error("amount needs {decimals} decimal places, at most 8 are supported")]
    TooPrecise {
        /// Decimal places the input asks for
        decimals: i64,
    },
    /// Below zero where only nonnegative values are allowed
    #[error("amount must not be negative")]
    Negative,
    /// Cents of 100 or more
    #[error("cents must be below 100 (got {cents})")]
    CentsOutOfRange {
        /// Cents given
        cents: i64,
    },
    /// Value does not fit in 64-bit smallest units
    #[error("amount arithmetic overflow")]
    Overflow,
}

/// Reasons an address resolver refuses an address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Bad base58 alphabet or checksum
    #[error("not a valid base58check string: {0}")]
    Encoding(String),
    /// Payload is not a version byte plus 20-byte hash
    #[error("decoded payload is {actual} bytes, expected 21")]
    InvalidLength {
        /// Decoded byte count
        actual: usize,
    },
    /// Version byte belongs to another network or address kind
    #[error("version byte {version} is not acceptable on network '{network}'")]
    WrongNetwork {
        /// Version byte found
        version: u8,
        /// Network identifier the address was checked against
        network: String,
    },
    /// Refused by a custom resolver
    #[error("{0}")]
    Rejected(String),
}

/// Every way parsing or building a payment request URI can fail.
///
/// All variants are fatal to the call that produced them; no partial
/// request is ever returned alongside an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UriError {
    /// Text before the first `:` is not the network's scheme
    #[error("Bad scheme: expected '{expected}', found '{found}'")]
    SchemeMismatch {
        /// Scheme of the network
        expected: String,
        /// Scheme in the input
        found: String,
    },

    /// Character or escape not allowed in a URI or address segment
    #[error("Bad URI syntax: {reason}")]
    BadSyntax {
        /// What was wrong and where
        reason: String,
    },

    /// Nothing between the scheme and the query
    #[error("Missing address in payment request URI")]
    MissingAddress,

    /// Address resolver refused the address
    #[error("Bad address '{address}': {source}")]
    BadAddress {
        /// Address text as it appeared
        address: String,
        /// Resolver's reason
        source: AddressError,
    },

    /// More than one `?`
    #[error("Too many question marks in URI")]
    TooManyQuestionMarks,

    /// Query token is not a single `key=value`
    #[error("Malformed payment request URI, cannot parse name value pair '{token}'")]
    MalformedPair {
        /// Offending `&`-separated token
        token: String,
    },

    /// Query carries an `address` key
    #[error("'address' already bound from the URI path, refusing a second address field")]
    DuplicateAddressField,

    /// `amount` is empty, not a decimal, too precise or negative
    #[error("Bad amount field 'amount' = '{value}': {source}")]
    InvalidAmount {
        /// Decoded amount text
        value: String,
        /// Codec's reason
        source: AmountError,
    },

    /// `label` or `message` present but empty
    #[error("'{field}' field cannot be empty")]
    EmptyFieldValue {
        /// `label` or `message`
        field: &'static str,
    },

    /// `req-` key this library does not understand
    #[error("'{key}' is required but not known, this URI is not valid")]
    UnrecognizedRequiredField {
        /// Full key including the prefix
        key: String,
    },

    /// Caller passed a value the serializer or configuration cannot accept
    #[error("{0}")]
    InvalidArgument(String),
}

impl UriError {
    pub(crate) fn bad_syntax(reason: impl Into<String>) -> Self {
        Self::BadSyntax {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Stable machine-readable name of the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemeMismatch { .. } => "SCHEME_MISMATCH",
            Self::BadSyntax { .. } => "BAD_SYNTAX",
            Self::MissingAddress => "MISSING_ADDRESS",
            Self::BadAddress { .. } => "BAD_ADDRESS",
            Self::TooManyQuestionMarks => "TOO_MANY_QUESTION_MARKS",
            Self::MalformedPair { .. } => "MALFORMED_PAIR",
            Self::DuplicateAddressField => "DUPLICATE_ADDRESS_FIELD",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::EmptyFieldValue { .. } => "EMPTY_FIELD_VALUE",
            Self::UnrecognizedRequiredField { .. } => "UNRECOGNIZED_REQUIRED_FIELD",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
        }
    }

    /// The URI field a caller should point the user at, if the failure has one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::BadAddress { .. } | Self::MissingAddress | Self::DuplicateAddressField => {
                Some("address")
            }
            Self::InvalidAmount { .. } => Some("amount"),
            Self::EmptyFieldValue { field } => Some(*field),
            Self::UnrecognizedRequiredField { key } => Some(key.as_str()),
            _ => None,
        }
    }

    /// Code, field and message in one serializable value.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            field: self.field().map(ToOwned::to_owned),
            message: self.to_string(),
        }
    }
}

/// Serializable summary of a [`UriError`] for UIs and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Value of [`UriError::code`]
    pub code: &'static str,
    /// Value of [`UriError::field`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable message
    pub message: String,
}
