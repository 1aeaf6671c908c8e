//! Coin network parameters used to resolve addresses and name the URI scheme.

use serde::{Deserialize, Serialize};

use crate::error::UriError;

/// Identity of a coin network.
///
/// Built once by the caller and passed by reference; the library keeps no
/// process-wide network state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Stable identifier, e.g. `org.litecoin.production`.
    pub id: String,
    /// URI scheme for payment requests on this coin, without the colon.
    pub uri_scheme: String,
    /// Version byte of ordinary pay-to-pubkey-hash addresses.
    pub address_header: u8,
    /// Every version byte an address on this network may carry.
    pub acceptable_address_codes: Vec<u8>,
}

impl NetworkParams {
    /// Litecoin mainnet (`L...` addresses)
    pub fn litecoin_mainnet() -> Self {
        Self {
            id: "org.litecoin.production".to_string(),
            uri_scheme: "litecoin".to_string(),
            address_header: 48,
            acceptable_address_codes: vec![48],
        }
    }

    /// Litecoin testnet
    pub fn litecoin_testnet() -> Self {
        Self {
            id: "org.litecoin.test".to_string(),
            uri_scheme: "litecoin".to_string(),
            address_header: 111,
            acceptable_address_codes: vec![111],
        }
    }

    /// Anoncoin mainnet (`A...` addresses)
    pub fn anoncoin_mainnet() -> Self {
        Self {
            id: "org.anoncoin.production".to_string(),
            uri_scheme: "anoncoin".to_string(),
            address_header: 23,
            acceptable_address_codes: vec![23],
        }
    }

    /// Bitcoin mainnet, pay-to-pubkey-hash and pay-to-script-hash
    pub fn bitcoin_mainnet() -> Self {
        Self {
            id: "org.bitcoin.production".to_string(),
            uri_scheme: "bitcoin".to_string(),
            address_header: 0,
            acceptable_address_codes: vec![0, 5],
        }
    }

    /// Load a custom coin profile from JSON and check it is usable.
    pub fn from_json(json: &str) -> Result<Self, UriError> {
        let params: Self = serde_json::from_str(json).map_err(|err| {
            UriError::invalid_argument(format!("invalid network parameters: {err}"))
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Check the scheme is a legal URI scheme and the header is acceptable.
    pub fn validate(&self) -> Result<(), UriError> {
        if !is_valid_scheme(&self.uri_scheme) {
            return Err(UriError::invalid_argument(format!(
                "'{}' is not a valid URI scheme",
                self.uri_scheme
            )));
        }
        if !self.accepts_version(self.address_header) {
            return Err(UriError::invalid_argument(format!(
                "address header {} missing from acceptable address codes",
                self.address_header
            )));
        }
        Ok(())
    }

    /// Whether an address with this version byte belongs here.
    pub fn accepts_version(&self, version: u8) -> bool {
        self.acceptable_address_codes.contains(&version)
    }
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.'))
}
