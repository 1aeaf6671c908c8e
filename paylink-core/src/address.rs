//! Addresses and the resolver seam that turns address text into one.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::AddressError;
use crate::network::NetworkParams;

/// Byte length of the hash an address commits to.
pub const HASH160_LEN: usize = 20;

/// A resolved address: version byte plus 20-byte hash, with its base58 text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    version: u8,
    hash160: [u8; HASH160_LEN],
    encoded: String,
}

impl Address {
    /// Encode `version` and `hash160` as base58check.
    pub fn from_version_and_hash(version: u8, hash160: [u8; HASH160_LEN]) -> Self {
        let mut payload = Vec::with_capacity(1 + HASH160_LEN);
        payload.push(version);
        payload.extend_from_slice(&hash160);
        let encoded = bs58::encode(payload).with_check().into_string();

        Self {
            version,
            hash160,
            encoded,
        }
    }

    /// Ordinary address for `hash160` on `network`.
    pub fn from_hash160(network: &NetworkParams, hash160: [u8; HASH160_LEN]) -> Self {
        Self::from_version_and_hash(network.address_header, hash160)
    }

    /// Leading version byte
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Hash the address pays to
    pub fn hash160(&self) -> &[u8; HASH160_LEN] {
        &self.hash160
    }

    /// Base58 text
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

/// Resolves address text under a network's rules.
///
/// The parser only needs success or a reason; it wraps the reason without
/// looking inside it.
pub trait AddressResolver {
    /// Decode `text` and check it may be used on `network`.
    fn resolve(&self, network: &NetworkParams, text: &str) -> Result<Address, AddressError>;
}

/// Base58check decoding with a version-byte check against the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base58CheckResolver;

impl AddressResolver for Base58CheckResolver {
    fn resolve(&self, network: &NetworkParams, text: &str) -> Result<Address, AddressError> {
        let payload = bs58::decode(text)
            .with_check(None)
            .into_vec()
            .map_err(|err| AddressError::Encoding(err.to_string()))?;

        let (version, hash) = match payload.split_first() {
            Some((version, hash)) if hash.len() == HASH160_LEN => (*version, hash),
            _ => {
                return Err(AddressError::InvalidLength {
                    actual: payload.len(),
                })
            }
        };

        if !network.accepts_version(version) {
            tracing::trace!(version, network = %network.id, "address version not acceptable");
            return Err(AddressError::WrongNetwork {
                version,
                network: network.id.clone(),
            });
        }

        let mut hash160 = [0_u8; HASH160_LEN];
        hash160.copy_from_slice(hash);
        Ok(Address {
            version,
            hash160,
            encoded: text.to_string(),
        })
    }
}

/// Resolve `text` on `network` with the default base58check rules.
pub fn resolve_address(network: &NetworkParams, text: &str) -> Result<Address, AddressError> {
    Base58CheckResolver.resolve(network, text)
}

impl FromStr for Address {
    type Err = AddressError;

    /// Decode without a network check; any version byte is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let any_version = NetworkParams {
            id: "any".to_string(),
            uri_scheme: String::new(),
            address_header: 0,
            acceptable_address_codes: (0..=u8::MAX).collect(),
        };
        resolve_address(&any_version, s)
    }
}
