//! # Paylink Core
//!
//! Parser and serializer for coin payment request URIs of the form
//! `scheme:ADDRESS?amount=..&label=..&message=..`, plus the exact
//! fixed-point codec for the amounts they carry.
//!
//! ## Key Types
//!
//! - [`Amount`]: Integer monetary value (1 coin = 100,000,000 units)
//! - [`NetworkParams`]: URI scheme and address version bytes of a coin network
//! - [`Address`]: Resolved address, checked against a network
//! - [`PaymentRequest`]: Validated, immutable result of parsing a URI
//! - [`UriError`]: Every reason a URI or a request can be refused
//!
//! ## Example
//!
//! ```
//! use paylink_core::{parse, Amount, NetworkParams};
//!
//! let network = NetworkParams::litecoin_mainnet();
//! let request = parse(
//!     "litecoin:LQz2pJYaeqntA9BFB8rDX5AL2TTKGd5AuN?amount=12.34&label=Hello%20World",
//!     &network,
//! )
//! .unwrap();
//!
//! assert_eq!(request.amount(), Some(Amount::from_units(1_234_000_000)));
//! assert_eq!(request.label(), Some("Hello World"));
//! assert_eq!(
//!     request.to_uri(&network),
//!     "litecoin:LQz2pJYaeqntA9BFB8rDX5AL2TTKGd5AuN?amount=12.34&label=Hello%20World"
//! );
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::float_arithmetic)]

pub mod address;
pub mod amount;
pub mod error;
pub mod escape;
pub mod network;
pub mod parser;
pub mod request;
pub mod serializer;

pub use address::{resolve_address, Address, AddressResolver, Base58CheckResolver};
pub use amount::{combine, format_friendly, format_plain, parse_decimal, Amount};
pub use error::{AddressError, AmountError, ErrorReport, UriError};
pub use network::NetworkParams;
pub use parser::{parse, parse_with};
pub use request::{PaymentRequest, PaymentRequestBuilder};
pub use serializer::build_uri;
