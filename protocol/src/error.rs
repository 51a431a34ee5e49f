//! Error types for transaction construction, signing and deep links.
//!
//! Every fallible operation in the crate returns a [`TxError`]. Failures are
//! never transient: each one points at a caller-supplied field or a caller
//! logic bug, and the message carries the field name and offending value.

use thiserror::Error;

use crate::address::AddressError;
use crate::crypto::keys::KeyError;

/// Coarse classification of a [`TxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A field has the wrong type or is not a valid number/hex string.
    Shape,
    /// A numeric field is outside its allowed range (including negatives).
    Range,
    /// A string or byte field is too long or has the wrong length.
    Length,
    /// A mandatory field is missing or empty.
    RequiredField,
    /// An address is malformed or fails its checksum.
    Address,
    /// The signing key does not belong to the declared gas payer.
    Conflict,
    /// Malformed deep link, nested box, unrecoverable signature.
    Protocol,
}

/// Errors raised while validating, building, encoding or signing.
#[derive(Debug, Error)]
pub enum TxError {
    /// Field holds a value of the wrong shape.
    #[error("The type of '{field}' should be '{expected}'")]
    InvalidType {
        /// Field name, e.g. `sigs` or `signers[0].weight`.
        field: String,
        /// Accepted type set.
        expected: String,
    },

    /// Field should be a decimal or `0x`-prefixed hex number.
    #[error("'{field}' {value} should be a number or hex")]
    MustBeNumber {
        /// Field name.
        field: String,
        /// Offending value.
        value: String,
    },

    /// Field must be a plain decimal number (hex not accepted).
    #[error("The {field} in transaction should be a decimal number")]
    NotDecimal {
        /// Field name.
        field: String,
    },

    /// Field holds a negative number.
    #[error("The {field} in transaction should be positive")]
    Negative {
        /// Field name.
        field: String,
    },

    /// Field is outside `[from, to]`.
    #[error("'{field}' {value} is not in range [{from:#x}, {to:#x}]")]
    InvalidRange {
        /// Field name.
        field: String,
        /// Offending value.
        value: String,
        /// Inclusive lower bound.
        from: u64,
        /// Inclusive upper bound.
        to: u64,
    },

    /// Field does not have the exact required length.
    #[error("The length of '{field}' {value} should be {expected}, not {actual}")]
    InvalidLength {
        /// Field name.
        field: String,
        /// Offending value.
        value: String,
        /// Required length in characters.
        expected: usize,
        /// Actual length in characters.
        actual: usize,
    },

    /// Field exceeds its maximum length in characters.
    #[error("The length of '{field}' should be less than {max}, but now it is {actual}")]
    InvalidMaxLength {
        /// Field name.
        field: String,
        /// Maximum length in characters.
        max: usize,
        /// Actual length in characters.
        actual: usize,
    },

    /// Field exceeds its maximum length in bytes.
    #[error("The length of '{field}' {value} should be less than {max} bytes, but now it is {actual}")]
    InvalidMaxBytes {
        /// Field name.
        field: String,
        /// Offending value.
        value: String,
        /// Maximum length in bytes.
        max: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Mandatory field missing.
    #[error("The {field} is required")]
    FieldRequired {
        /// Field name.
        field: String,
    },

    /// `updateProfile` missing on a modify-asset transaction.
    #[error("Edit information cannot be empty")]
    EmptyUpdateProfile,

    /// `toName` contains characters outside `[A-Za-z0-9_.-]`.
    #[error("Invalid toName {value}")]
    InvalidToName {
        /// Offending value.
        value: String,
    },

    /// Flag field is a string other than `"true"` / `"false"`.
    #[error("Wrong character, '{field}' must be true or false")]
    InvalidSymbol {
        /// Field name.
        field: String,
    },

    /// Candidate email is not an address of the form `local@domain.tld`.
    #[error("Invalid email {value}")]
    InvalidEmail {
        /// Offending value.
        value: String,
    },

    /// Address failed the address codec.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Private key was rejected by the curve implementation.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The reimbursing key does not belong to the declared gas payer.
    #[error("Private key is not match with the payer address {address}")]
    AddressConflict {
        /// Declared gas payer.
        address: String,
    },

    /// A box transaction contains another box, or its payload is unreadable.
    #[error("This is an incorrect transaction information or contains box transaction")]
    InvalidBoxTransaction,

    /// A signature could not be recovered to a public key.
    #[error("invalid signature: {reason}")]
    InvalidSignature {
        /// Why recovery failed.
        reason: String,
    },

    /// Deep link has no query part or cannot be parsed.
    #[error("Invalid LemoChain deep link {uri}")]
    InvalidDeepLink {
        /// The offending URI.
        uri: String,
    },

    /// Deep link prefix is not a known request type.
    #[error("The LemoChain deep link type {prefix} is unknown")]
    InvalidDeepLinkType {
        /// Prefix that was found.
        prefix: String,
    },

    /// Sign deep link has neither or both of message and data.
    #[error("Invalid LemoChain sign deep link, message or data is required")]
    InvalidSignDeepLink,

    /// A scaled money value has the wrong format.
    #[error("The value {value} entered is in the wrong format")]
    MoneyFormat {
        /// Offending value.
        value: String,
    },

    /// A JSON document could not be read or written.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TxError {
    /// Taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidType { .. }
            | Self::MustBeNumber { .. }
            | Self::NotDecimal { .. }
            | Self::InvalidToName { .. }
            | Self::InvalidSymbol { .. }
            | Self::InvalidEmail { .. }
            | Self::Key(_)
            | Self::Serialization(_) => ErrorKind::Shape,
            Self::Negative { .. } | Self::InvalidRange { .. } => ErrorKind::Range,
            Self::InvalidLength { .. }
            | Self::InvalidMaxLength { .. }
            | Self::InvalidMaxBytes { .. } => ErrorKind::Length,
            Self::FieldRequired { .. } | Self::EmptyUpdateProfile => ErrorKind::RequiredField,
            Self::Address(_) => ErrorKind::Address,
            Self::AddressConflict { .. } => ErrorKind::Conflict,
            Self::InvalidBoxTransaction
            | Self::InvalidSignature { .. }
            | Self::InvalidDeepLink { .. }
            | Self::InvalidDeepLinkType { .. }
            | Self::InvalidSignDeepLink
            | Self::MoneyFormat { .. } => ErrorKind::Protocol,
        }
    }

    pub(crate) fn required(field: impl Into<String>) -> Self {
        Self::FieldRequired {
            field: field.into(),
        }
    }

    pub(crate) fn must_be_number(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MustBeNumber {
            field: field.into(),
            value: value.into(),
        }
    }
}
