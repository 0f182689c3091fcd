//! Bech32 addresses and payment credentials.
//!
//! The builder treats addresses as opaque bech32 text except in one place:
//! resolving required signers needs the payment credential hash, which is
//! the 28 bytes following the header byte of the decoded payload.

use std::fmt;

use bech32::FromBase32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length in bytes of a payment credential hash.
const KEY_HASH_LENGTH: usize = 28;

/// Errors produced when decoding addresses.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Not valid bech32 text.
    #[error(transparent)]
    Bech32(#[from] bech32::Error),
    /// The decoded payload is too short to carry a payment credential.
    #[error("address payload too short: {0} bytes")]
    PayloadTooShort(usize),
}

/// The hash of a payment verification key.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct KeyHash([u8; KEY_HASH_LENGTH]);

impl KeyHash {
    /// Borrow the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_HASH_LENGTH] {
        &self.0
    }
}

impl From<[u8; KEY_HASH_LENGTH]> for KeyHash {
    fn from(bytes: [u8; KEY_HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A bech32-encoded address.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap bech32 address text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The bech32 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload and extract the payment credential hash.
    ///
    /// Shelley payloads are a header byte followed by the payment credential;
    /// the stake part, when present, is not examined.
    pub fn payment_key_hash(&self) -> Result<KeyHash, AddressError> {
        let (_hrp, data, _variant) = bech32::decode(&self.0)?;
        let payload = Vec::<u8>::from_base32(&data)?;
        if payload.len() < 1 + KEY_HASH_LENGTH {
            return Err(AddressError::PayloadTooShort(payload.len()));
        }
        let mut hash = [0u8; KEY_HASH_LENGTH];
        hash.copy_from_slice(&payload[1..1 + KEY_HASH_LENGTH]);
        Ok(hash.into())
    }
}

impl From<&str> for Address {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Address {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bech32::{ToBase32, Variant};

    fn encode_address(payload: &[u8]) -> Address {
        Address::new(
            bech32::encode("addr_test", payload.to_base32(), Variant::Bech32).unwrap(),
        )
    }

    #[test]
    fn it_extracts_the_payment_credential() {
        let mut payload = vec![0x00u8];
        payload.extend((1..=28).collect::<Vec<u8>>());
        payload.extend([0xee; 28]); // stake part, ignored

        let address = encode_address(&payload);
        let hash = address.payment_key_hash().unwrap();
        assert_eq!(hash.as_bytes(), &<[u8; 28]>::try_from(&payload[1..29]).unwrap());
        assert_eq!(
            hash.to_string(),
            hex::encode((1..=28).collect::<Vec<u8>>())
        );
    }

    #[test]
    fn it_rejects_short_payloads() {
        let address = encode_address(&[0x00, 0x01, 0x02]);
        assert!(matches!(
            address.payment_key_hash(),
            Err(AddressError::PayloadTooShort(3))
        ));
    }

    #[test]
    fn it_rejects_malformed_text() {
        let address = Address::new("not bech32 at all");
        assert!(matches!(
            address.payment_key_hash(),
            Err(AddressError::Bech32(_))
        ));
    }
}
