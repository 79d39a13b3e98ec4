//! Account addresses on the ledger.
//!
//! The 20-byte EVM address type comes from `alloy-primitives`; this module adds
//! the parsing and display helpers the client needs on top of it.

use std::str::FromStr;

use crate::error::TypesError;

pub use alloy_primitives::Address;

/// Parse a `0x`-prefixed hex address.
///
/// Accepts any letter case; the prefix is required so that bare numbers typed
/// into a config file are not silently taken as addresses.
pub fn parse_address(raw: &str) -> Result<Address, TypesError> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(TypesError::InvalidAddress(raw.to_string()));
    }
    Address::from_str(trimmed).map_err(|_| TypesError::InvalidAddress(raw.to_string()))
}

/// Abbreviated checksummed form, e.g. `0x71C7…976F`.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_lowercase() {
        let addr = parse_address("0x00000000000000000000000000000000000000ab").unwrap();
        assert_eq!(addr.as_slice()[19], 0xab);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = parse_address("00000000000000000000000000000000000000ab").unwrap_err();
        assert!(matches!(err, TypesError::InvalidAddress(_)));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(parse_address("0xabc").is_err());
    }

    #[test]
    fn short_address_keeps_ends() {
        let addr = Address::repeat_byte(0x11);
        let short = short_address(&addr);
        assert!(short.starts_with("0x1111"));
        assert!(short.ends_with("1111"));
        assert!(short.contains('…'));
    }
}
