use anyhow::{anyhow, Result};
use tiny_keccak::{Hasher, Keccak};

/// Lowercase, `0x` prefixed hex form of `bytes`. Addresses are keyed by this form.
pub fn to_hex_id(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Convert a hex string (with or without 0x prefix) to bytes.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    hex::decode(hex).map_err(|e| anyhow!("Failed to decode hex string {}: {}", hex, e))
}

/// Parse a 20 byte address stored as a hex string on an entity.
pub fn parse_address(hex: &str) -> Result<Vec<u8>> {
    let bytes = hex_to_bytes(hex)?;
    if bytes.len() != 20 {
        return Err(anyhow!("Expected a 20 byte address, got {} bytes from {}", bytes.len(), hex));
    }
    Ok(bytes)
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn hex_id_is_lowercase_and_prefixed() {
        let address = hex!("35966201A7724b952455B73a36C8846D8745218e");
        assert_eq!(to_hex_id(&address), "0x35966201a7724b952455b73a36c8846d8745218e");
    }

    #[test]
    fn parse_address_roundtrips_hex_id() {
        let id = "0x374226dbaa3e44bf3923afb63f5fd83928b7e148";
        let bytes = parse_address(id).unwrap();
        assert_eq!(to_hex_id(&bytes), id);
    }

    #[test]
    fn parse_address_rejects_wrong_length() {
        assert!(parse_address("0xdeadbeef").is_err());
        assert!(parse_address("not hex").is_err());
    }

    #[test]
    fn keccak_of_transfer_signature() {
        assert_eq!(
            keccak256(b"Transfer(address,address,uint256)"),
            hex!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }
}
