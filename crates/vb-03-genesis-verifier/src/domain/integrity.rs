//! # Integrity Checks
//!
//! Content comparison is done on parsed JSON, so key order or whitespace
//! differences between the two roles do not count as a mismatch. A gateway
//! may wrap the document as `{"genesis": {...}}`; that envelope is removed
//! from both sides before comparing. When either side is not JSON the
//! copies are compared byte for byte.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::GenesisError;

/// Parsed document with any `{"genesis": ...}` envelope removed.
pub fn canonical_form(bytes: &[u8]) -> Result<Value, GenesisError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| GenesisError::Malformed(format!("genesis is not JSON: {}", e)))?;
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("genesis") => {
            Ok(map.remove("genesis").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

/// Lowercase hex SHA-256.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Trim, drop an optional `0x`, lowercase.
pub fn normalize_checksum(checksum: &str) -> String {
    let trimmed = checksum.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}

/// Fail unless both documents have the same content.
pub fn verify_same_content(rpc_copy: &[u8], gateway_copy: &[u8]) -> Result<(), GenesisError> {
    let same = match (canonical_form(rpc_copy), canonical_form(gateway_copy)) {
        (Ok(a), Ok(b)) => a == b,
        _ => rpc_copy == gateway_copy,
    };
    if !same {
        return Err(GenesisError::FilesContentNotIdentical);
    }
    Ok(())
}

/// Fail unless `published` is the SHA-256 of `document`. Returns the digest.
pub fn verify_checksum(document: &[u8], published: &str) -> Result<String, GenesisError> {
    let expected = normalize_checksum(published);
    let actual = sha256_hex(document);
    if expected != actual {
        return Err(GenesisError::Sha256ChecksumMismatch { expected, actual });
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &[u8] = br#"{"chain_id":"testnet-1","initial_height":"1"}"#;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_normalize_checksum() {
        assert_eq!(normalize_checksum(" 0xABcd "), "abcd");
        assert_eq!(normalize_checksum("0Xff"), "ff");
        assert_eq!(normalize_checksum("ff"), "ff");
    }

    #[test]
    fn test_envelope_and_key_order_do_not_matter() {
        let wrapped = br#"{"genesis": {"initial_height":"1", "chain_id":"testnet-1"}}"#;
        assert!(verify_same_content(DOC, wrapped).is_ok());
        assert!(verify_same_content(DOC, DOC).is_ok());
    }

    #[test]
    fn test_genesis_key_among_others_is_not_an_envelope() {
        let value = canonical_form(br#"{"genesis":{"a":1},"other":2}"#).unwrap();
        assert!(value.get("other").is_some());
    }

    #[test]
    fn test_different_content_is_rejected() {
        let other = br#"{"chain_id":"testnet-2","initial_height":"1"}"#;
        assert_eq!(
            verify_same_content(DOC, other),
            Err(GenesisError::FilesContentNotIdentical)
        );
    }

    #[test]
    fn test_non_json_copy_is_a_content_mismatch() {
        assert_eq!(
            verify_same_content(DOC, b"<html>502 Bad Gateway</html>"),
            Err(GenesisError::FilesContentNotIdentical)
        );
        assert_eq!(
            verify_same_content(br#"{"chain_id":"#, DOC),
            Err(GenesisError::FilesContentNotIdentical)
        );
        assert!(verify_same_content(b"<html>", b"<html>").is_ok());
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert!(matches!(
            canonical_form(b"<html>"),
            Err(GenesisError::Malformed(_))
        ));
    }

    #[test]
    fn test_checksum_match_and_mismatch() {
        let digest = sha256_hex(DOC);
        assert_eq!(
            verify_checksum(DOC, &format!("0x{}", digest.to_uppercase())).unwrap(),
            digest
        );

        let err = verify_checksum(DOC, "0xdeadbeef").unwrap_err();
        assert_eq!(
            err,
            GenesisError::Sha256ChecksumMismatch {
                expected: "deadbeef".into(),
                actual: digest,
            }
        );
    }
}
