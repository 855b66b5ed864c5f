use crate::error::EncodingError;

/// 32-byte big-endian uint256.
pub fn encode_uint256(amount: i64) -> Result<[u8; 32], EncodingError> {
    let value = u64::try_from(amount).map_err(|_| EncodingError::NegativeAmount(amount))?;
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    Ok(out)
}

pub fn encode_string(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

/// `0x`-prefixed lowercase hex, the form the on-chain consumer is handed.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
