//! bech32 주소 유도 및 검증
//!
//! 주소는 RIPEMD160(SHA256(압축 공개키)) 20바이트를 bech32로 인코딩한다.

use crate::crypto::keys::private_key_to_public_key;
use crate::errors::{UndError, UndResult};
use bech32::{Bech32, Hrp};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// 압축 공개키에서 bech32 주소 생성
pub fn public_key_to_address(public_key: &[u8; 33], prefix: &str) -> UndResult<String> {
    let sha_hash = Sha256::digest(public_key);
    let ripemd_hash = Ripemd160::digest(sha_hash);

    let hrp = Hrp::parse(prefix).map_err(|err| UndError::InvalidInput {
        message: format!("invalid bech32 prefix {prefix}: {err}"),
    })?;
    bech32::encode::<Bech32>(hrp, &ripemd_hash).map_err(|err| UndError::InvalidAddress {
        address: format!("encoding failed: {err}"),
    })
}

/// 개인키에서 bech32 주소 생성
pub fn private_key_to_address(private_key: &[u8; 32], prefix: &str) -> UndResult<String> {
    let public_key = private_key_to_public_key(private_key)?;
    public_key_to_address(&public_key, prefix)
}

/// 주소를 디코딩하여 20바이트 페이로드 반환
pub fn decode_address(address: &str) -> UndResult<Vec<u8>> {
    let (_, data) = bech32::decode(address).map_err(|_| UndError::InvalidAddress {
        address: address.to_string(),
    })?;
    if data.len() != 20 {
        return Err(UndError::InvalidAddress {
            address: address.to_string(),
        });
    }
    Ok(data)
}

/// 주소가 기대한 프리픽스의 유효한 bech32 주소인지 확인
///
/// 검증 전용이므로 실패 사유 없이 bool만 반환한다.
pub fn check_address(address: &str, expected_prefix: &str) -> bool {
    match bech32::decode(address) {
        Ok((hrp, data)) => hrp.as_str() == expected_prefix && data.len() == 20,
        Err(_) => false,
    }
}
