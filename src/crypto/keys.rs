//! 계정 키 생성 및 BIP-39/BIP-44 파생

use crate::errors::{UndError, UndResult};
use bip32::XPrv;
use bip39::Mnemonic;
use k256::ecdsa::SigningKey;
use rand::{rngs::OsRng, RngCore};

/// 24단어 니모닉의 엔트로피 길이 (256비트)
const MNEMONIC_ENTROPY_BYTES: usize = 32;

/// 암호학적으로 안전한 32바이트 secp256k1 개인키 생성
///
/// 곡선 군위수(order) 밖의 스칼라가 나오면 버리고 다시 뽑는다.
pub fn generate_private_key() -> [u8; 32] {
    loop {
        let mut candidate = [0u8; 32];
        OsRng.fill_bytes(&mut candidate);
        if SigningKey::from_bytes(&candidate.into()).is_ok() {
            return candidate;
        }
    }
}

/// hex 문자열을 개인키로 파싱하고 스칼라 유효성 검증
pub fn parse_private_key(private_key_hex: &str) -> UndResult<[u8; 32]> {
    let trimmed = private_key_hex.trim_start_matches("0x");
    let bytes = hex::decode(trimmed).map_err(|_| UndError::InvalidPrivateKey {
        message: "expected 64 hex characters".to_string(),
    })?;
    let key: [u8; 32] = bytes
        .try_into()
        .map_err(|_| UndError::InvalidPrivateKey {
            message: "expected 32 bytes".to_string(),
        })?;
    SigningKey::from_bytes(&key.into()).map_err(|_| UndError::InvalidPrivateKey {
        message: "scalar out of curve order".to_string(),
    })?;
    Ok(key)
}

/// 개인키에서 압축 공개키(33바이트) 유도
pub fn private_key_to_public_key(private_key: &[u8; 32]) -> UndResult<[u8; 33]> {
    let signing_key =
        SigningKey::from_bytes(private_key.into()).map_err(|_| UndError::InvalidPrivateKey {
            message: "scalar out of curve order".to_string(),
        })?;
    let verifying_key = signing_key.verifying_key();
    let encoded = verifying_key.to_encoded_point(true);
    let compressed: [u8; 33] =
        encoded
            .as_bytes()
            .try_into()
            .map_err(|_| UndError::InvalidPrivateKey {
                message: "failed to compress public key".to_string(),
            })?;
    Ok(compressed)
}

/// 새 24단어 BIP-39 니모닉 생성
pub fn generate_mnemonic() -> UndResult<String> {
    let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy(&entropy).map_err(|err| UndError::InvalidMnemonic {
        message: err.to_string(),
    })?;
    Ok(mnemonic.to_string())
}

/// 니모닉을 BIP-39 시드(64바이트)로 변환
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> UndResult<[u8; 64]> {
    let parsed =
        Mnemonic::parse_normalized(mnemonic).map_err(|err| UndError::InvalidMnemonic {
            message: err.to_string(),
        })?;
    Ok(parsed.to_seed(passphrase))
}

/// 니모닉에서 개인키 파생
///
/// `use_hd_path`가 true면 m/44'/{coin_type}'/0'/0/{index} 경로로
/// BIP-32 파생하고, false면 시드 앞 32바이트를 그대로 사용한다.
pub fn private_key_from_mnemonic(
    mnemonic: &str,
    use_hd_path: bool,
    index: u32,
    coin_type: u32,
) -> UndResult<[u8; 32]> {
    let seed = mnemonic_to_seed(mnemonic, "")?;

    if !use_hd_path {
        let mut key = [0u8; 32];
        key.copy_from_slice(&seed[..32]);
        SigningKey::from_bytes(&key.into()).map_err(|_| UndError::InvalidPrivateKey {
            message: "seed does not yield a valid key".to_string(),
        })?;
        return Ok(key);
    }

    let path = format!("m/44'/{coin_type}'/0'/0/{index}");
    let derivation_path = path.parse().map_err(|_| UndError::InvalidInput {
        message: format!("invalid derivation path: {path}"),
    })?;
    let xprv =
        XPrv::derive_from_path(seed, &derivation_path).map_err(|err| {
            UndError::InvalidPrivateKey {
                message: format!("derivation failed: {err}"),
            }
        })?;

    let mut key = [0u8; 32];
    key.copy_from_slice(&xprv.private_key().to_bytes());
    Ok(key)
}
