//! 비밀번호 기반 키스토어 (V1)
//!
//! PBKDF2-HMAC-SHA256으로 키를 늘리고 AES-256-CTR로 개인키를 암호화한다.
//! MAC은 Keccak-512(derivedKey[16..32] || ciphertext)이며, 구버전 키스토어의
//! Keccak-256 MAC도 복호화 시에는 허용한다. MAC 불일치는 복호화 거부로
//! 이어진다 (fail closed).

use crate::errors::{UndError, UndResult};
use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes256;
use ctr::Ctr128BE;
use k256::ecdsa::SigningKey;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest, Keccak256, Keccak512};
use uuid::Uuid;

type Aes256Ctr = Ctr128BE<Aes256>;

const KEYSTORE_VERSION: u32 = 1;
const KDF_PBKDF2: &str = "pbkdf2";
const PRF_HMAC_SHA256: &str = "hmac-sha256";
const CIPHER_AES_256_CTR: &str = "aes-256-ctr";
const PBKDF2_ROUNDS: u32 = 262_144;
const DKLEN: usize = 32;

/// 키스토어 문서
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keystore {
    pub version: u32,
    pub id: String,
    pub crypto: KeystoreCrypto,
}

/// 암호화 파라미터 블록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub ciphertext: String,
    pub cipherparams: CipherParams,
    pub cipher: String,
    pub kdf: String,
    pub kdfparams: KdfParams,
    pub mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    pub dklen: u32,
    pub salt: String,
    pub c: u32,
    pub prf: String,
}

fn derive_key(password: &str, salt: &[u8], rounds: u32) -> [u8; DKLEN] {
    let mut derived = [0u8; DKLEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut derived);
    derived
}

fn compute_mac(derived_key: &[u8; DKLEN], ciphertext: &[u8]) -> String {
    let mut hasher = Keccak512::new();
    hasher.update(&derived_key[16..32]);
    hasher.update(ciphertext);
    hex::encode(hasher.finalize())
}

fn compute_legacy_mac(derived_key: &[u8; DKLEN], ciphertext: &[u8]) -> String {
    let mut hasher = Keccak256::new();
    hasher.update(&derived_key[16..32]);
    hasher.update(ciphertext);
    hex::encode(hasher.finalize())
}

/// 개인키를 비밀번호로 암호화한 키스토어 생성
pub fn generate_keystore(private_key: &[u8; 32], password: &str) -> UndResult<Keystore> {
    if password.is_empty() {
        return Err(UndError::KeystoreError {
            message: "password should not be empty".to_string(),
        });
    }

    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut iv);

    let derived = derive_key(password, &salt, PBKDF2_ROUNDS);

    let mut ciphertext = *private_key;
    let mut cipher = Aes256Ctr::new(&derived.into(), &iv.into());
    cipher.apply_keystream(&mut ciphertext);

    Ok(Keystore {
        version: KEYSTORE_VERSION,
        id: Uuid::new_v4().to_string(),
        crypto: KeystoreCrypto {
            ciphertext: hex::encode(ciphertext),
            cipherparams: CipherParams {
                iv: hex::encode(iv),
            },
            cipher: CIPHER_AES_256_CTR.to_string(),
            kdf: KDF_PBKDF2.to_string(),
            kdfparams: KdfParams {
                dklen: DKLEN as u32,
                salt: hex::encode(salt),
                c: PBKDF2_ROUNDS,
                prf: PRF_HMAC_SHA256.to_string(),
            },
            mac: compute_mac(&derived, &ciphertext),
        },
    })
}

/// 키스토어에서 개인키 복호화
pub fn get_private_key_from_keystore(keystore: &Keystore, password: &str) -> UndResult<[u8; 32]> {
    let crypto = &keystore.crypto;

    if !crypto.kdf.eq_ignore_ascii_case(KDF_PBKDF2) {
        return Err(UndError::KeystoreError {
            message: format!("unsupported key derivation scheme: {}", crypto.kdf),
        });
    }
    if !crypto.kdfparams.prf.eq_ignore_ascii_case(PRF_HMAC_SHA256) {
        return Err(UndError::KeystoreError {
            message: format!("unsupported prf: {}", crypto.kdfparams.prf),
        });
    }
    if !crypto.cipher.eq_ignore_ascii_case(CIPHER_AES_256_CTR) {
        return Err(UndError::KeystoreError {
            message: format!("unsupported cipher: {}", crypto.cipher),
        });
    }

    let salt = hex::decode(&crypto.kdfparams.salt).map_err(|_| UndError::KeystoreError {
        message: "invalid salt encoding".to_string(),
    })?;
    let ciphertext = hex::decode(&crypto.ciphertext).map_err(|_| UndError::KeystoreError {
        message: "invalid ciphertext encoding".to_string(),
    })?;
    let iv_bytes = hex::decode(&crypto.cipherparams.iv).map_err(|_| UndError::KeystoreError {
        message: "invalid iv encoding".to_string(),
    })?;
    let iv: [u8; 16] = iv_bytes.try_into().map_err(|_| UndError::KeystoreError {
        message: "iv should be 16 bytes".to_string(),
    })?;

    let derived = derive_key(password, &salt, crypto.kdfparams.c);

    // MAC 검증을 통과하지 못하면 복호화하지 않는다
    let mac = compute_mac(&derived, &ciphertext);
    if !mac.eq_ignore_ascii_case(&crypto.mac) {
        let legacy_mac = compute_legacy_mac(&derived, &ciphertext);
        if !legacy_mac.eq_ignore_ascii_case(&crypto.mac) {
            return Err(UndError::KeystoreMacMismatch);
        }
    }

    let mut plaintext = ciphertext;
    let mut cipher = Aes256Ctr::new(&derived.into(), &iv.into());
    cipher.apply_keystream(&mut plaintext);

    let key: [u8; 32] = plaintext.try_into().map_err(|_| UndError::KeystoreError {
        message: "decrypted key should be 32 bytes".to_string(),
    })?;
    SigningKey::from_bytes(&key.into()).map_err(|_| UndError::KeystoreError {
        message: "decrypted key is not a valid scalar".to_string(),
    })?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::generate_private_key;

    #[test]
    fn test_keystore_roundtrip() {
        let key = generate_private_key();
        let keystore = generate_keystore(&key, "1234567").unwrap();

        assert_eq!(keystore.version, 1);
        assert_eq!(keystore.crypto.kdf, "pbkdf2");
        assert_eq!(keystore.crypto.kdfparams.c, 262_144);
        assert_eq!(keystore.crypto.cipher, "aes-256-ctr");
        // Keccak-512 MAC은 128 hex 문자
        assert_eq!(keystore.crypto.mac.len(), 128);

        let recovered = get_private_key_from_keystore(&keystore, "1234567").unwrap();
        assert_eq!(recovered, key);
    }

    // 기존 지갑이 만든 키스토어의 MAC과 같은 해시로 계산되는지 고정
    #[test]
    fn test_mac_matches_external_keystore_vector() {
        let salt =
            hex::decode("bf06d1eb91253d1a2d8cba9bfebd39fe1554aa85ac5bd9ce8c8867c11e49ba0f")
                .unwrap();
        let ciphertext =
            hex::decode("777a62eaccc8acbb22766057c58f162d9b4f5c68a9bb7673626445ed4f480506")
                .unwrap();
        let derived = derive_key("12345678", &salt, PBKDF2_ROUNDS);
        assert_eq!(
            compute_mac(&derived, &ciphertext),
            "268a8de77b1a0b80252d5684c7e2b472fb9beaf01cb0eab88a55ec219311aedf8850a5b51089e58570a556f6468b6816bc533b3b20e287db8e5785aa15948fb5"
        );
    }

    #[test]
    fn test_wrong_password_rejected() {
        let key = generate_private_key();
        let keystore = generate_keystore(&key, "1234567").unwrap();
        let err = get_private_key_from_keystore(&keystore, "7654321").unwrap_err();
        assert_eq!(err.code(), "KEYSTORE_MAC_MISMATCH");
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let key = generate_private_key();
        let mut keystore = generate_keystore(&key, "1234567").unwrap();
        let mut raw = hex::decode(&keystore.crypto.ciphertext).unwrap();
        raw[0] ^= 0xff;
        keystore.crypto.ciphertext = hex::encode(raw);
        assert!(get_private_key_from_keystore(&keystore, "1234567").is_err());
    }

    #[test]
    fn test_unsupported_kdf_rejected() {
        let key = generate_private_key();
        let mut keystore = generate_keystore(&key, "1234567").unwrap();
        keystore.crypto.kdf = "scrypt".to_string();
        let err = get_private_key_from_keystore(&keystore, "1234567").unwrap_err();
        assert!(err
            .to_string()
            .contains("unsupported key derivation scheme: scrypt"));
    }

    #[test]
    fn test_keystore_json_shape() {
        let key = generate_private_key();
        let keystore = generate_keystore(&key, "1234567").unwrap();
        let json = serde_json::to_value(&keystore).unwrap();
        assert!(json["crypto"]["cipherparams"]["iv"].is_string());
        assert_eq!(json["crypto"]["kdfparams"]["dklen"], 32);
        assert_eq!(json["crypto"]["kdfparams"]["prf"], "hmac-sha256");
    }
}
