//! 트랜잭션 서명 생성 및 검증
//!
//! RFC 6979 결정적 논스를 사용하는 secp256k1 ECDSA. 서명 대상 바이트에
//! SHA-256을 한 번 적용한 다이제스트에 서명하며, 합의 계층이 high-S
//! 서명을 거부하므로 항상 low-S로 정규화한다.

use crate::errors::{UndError, UndResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

/// 64바이트 compact ECDSA 서명 (r || s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// r 값 (32바이트)
    pub r: [u8; 32],
    /// s 값 (32바이트, low-S)
    pub s: [u8; 32],
}

impl EcdsaSignature {
    /// compact 64바이트로 직렬화
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        bytes
    }

    /// compact 64바이트에서 복원
    pub fn from_bytes(bytes: &[u8]) -> UndResult<Self> {
        if bytes.len() != 64 {
            return Err(UndError::SignatureError {
                message: format!("expected 64 bytes, got {}", bytes.len()),
            });
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(EcdsaSignature { r, s })
    }

    /// DER 인코딩에서 복원, low-S로 정규화 (하드웨어 장치 응답 처리용)
    pub fn from_der(der: &[u8]) -> UndResult<Self> {
        let signature = Signature::from_der(der).map_err(|err| UndError::SignatureError {
            message: format!("invalid der signature: {err}"),
        })?;
        let normalized = signature.normalize_s().unwrap_or(signature);
        Self::from_bytes(&normalized.to_bytes())
    }

    /// hex 문자열에서 복원
    pub fn from_hex(hex_str: &str) -> UndResult<Self> {
        let bytes = hex::decode(hex_str).map_err(|err| UndError::SignatureError {
            message: format!("invalid hex signature: {err}"),
        })?;
        Self::from_bytes(&bytes)
    }

    /// hex 문자열로 변환
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// base64 문자열로 변환 (브로드캐스트 페이로드용)
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }
}

/// 메시지 바이트에 서명 (SHA-256 + RFC 6979, low-S)
pub fn generate_signature(message: &[u8], private_key: &[u8; 32]) -> UndResult<EcdsaSignature> {
    let signing_key =
        SigningKey::from_bytes(private_key.into()).map_err(|_| UndError::InvalidPrivateKey {
            message: "scalar out of curve order".to_string(),
        })?;
    let signature: Signature = signing_key.sign(message);
    let signature = signature.normalize_s().unwrap_or(signature);
    EcdsaSignature::from_bytes(&signature.to_bytes())
}

/// hex로 인코딩된 메시지에 서명
pub fn generate_signature_hex(message_hex: &str, private_key: &[u8; 32]) -> UndResult<EcdsaSignature> {
    let message = hex::decode(message_hex).map_err(|err| UndError::InvalidInput {
        message: format!("invalid hex message: {err}"),
    })?;
    generate_signature(&message, private_key)
}

/// 서명 검증
pub fn verify_signature(
    signature: &EcdsaSignature,
    message: &[u8],
    public_key: &[u8; 33],
) -> UndResult<bool> {
    let verifying_key =
        VerifyingKey::from_sec1_bytes(public_key).map_err(|err| UndError::SignatureError {
            message: format!("invalid public key: {err}"),
        })?;
    let parsed =
        Signature::from_slice(&signature.to_bytes()).map_err(|err| UndError::SignatureError {
            message: format!("invalid signature: {err}"),
        })?;
    Ok(verifying_key.verify(message, &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{generate_private_key, parse_private_key, private_key_to_public_key};

    #[test]
    fn test_deterministic_signature_vector() {
        let key =
            parse_private_key("30c5e838578a29e3e9273edddd753d6c9b38aca2446dd84bdfe2e5988b0da0a1")
                .unwrap();
        let message_hex = "7b226163636f756e745f6e756d626572223a2231222c22636861696e5f6964223a22626e62636861696e2d31303030222c226d656d6f223a22222c226d736773223a5b7b226964223a22423635363144434331303431333030353941374330384634384336343631304331463646393036342d3130222c226f7264657274797065223a322c227072696365223a3130303030303030302c227175616e74697479223a313230303030303030302c2273656e646572223a22626e63316b6574706d6e71736779637174786e7570723667636572707073306b6c797279687a36667a6c222c2273696465223a312c2273796d626f6c223a224254432d3543345f424e42222c2274696d65696e666f726365223a317d5d2c2273657175656e6365223a2239227d";
        let signature = generate_signature_hex(message_hex, &key).unwrap();
        assert_eq!(
            signature.to_hex(),
            "9c0421217ef92d556a14e3f442b07c85f6fc706dfcd8a72d6b58f05f96e95aa226b10f7cf62ccf7c9d5d953fa2c9ae80a1eacaf0c779d0253f1a34afd17eef34"
        );
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = generate_private_key();
        let public_key = private_key_to_public_key(&key).unwrap();
        let message = b"{\"account_number\":\"1\",\"sequence\":\"9\"}";

        let signature = generate_signature(message, &key).unwrap();
        assert!(verify_signature(&signature, message, &public_key).unwrap());
    }

    #[test]
    fn test_sign_verify_utf8_payload() {
        let key = generate_private_key();
        let public_key = private_key_to_public_key(&key).unwrap();
        let message = "{\"memo\":\"smiley!\u{263a}\",\"sequence\":1}".as_bytes();

        let signature = generate_signature(message, &key).unwrap();
        assert!(verify_signature(&signature, message, &public_key).unwrap());
    }

    #[test]
    fn test_verify_rejects_tampered_message() {
        let key = generate_private_key();
        let public_key = private_key_to_public_key(&key).unwrap();
        let signature = generate_signature(b"original", &key).unwrap();
        assert!(!verify_signature(&signature, b"tampered", &public_key).unwrap());
    }

    #[test]
    fn test_signature_codecs() {
        let key = generate_private_key();
        let signature = generate_signature(b"payload", &key).unwrap();

        let restored = EcdsaSignature::from_hex(&signature.to_hex()).unwrap();
        assert_eq!(restored, signature);
        assert_eq!(signature.to_bytes().len(), 64);
        assert!(EcdsaSignature::from_bytes(&[0u8; 63]).is_err());
    }
}
