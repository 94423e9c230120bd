//! 암호화 모듈
//!
//! Unification 계정 키 관리 및 트랜잭션 서명을 위한 암호화 기능을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `keys`: 개인키 생성, BIP-39 니모닉, BIP-44 HD 파생
//! - `address`: secp256k1 공개키 → bech32 주소 변환 및 검증
//! - `signer`: RFC 6979 결정적 ECDSA 서명 (compact 64바이트, low-S)
//! - `keystore`: 비밀번호 기반 키스토어 (PBKDF2 + AES-256-CTR)
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use und_rust::crypto::{keys, address, signer};
//!
//! let private_key = keys::private_key_from_mnemonic(&mnemonic, true, 0, 5555)?;
//! let public_key = keys::private_key_to_public_key(&private_key)?;
//! let addr = address::public_key_to_address(&public_key, "und")?;
//! let sig = signer::generate_signature(sign_bytes, &private_key)?;
//! ```

pub mod address;
pub mod keys;
pub mod keystore;
pub mod signer;

pub use address::{check_address, decode_address, private_key_to_address, public_key_to_address};
pub use keys::{
    generate_mnemonic, generate_private_key, mnemonic_to_seed, parse_private_key,
    private_key_from_mnemonic, private_key_to_public_key,
};
pub use keystore::{generate_keystore, get_private_key_from_keystore, Keystore};
pub use signer::{generate_signature, verify_signature, EcdsaSignature};
