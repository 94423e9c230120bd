//! Signing delegates
//!
//! One trait, two strategies: [`LocalKeySigner`] signs with an in-memory
//! private key, [`DeviceSigner`] forwards the canonical document to a
//! hardware device and normalizes its DER response to compact low-S.

use crate::crypto::signer::{generate_signature, EcdsaSignature};
use crate::encoder::canonical::convert_object_to_sign_bytes;
use crate::errors::{UndError, UndResult};
use crate::ledger::{check_return_code, DeviceTransport};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k256::ecdsa::SigningKey;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Algorithm tag attached to every public key entry
pub const PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// A signature entry of the broadcast envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StdSignature {
    pub signature: String,
    pub pub_key: PubKeyEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PubKeyEntry {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: String,
}

impl StdSignature {
    pub fn new(signature: &EcdsaSignature, compressed_pk: &[u8]) -> Self {
        StdSignature {
            signature: signature.to_base64(),
            pub_key: PubKeyEntry {
                type_tag: PUBKEY_TYPE.to_string(),
                value: BASE64.encode(compressed_pk),
            },
        }
    }
}

/// A signing strategy bound to a client session
#[async_trait]
pub trait TxSigner: Send + Sync {
    /// Sign the amino sign doc, returning a complete signature entry
    async fn sign(&self, sign_doc: &Value) -> UndResult<StdSignature>;
}

/// Signs with an in-memory private key
pub struct LocalKeySigner {
    private_key: [u8; 32],
    compressed_pk: [u8; 33],
}

impl LocalKeySigner {
    pub fn new(private_key: [u8; 32]) -> UndResult<Self> {
        SigningKey::from_bytes(&private_key.into()).map_err(|_| UndError::InvalidPrivateKey {
            message: "scalar out of curve order".to_string(),
        })?;
        let compressed_pk = crate::crypto::keys::private_key_to_public_key(&private_key)?;
        Ok(LocalKeySigner {
            private_key,
            compressed_pk,
        })
    }

    pub fn compressed_pk(&self) -> &[u8; 33] {
        &self.compressed_pk
    }
}

// 개인키가 로그에 노출되지 않도록 Debug에서 제외
impl fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("private_key", &"<redacted>")
            .field("compressed_pk", &hex::encode(self.compressed_pk))
            .finish()
    }
}

#[async_trait]
impl TxSigner for LocalKeySigner {
    async fn sign(&self, sign_doc: &Value) -> UndResult<StdSignature> {
        let sign_bytes = convert_object_to_sign_bytes(sign_doc)?;
        let signature = generate_signature(&sign_bytes, &self.private_key)?;
        Ok(StdSignature::new(&signature, &self.compressed_pk))
    }
}

/// Signs through a hardware device transport
#[derive(Clone)]
pub struct DeviceSigner {
    transport: Arc<dyn DeviceTransport>,
    path: [u32; 5],
    hrp: String,
}

impl DeviceSigner {
    pub fn new(transport: Arc<dyn DeviceTransport>, path: [u32; 5], hrp: impl Into<String>) -> Self {
        DeviceSigner {
            transport,
            path,
            hrp: hrp.into(),
        }
    }

    /// Ask the device for its address and public key at the bound path
    pub async fn get_address(&self) -> UndResult<(String, Vec<u8>)> {
        let response = self
            .transport
            .get_address_and_pub_key(&self.path, &self.hrp)
            .await?;
        check_return_code(response.return_code, &response.error_message)?;
        Ok((response.bech32_address, response.compressed_pk))
    }
}

impl fmt::Debug for DeviceSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSigner")
            .field("path", &self.path)
            .field("hrp", &self.hrp)
            .finish()
    }
}

#[async_trait]
impl TxSigner for DeviceSigner {
    async fn sign(&self, sign_doc: &Value) -> UndResult<StdSignature> {
        let sign_bytes = convert_object_to_sign_bytes(sign_doc)?;

        let signed = self.transport.sign(&self.path, &sign_bytes).await?;
        check_return_code(signed.return_code, &signed.error_message)?;

        // Devices answer in DER; the chain wants compact low-S
        let signature = EcdsaSignature::from_der(&signed.signature)?;

        let address = self
            .transport
            .get_address_and_pub_key(&self.path, &self.hrp)
            .await?;
        check_return_code(address.return_code, &address.error_message)?;

        Ok(StdSignature::new(&signature, &address.compressed_pk))
    }
}
