//! Transaction assembly and signing
//!
//! A transaction moves through three states: assembled (msgs + fee +
//! account coordinates), signed (signature attached), enveloped (wrapped
//! with a broadcast mode for the REST endpoint). Signing is delegated to
//! a [`signer::TxSigner`] so local keys and hardware devices share one
//! pipeline.

pub mod signer;

use crate::encoder::canonical::convert_object_to_sign_bytes;
use crate::errors::{UndError, UndResult};
use crate::msg::{Coin, Msg};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

pub use signer::{DeviceSigner, LocalKeySigner, StdSignature, TxSigner, PUBKEY_TYPE};

/// Broadcast mode accepted by the /txs endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadcastMode {
    #[default]
    Sync,
    Async,
    Block,
}

impl BroadcastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastMode::Sync => "sync",
            BroadcastMode::Async => "async",
            BroadcastMode::Block => "block",
        }
    }
}

impl FromStr for BroadcastMode {
    type Err = UndError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sync" => Ok(BroadcastMode::Sync),
            "async" => Ok(BroadcastMode::Async),
            "block" => Ok(BroadcastMode::Block),
            other => Err(UndError::InvalidBroadcastMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BroadcastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction fee: coin list plus a gas limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

impl Fee {
    pub fn new(amount: Vec<Coin>, gas: u64) -> Self {
        Fee {
            amount,
            gas: gas.to_string(),
        }
    }
}

/// Inputs for assembling a transaction
#[derive(Debug, Clone)]
pub struct TxOptions {
    pub account_number: u64,
    pub chain_id: String,
    pub memo: String,
    pub msg: Msg,
    pub sequence: u64,
    pub fee: Fee,
}

/// The inner standard transaction of the broadcast envelope
#[derive(Debug, Clone, Serialize)]
pub struct StdTx {
    pub msg: Vec<Msg>,
    pub fee: Fee,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

/// The final broadcast payload: `{tx, mode}`
#[derive(Debug, Clone, Serialize)]
pub struct SignedTx {
    pub tx: StdTx,
    pub mode: String,
}

/// A transaction being assembled and signed
#[derive(Debug, Clone)]
pub struct Transaction {
    sequence: u64,
    account_number: u64,
    chain_id: String,
    msgs: Vec<Msg>,
    memo: String,
    fee: Fee,
    signature: Option<StdSignature>,
}

impl Transaction {
    pub fn new(options: TxOptions) -> UndResult<Self> {
        if options.chain_id.is_empty() {
            return Err(UndError::InvalidInput {
                message: "chain id should not be empty".to_string(),
            });
        }
        Ok(Transaction {
            sequence: options.sequence,
            account_number: options.account_number,
            chain_id: options.chain_id,
            msgs: vec![options.msg],
            memo: options.memo,
            fee: options.fee,
            signature: None,
        })
    }

    /// The amino StdSignDoc. Numeric account coordinates are rendered
    /// as decimal strings, as consensus verifiers expect.
    pub fn sign_doc(&self) -> Value {
        json!({
            "account_number": self.account_number.to_string(),
            "chain_id": self.chain_id,
            "fee": self.fee,
            "memo": self.memo,
            "msgs": self.msgs,
            "sequence": self.sequence.to_string(),
        })
    }

    /// Canonical bytes of the sign doc
    pub fn sign_bytes(&self) -> UndResult<Vec<u8>> {
        convert_object_to_sign_bytes(&self.sign_doc())
    }

    /// Sign the transaction with the given delegate
    pub async fn sign(&mut self, signer: &dyn TxSigner) -> UndResult<&mut Self> {
        let signature = signer.sign(&self.sign_doc()).await?;
        self.signature = Some(signature);
        Ok(self)
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Wrap into the broadcast envelope; fails before `sign`
    pub fn to_signed_tx(&self, mode: BroadcastMode) -> UndResult<SignedTx> {
        let signature = self.signature.clone().ok_or(UndError::TxNotSigned)?;
        Ok(SignedTx {
            tx: StdTx {
                msg: self.msgs.clone(),
                fee: self.fee.clone(),
                signatures: vec![signature],
                memo: self.memo.clone(),
            },
            mode: mode.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use crate::msg::{MsgParams, MsgType};

    fn sample_msg() -> Msg {
        Msg::build(
            MsgType::Send,
            MsgParams {
                from_address: Some("und1x8pl6wzqf9atkm77ymc5vn5dnpl5xytmn200xy".to_string()),
                to_address: Some("und150xrwj6ca9kyzz20e4x0qj6zm0206jhe4tk7nf".to_string()),
                amount: Some("1".to_string()),
                denom: Some("und".to_string()),
                ..Default::default()
            },
            &ChainConfig::default(),
        )
        .unwrap()
    }

    fn sample_tx() -> Transaction {
        Transaction::new(TxOptions {
            account_number: 23,
            chain_id: "FUND-Mainchain-MainNet".to_string(),
            memo: "".to_string(),
            msg: sample_msg(),
            sequence: 1,
            fee: Fee::new(vec![Coin::new("nund", "1000")], 90_000),
        })
        .unwrap()
    }

    #[test]
    fn test_empty_chain_id_rejected() {
        let err = Transaction::new(TxOptions {
            account_number: 0,
            chain_id: "".to_string(),
            memo: "".to_string(),
            msg: sample_msg(),
            sequence: 0,
            fee: Fee::new(vec![], 0),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: chain id should not be empty");
    }

    #[test]
    fn test_sign_doc_decimal_strings() {
        let doc = sample_tx().sign_doc();
        assert_eq!(doc["account_number"], "23");
        assert_eq!(doc["sequence"], "1");
        assert_eq!(doc["chain_id"], "FUND-Mainchain-MainNet");
    }

    #[test]
    fn test_sign_bytes_canonical_order() {
        let bytes = sample_tx().sign_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(r#"{"account_number":"23","chain_id":"#));
        assert!(!text.contains(' '));
    }

    #[test]
    fn test_envelope_before_sign_fails() {
        let tx = sample_tx();
        let err = tx.to_signed_tx(BroadcastMode::Sync).unwrap_err();
        assert_eq!(err.code(), "TX_NOT_SIGNED");
    }

    #[test]
    fn test_broadcast_mode_parsing() {
        assert_eq!("sync".parse::<BroadcastMode>().unwrap(), BroadcastMode::Sync);
        assert_eq!("async".parse::<BroadcastMode>().unwrap(), BroadcastMode::Async);
        assert_eq!("block".parse::<BroadcastMode>().unwrap(), BroadcastMode::Block);
        let err = "commit".parse::<BroadcastMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported broadcast mode: commit (expected sync, async or block)"
        );
    }

    #[tokio::test]
    async fn test_signed_envelope_shape() {
        let key = crate::crypto::keys::generate_private_key();
        let signer = LocalKeySigner::new(key).unwrap();
        let mut tx = sample_tx();
        tx.sign(&signer).await.unwrap();

        let envelope = tx.to_signed_tx(BroadcastMode::Block).unwrap();
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["mode"], "block");
        assert_eq!(json["tx"]["signatures"].as_array().unwrap().len(), 1);
        assert_eq!(
            json["tx"]["signatures"][0]["pub_key"]["type"],
            "tendermint/PubKeySecp256k1"
        );
        assert_eq!(json["tx"]["fee"]["gas"], "90000");
        assert_eq!(json["tx"]["memo"], "");
    }
}
