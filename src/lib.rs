//! und-rust: Unification Mainchain (FUND) 클라이언트 SDK
//!
//! 계정 키 관리, amino JSON 트랜잭션 조립/서명, REST 조회를 제공한다.
//!
//! ```rust,ignore
//! use und_rust::{ChainConfig, UndClient, TxParams};
//! use und_rust::tx::Fee;
//! use und_rust::msg::Coin;
//!
//! let mut client = UndClient::new("https://rest.unification.io", ChainConfig::default())?;
//! client.set_private_key(&private_key_hex, false).await?;
//! let fee = Fee::new(vec![Coin::new("nund", "1000")], 90_000);
//! let res = client
//!     .transfer_und("und150xrwj6ca9kyzz20e4x0qj6zm0206jhe4tk7nf", 1.5, fee, TxParams::default())
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod crypto;
pub mod encoder;
pub mod errors;
pub mod ledger;
pub mod msg;
pub mod tx;
pub mod utils;

// Re-exports
pub use client::{
    Account, ApiResponse, HttpClient, KeystoreAccount, MnemonicAccount, TxFilter, TxParams,
    UndClient, WrkChainBlockHashes,
};
pub use config::ChainConfig;
pub use errors::{UndError, UndResult};
pub use ledger::{DeviceAddressResponse, DeviceSignResponse, DeviceTransport};
pub use msg::{Coin, Msg, MsgParams, MsgType};
pub use tx::{BroadcastMode, Fee, LocalKeySigner, SignedTx, StdSignature, Transaction, TxSigner};
