//! 메시지 레지스트리
//!
//! 체인이 받아들이는 메시지 타입의 닫힌 집합. 각 메시지는 amino JSON의
//! `{type, value}` 형태로 직렬화되며, value의 필드 구성은 타입별로
//! 고정이다. 표시 단위(und/fund) 수량은 여기서 기본 단위(nund)로
//! 환산된다.

use crate::config::ChainConfig;
use crate::errors::{UndError, UndResult};
use crate::utils::precise::Precise;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// 단일 코인 수량
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Coin {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// 지원하는 메시지 타입의 닫힌 집합
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgType {
    Send,
    PurchaseUnd,
    Delegate,
    Undelegate,
    BeginRedelegate,
    WithdrawDelegationReward,
    ModifyWithdrawAddress,
    RegisterBeacon,
    RecordBeaconTimestamp,
    RegisterWrkChain,
    RecordWrkChainBlock,
}

impl MsgType {
    /// amino JSON 와이어 태그
    pub fn wire_tag(&self) -> &'static str {
        match self {
            MsgType::Send => "cosmos-sdk/MsgSend",
            MsgType::PurchaseUnd => "enterprise/PurchaseUnd",
            MsgType::Delegate => "cosmos-sdk/MsgDelegate",
            MsgType::Undelegate => "cosmos-sdk/MsgUndelegate",
            MsgType::BeginRedelegate => "cosmos-sdk/MsgBeginRedelegate",
            MsgType::WithdrawDelegationReward => "cosmos-sdk/MsgWithdrawDelegationReward",
            MsgType::ModifyWithdrawAddress => "cosmos-sdk/MsgModifyWithdrawAddress",
            MsgType::RegisterBeacon => "beacon/RegisterBeacon",
            MsgType::RecordBeaconTimestamp => "beacon/RecordBeaconTimestamp",
            MsgType::RegisterWrkChain => "wrkchain/RegisterWrkChain",
            MsgType::RecordWrkChainBlock => "wrkchain/RecordWrkChainBlock",
        }
    }
}

impl FromStr for MsgType {
    type Err = UndError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MsgSend" => Ok(MsgType::Send),
            "PurchaseUnd" => Ok(MsgType::PurchaseUnd),
            "MsgDelegate" => Ok(MsgType::Delegate),
            "MsgUndelegate" => Ok(MsgType::Undelegate),
            "MsgBeginRedelegate" => Ok(MsgType::BeginRedelegate),
            "MsgWithdrawDelegationReward" => Ok(MsgType::WithdrawDelegationReward),
            "MsgModifyWithdrawAddress" => Ok(MsgType::ModifyWithdrawAddress),
            "RegisterBeacon" => Ok(MsgType::RegisterBeacon),
            "RecordBeaconTimestamp" => Ok(MsgType::RecordBeaconTimestamp),
            "RegisterWrkChain" => Ok(MsgType::RegisterWrkChain),
            "RecordWrkChainBlock" => Ok(MsgType::RecordWrkChainBlock),
            other => Err(UndError::UnsupportedMsgType {
                type_tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_tag())
    }
}

/// 메시지 빌드 파라미터
///
/// 타입별 필수 필드는 [`Msg::build`]가 검사한다. 주소/수량의 의미 검증은
/// 클라이언트 파사드에서 이미 끝난 상태로 전달된다.
#[derive(Debug, Clone, Default)]
pub struct MsgParams {
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub delegator_address: Option<String>,
    pub validator_address: Option<String>,
    pub validator_src_address: Option<String>,
    pub validator_dst_address: Option<String>,
    pub withdraw_address: Option<String>,
    pub amount: Option<String>,
    pub denom: Option<String>,
    pub moniker: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub beacon_id: Option<u64>,
    pub hash: Option<String>,
    pub submit_time: Option<u64>,
    pub genesis: Option<String>,
    pub base_type: Option<String>,
    pub wrkchain_id: Option<u64>,
    pub height: Option<u64>,
    pub block_hash: Option<String>,
    pub parent_hash: Option<String>,
    pub hash1: Option<String>,
    pub hash2: Option<String>,
    pub hash3: Option<String>,
}

/// 빌드 완료된 메시지
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Send {
        from_address: String,
        to_address: String,
        amount: Vec<Coin>,
    },
    PurchaseUnd {
        purchaser: String,
        amount: Coin,
    },
    Delegate {
        delegator_address: String,
        validator_address: String,
        amount: Coin,
    },
    Undelegate {
        delegator_address: String,
        validator_address: String,
        amount: Coin,
    },
    BeginRedelegate {
        delegator_address: String,
        validator_src_address: String,
        validator_dst_address: String,
        amount: Coin,
    },
    WithdrawDelegationReward {
        delegator_address: String,
        validator_address: String,
    },
    ModifyWithdrawAddress {
        delegator_address: String,
        withdraw_address: String,
    },
    RegisterBeacon {
        moniker: String,
        name: String,
        owner: String,
    },
    RecordBeaconTimestamp {
        beacon_id: u64,
        hash: String,
        submit_time: u64,
        owner: String,
    },
    RegisterWrkChain {
        moniker: String,
        name: String,
        genesis: String,
        base_type: String,
        owner: String,
    },
    RecordWrkChainBlock {
        wrkchain_id: u64,
        height: u64,
        block_hash: String,
        parent_hash: String,
        hash1: String,
        hash2: String,
        hash3: String,
        owner: String,
    },
}

fn require(field: Option<String>, name: &str) -> UndResult<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(UndError::InvalidInput {
            message: format!("{name} should not be empty"),
        }),
    }
}

fn require_u64(field: Option<u64>, name: &str) -> UndResult<u64> {
    field.ok_or_else(|| UndError::InvalidInput {
        message: format!("{name} should not be empty"),
    })
}

/// 수량을 기본 단위 코인으로 정규화
///
/// 표시 단위(und/fund)는 10^9를 곱해 nund로 환산한다. 환산 결과가
/// 정수가 아니면 기본 단위보다 작은 단수가 있다는 뜻이므로 거부한다.
pub fn normalize_coin(amount: &str, denom: &str, config: &ChainConfig) -> UndResult<Coin> {
    let parsed = Precise::from_string(amount)?;
    if config.is_display_denom(denom) {
        let factor = Precise::from_string(&config.base_factor().to_string())?;
        let scaled = parsed.mul(&factor);
        if !scaled.is_integer() {
            return Err(UndError::InvalidInput {
                message: format!(
                    "amount {amount}{denom} is not a whole number of {}",
                    config.base_denom()
                ),
            });
        }
        Ok(Coin::new(config.base_denom(), scaled.to_str_repr()))
    } else {
        Ok(Coin::new(denom, parsed.to_str_repr()))
    }
}

impl Msg {
    /// 파라미터로부터 메시지 빌드, 필수 필드 누락 시 에러
    pub fn build(msg_type: MsgType, params: MsgParams, config: &ChainConfig) -> UndResult<Msg> {
        let coin = |params: &MsgParams| -> UndResult<Coin> {
            let amount = params.amount.clone().ok_or_else(|| UndError::InvalidInput {
                message: "amount should not be empty".to_string(),
            })?;
            let denom = params
                .denom
                .clone()
                .unwrap_or_else(|| config.base_denom().to_string());
            normalize_coin(&amount, &denom, config)
        };

        match msg_type {
            MsgType::Send => Ok(Msg::Send {
                amount: vec![coin(&params)?],
                from_address: require(params.from_address, "from_address")?,
                to_address: require(params.to_address, "to_address")?,
            }),
            MsgType::PurchaseUnd => Ok(Msg::PurchaseUnd {
                amount: coin(&params)?,
                purchaser: require(params.from_address, "from_address")?,
            }),
            MsgType::Delegate => Ok(Msg::Delegate {
                amount: coin(&params)?,
                delegator_address: require(params.delegator_address, "delegator_address")?,
                validator_address: require(params.validator_address, "validator_address")?,
            }),
            MsgType::Undelegate => Ok(Msg::Undelegate {
                amount: coin(&params)?,
                delegator_address: require(params.delegator_address, "delegator_address")?,
                validator_address: require(params.validator_address, "validator_address")?,
            }),
            MsgType::BeginRedelegate => Ok(Msg::BeginRedelegate {
                amount: coin(&params)?,
                delegator_address: require(params.delegator_address, "delegator_address")?,
                validator_src_address: require(
                    params.validator_src_address,
                    "validator_src_address",
                )?,
                validator_dst_address: require(
                    params.validator_dst_address,
                    "validator_dst_address",
                )?,
            }),
            MsgType::WithdrawDelegationReward => Ok(Msg::WithdrawDelegationReward {
                delegator_address: require(params.delegator_address, "delegator_address")?,
                validator_address: require(params.validator_address, "validator_address")?,
            }),
            MsgType::ModifyWithdrawAddress => Ok(Msg::ModifyWithdrawAddress {
                delegator_address: require(params.delegator_address, "delegator_address")?,
                withdraw_address: require(params.withdraw_address, "withdraw_address")?,
            }),
            MsgType::RegisterBeacon => Ok(Msg::RegisterBeacon {
                moniker: require(params.moniker, "moniker")?,
                name: require(params.name, "name")?,
                owner: require(params.owner, "owner")?,
            }),
            MsgType::RecordBeaconTimestamp => Ok(Msg::RecordBeaconTimestamp {
                beacon_id: require_u64(params.beacon_id, "beacon_id")?,
                hash: require(params.hash, "hash")?,
                submit_time: require_u64(params.submit_time, "submit_time")?,
                owner: require(params.owner, "owner")?,
            }),
            MsgType::RegisterWrkChain => Ok(Msg::RegisterWrkChain {
                moniker: require(params.moniker, "moniker")?,
                name: require(params.name, "name")?,
                genesis: require(params.genesis, "genesis")?,
                base_type: require(params.base_type, "base_type")?,
                owner: require(params.owner, "owner")?,
            }),
            MsgType::RecordWrkChainBlock => Ok(Msg::RecordWrkChainBlock {
                wrkchain_id: require_u64(params.wrkchain_id, "wrkchain_id")?,
                height: require_u64(params.height, "height")?,
                block_hash: require(params.block_hash, "block_hash")?,
                parent_hash: params.parent_hash.unwrap_or_default(),
                hash1: params.hash1.unwrap_or_default(),
                hash2: params.hash2.unwrap_or_default(),
                hash3: params.hash3.unwrap_or_default(),
                owner: require(params.owner, "owner")?,
            }),
        }
    }

    /// 메시지의 와이어 타입 태그
    pub fn msg_type(&self) -> MsgType {
        match self {
            Msg::Send { .. } => MsgType::Send,
            Msg::PurchaseUnd { .. } => MsgType::PurchaseUnd,
            Msg::Delegate { .. } => MsgType::Delegate,
            Msg::Undelegate { .. } => MsgType::Undelegate,
            Msg::BeginRedelegate { .. } => MsgType::BeginRedelegate,
            Msg::WithdrawDelegationReward { .. } => MsgType::WithdrawDelegationReward,
            Msg::ModifyWithdrawAddress { .. } => MsgType::ModifyWithdrawAddress,
            Msg::RegisterBeacon { .. } => MsgType::RegisterBeacon,
            Msg::RecordBeaconTimestamp { .. } => MsgType::RecordBeaconTimestamp,
            Msg::RegisterWrkChain { .. } => MsgType::RegisterWrkChain,
            Msg::RecordWrkChainBlock { .. } => MsgType::RecordWrkChainBlock,
        }
    }

    /// amino JSON `{type, value}` 표현
    ///
    /// 숫자 필드는 합의 계층 규약대로 십진 문자열로 직렬화한다.
    pub fn to_json(&self) -> Value {
        let (tag, value) = match self {
            Msg::Send {
                from_address,
                to_address,
                amount,
            } => (
                MsgType::Send,
                json!({
                    "from_address": from_address,
                    "to_address": to_address,
                    "amount": amount,
                }),
            ),
            Msg::PurchaseUnd { purchaser, amount } => (
                MsgType::PurchaseUnd,
                json!({
                    "purchaser": purchaser,
                    "amount": amount,
                }),
            ),
            Msg::Delegate {
                delegator_address,
                validator_address,
                amount,
            } => (
                MsgType::Delegate,
                json!({
                    "delegator_address": delegator_address,
                    "validator_address": validator_address,
                    "amount": amount,
                }),
            ),
            Msg::Undelegate {
                delegator_address,
                validator_address,
                amount,
            } => (
                MsgType::Undelegate,
                json!({
                    "delegator_address": delegator_address,
                    "validator_address": validator_address,
                    "amount": amount,
                }),
            ),
            Msg::BeginRedelegate {
                delegator_address,
                validator_src_address,
                validator_dst_address,
                amount,
            } => (
                MsgType::BeginRedelegate,
                json!({
                    "delegator_address": delegator_address,
                    "validator_src_address": validator_src_address,
                    "validator_dst_address": validator_dst_address,
                    "amount": amount,
                }),
            ),
            Msg::WithdrawDelegationReward {
                delegator_address,
                validator_address,
            } => (
                MsgType::WithdrawDelegationReward,
                json!({
                    "delegator_address": delegator_address,
                    "validator_address": validator_address,
                }),
            ),
            Msg::ModifyWithdrawAddress {
                delegator_address,
                withdraw_address,
            } => (
                MsgType::ModifyWithdrawAddress,
                json!({
                    "delegator_address": delegator_address,
                    "withdraw_address": withdraw_address,
                }),
            ),
            Msg::RegisterBeacon {
                moniker,
                name,
                owner,
            } => (
                MsgType::RegisterBeacon,
                json!({
                    "moniker": moniker,
                    "name": name,
                    "owner": owner,
                }),
            ),
            Msg::RecordBeaconTimestamp {
                beacon_id,
                hash,
                submit_time,
                owner,
            } => (
                MsgType::RecordBeaconTimestamp,
                json!({
                    "beacon_id": beacon_id.to_string(),
                    "hash": hash,
                    "submit_time": submit_time.to_string(),
                    "owner": owner,
                }),
            ),
            Msg::RegisterWrkChain {
                moniker,
                name,
                genesis,
                base_type,
                owner,
            } => (
                MsgType::RegisterWrkChain,
                json!({
                    "moniker": moniker,
                    "name": name,
                    "genesis": genesis,
                    "type": base_type,
                    "owner": owner,
                }),
            ),
            Msg::RecordWrkChainBlock {
                wrkchain_id,
                height,
                block_hash,
                parent_hash,
                hash1,
                hash2,
                hash3,
                owner,
            } => (
                MsgType::RecordWrkChainBlock,
                json!({
                    "wrkchain_id": wrkchain_id.to_string(),
                    "height": height.to_string(),
                    "blockhash": block_hash,
                    "parenthash": parent_hash,
                    "hash1": hash1,
                    "hash2": hash2,
                    "hash3": hash3,
                    "owner": owner,
                }),
            ),
        };

        json!({
            "type": tag.wire_tag(),
            "value": value,
        })
    }
}

impl Serialize for Msg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChainConfig {
        ChainConfig::default()
    }

    const FROM: &str = "und1x8pl6wzqf9atkm77ymc5vn5dnpl5xytmn200xy";
    const TO: &str = "und150xrwj6ca9kyzz20e4x0qj6zm0206jhe4tk7nf";

    #[test]
    fn test_unsupported_type_rejected() {
        let err = "Unsupported".parse::<MsgType>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported message type: Unsupported");
    }

    #[test]
    fn test_all_wire_tags() {
        let cases = [
            ("MsgSend", "cosmos-sdk/MsgSend"),
            ("PurchaseUnd", "enterprise/PurchaseUnd"),
            ("MsgDelegate", "cosmos-sdk/MsgDelegate"),
            ("MsgUndelegate", "cosmos-sdk/MsgUndelegate"),
            ("MsgBeginRedelegate", "cosmos-sdk/MsgBeginRedelegate"),
            (
                "MsgWithdrawDelegationReward",
                "cosmos-sdk/MsgWithdrawDelegationReward",
            ),
            (
                "MsgModifyWithdrawAddress",
                "cosmos-sdk/MsgModifyWithdrawAddress",
            ),
            ("RegisterBeacon", "beacon/RegisterBeacon"),
            ("RecordBeaconTimestamp", "beacon/RecordBeaconTimestamp"),
            ("RegisterWrkChain", "wrkchain/RegisterWrkChain"),
            ("RecordWrkChainBlock", "wrkchain/RecordWrkChainBlock"),
        ];
        for (name, tag) in cases {
            let parsed: MsgType = name.parse().unwrap();
            assert_eq!(parsed.wire_tag(), tag);
        }
    }

    #[test]
    fn test_send_msg_display_denom_scaled() {
        let msg = Msg::build(
            MsgType::Send,
            MsgParams {
                from_address: Some(FROM.to_string()),
                to_address: Some(TO.to_string()),
                amount: Some("2.123".to_string()),
                denom: Some("und".to_string()),
                ..Default::default()
            },
            &config(),
        )
        .unwrap();

        let json = msg.to_json();
        assert_eq!(json["type"], "cosmos-sdk/MsgSend");
        assert_eq!(json["value"]["amount"][0]["denom"], "nund");
        assert_eq!(json["value"]["amount"][0]["amount"], "2123000000");
    }

    #[test]
    fn test_fund_alias_scaled() {
        let msg = Msg::build(
            MsgType::Send,
            MsgParams {
                from_address: Some(FROM.to_string()),
                to_address: Some(TO.to_string()),
                amount: Some("1".to_string()),
                denom: Some("fund".to_string()),
                ..Default::default()
            },
            &config(),
        )
        .unwrap();
        assert_eq!(msg.to_json()["value"]["amount"][0]["amount"], "1000000000");
    }

    #[test]
    fn test_base_denom_passthrough() {
        let coin = normalize_coin("2001770112", "nund", &config()).unwrap();
        assert_eq!(coin, Coin::new("nund", "2001770112"));
    }

    #[test]
    fn test_sub_base_fraction_rejected() {
        let err = normalize_coin("2.0000000001", "und", &config()).unwrap_err();
        assert!(err.to_string().contains("not a whole number of nund"));
    }

    #[test]
    fn test_missing_field_named_in_error() {
        let err = Msg::build(
            MsgType::Send,
            MsgParams {
                from_address: Some(FROM.to_string()),
                amount: Some("1".to_string()),
                ..Default::default()
            },
            &config(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: to_address should not be empty");
    }

    #[test]
    fn test_beacon_timestamp_numbers_as_strings() {
        let msg = Msg::build(
            MsgType::RecordBeaconTimestamp,
            MsgParams {
                beacon_id: Some(1),
                hash: Some("d04b98f48e8f8bcc15c6ae5ac050801cd6dcfd428fb5f9e65c4e16e7807340fa".to_string()),
                submit_time: Some(1_234_567_890),
                owner: Some(FROM.to_string()),
                ..Default::default()
            },
            &config(),
        )
        .unwrap();
        let value = &msg.to_json()["value"];
        assert_eq!(value["beacon_id"], "1");
        assert_eq!(value["submit_time"], "1234567890");
    }

    #[test]
    fn test_wrkchain_block_fields() {
        let msg = Msg::build(
            MsgType::RecordWrkChainBlock,
            MsgParams {
                wrkchain_id: Some(2),
                height: Some(123),
                block_hash: Some("blockhash".to_string()),
                owner: Some(FROM.to_string()),
                ..Default::default()
            },
            &config(),
        )
        .unwrap();
        let value = &msg.to_json()["value"];
        assert_eq!(value["wrkchain_id"], "2");
        assert_eq!(value["height"], "123");
        assert_eq!(value["blockhash"], "blockhash");
        // 채워지지 않은 해시 필드는 빈 문자열로 직렬화
        assert_eq!(value["parenthash"], "");
        assert_eq!(value["hash3"], "");
    }

    #[test]
    fn test_register_wrkchain_type_key() {
        let msg = Msg::build(
            MsgType::RegisterWrkChain,
            MsgParams {
                moniker: Some("wrkchain1".to_string()),
                name: Some("WRKChain Example".to_string()),
                genesis: Some("genesishash".to_string()),
                base_type: Some("geth".to_string()),
                owner: Some(FROM.to_string()),
                ..Default::default()
            },
            &config(),
        )
        .unwrap();
        assert_eq!(msg.to_json()["value"]["type"], "geth");
    }
}
