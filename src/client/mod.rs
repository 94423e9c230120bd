//! UND Mainchain 클라이언트 파사드
//!
//! 쓰기 경로(트랜잭션)는 입력 검증 실패 시 `Err`를 돌려주고, 읽기
//! 경로(조회)는 항상 [`ApiResponse`]를 돌려주는 전함수다. 조회의 전송
//! 실패는 status 0의 에러 형태 응답으로 정규화된다.

mod http;

pub use http::{ApiResponse, HttpClient};

use crate::config::{api, ChainConfig};
use crate::crypto::{self, keystore::Keystore};
use crate::errors::{UndError, UndResult};
use crate::ledger::DeviceTransport;
use crate::msg::{Msg, MsgParams, MsgType};
use crate::tx::{
    BroadcastMode, DeviceSigner, Fee, LocalKeySigner, SignedTx, Transaction, TxOptions, TxSigner,
};
use crate::utils::validate::{check_coins, check_number, json_u64};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// 새로 만든 계정
#[derive(Debug, Clone)]
pub struct Account {
    pub private_key: String,
    pub address: String,
}

/// 키스토어와 함께 만든 계정
#[derive(Debug, Clone)]
pub struct KeystoreAccount {
    pub private_key: String,
    pub address: String,
    pub keystore: Keystore,
}

/// 니모닉과 함께 만든 계정
#[derive(Debug, Clone)]
pub struct MnemonicAccount {
    pub private_key: String,
    pub address: String,
    pub mnemonic: String,
}

/// 트랜잭션 조회 필터 (`key=val` 쿼리 파라미터로 직렬화)
#[derive(Debug, Clone)]
pub struct TxFilter {
    pub key: String,
    pub val: String,
}

impl TxFilter {
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        TxFilter {
            key: key.into(),
            val: val.into(),
        }
    }
}

/// 쓰기 연산 공통 옵션
#[derive(Debug, Clone, Default)]
pub struct TxParams {
    /// 발신 주소. 생략하면 세션 주소 사용.
    pub from_address: Option<String>,
    /// 메모. 기본 빈 문자열.
    pub memo: Option<String>,
    /// 시퀀스. 생략하면 체인에서 조회.
    pub sequence: Option<u64>,
    /// denom. 기본은 체인 기본 단위.
    pub denom: Option<String>,
}

/// WRKChain 블록 해시 묶음 (빈 값은 빈 문자열로 제출)
#[derive(Debug, Clone, Default)]
pub struct WrkChainBlockHashes {
    pub parent_hash: Option<String>,
    pub hash1: Option<String>,
    pub hash2: Option<String>,
    pub hash3: Option<String>,
}

/// UND Mainchain 클라이언트
pub struct UndClient {
    http: HttpClient,
    config: ChainConfig,
    chain_id: Option<String>,
    address: Option<String>,
    account_number: Option<u64>,
    broadcast_mode: BroadcastMode,
    signer: Option<Arc<dyn TxSigner>>,
}

// 서명 델리게이트는 키 재료를 품고 있으므로 Debug에서 제외
impl fmt::Debug for UndClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndClient")
            .field("base_url", &self.http.base_url())
            .field("chain_id", &self.chain_id)
            .field("address", &self.address)
            .field("account_number", &self.account_number)
            .field("broadcast_mode", &self.broadcast_mode)
            .field("signer", &self.signer.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl UndClient {
    /// 새 클라이언트 생성
    pub fn new(server: impl Into<String>, config: ChainConfig) -> UndResult<Self> {
        let server = server.into();
        if server.is_empty() {
            return Err(UndError::InvalidInput {
                message: "server url should not be empty".to_string(),
            });
        }
        let http = HttpClient::new(server, config.timeout_ms())?;
        Ok(UndClient {
            http,
            config,
            chain_id: None,
            address: None,
            account_number: None,
            broadcast_mode: BroadcastMode::default(),
            signer: None,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// 세션 주소 (키 또는 장치 설정 후)
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }

    pub fn broadcast_mode(&self) -> BroadcastMode {
        self.broadcast_mode
    }

    /// 브로드캐스트 모드 설정 ("sync" | "async" | "block")
    pub fn set_broadcast_mode(&mut self, mode: &str) -> UndResult<&mut Self> {
        self.broadcast_mode = BroadcastMode::from_str(mode)?;
        Ok(self)
    }

    /// 체인 ID 초기화. 이미 알고 있으면 그대로 둔다.
    pub async fn init_chain(&mut self) -> UndResult<&mut Self> {
        if self.chain_id.is_none() {
            let response = self.http.get(api::NODE_INFO).await?;
            let network = response.result["result"]["node_info"]["network"]
                .as_str()
                .or_else(|| response.result["node_info"]["network"].as_str())
                .map(|s| s.to_string())
                .ok_or_else(|| UndError::BadResponse {
                    message: "node_info response missing network id".to_string(),
                })?;
            self.chain_id = Some(network);
        }
        Ok(self)
    }

    /// 체인 ID 직접 지정 (오프라인 서명용)
    pub fn set_chain_id(&mut self, chain_id: impl Into<String>) -> &mut Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    /// 계정 번호 직접 지정 (localOnly 키 설정과 함께 사용)
    pub fn set_account_number(&mut self, account_number: u64) -> &mut Self {
        self.account_number = Some(account_number);
        self
    }

    /// 세션 개인키 설정, 로컬 키 서명 델리게이트 장착
    ///
    /// `local_only`가 false면 계정 번호를 체인에서 즉시 조회한다.
    pub async fn set_private_key(
        &mut self,
        private_key_hex: &str,
        local_only: bool,
    ) -> UndResult<&mut Self> {
        let private_key = crypto::keys::parse_private_key(private_key_hex)?;
        let address =
            crypto::address::private_key_to_address(&private_key, self.config.bech32_prefix())?;

        if self.address.as_deref() == Some(address.as_str()) {
            return Ok(self);
        }

        self.signer = Some(Arc::new(LocalKeySigner::new(private_key)?));
        self.address = Some(address.clone());
        self.account_number = None;

        if !local_only {
            let (_, account_number) = self.fetch_account(&address).await?;
            self.account_number = Some(account_number);
        }
        Ok(self)
    }

    /// 하드웨어 장치를 서명 델리게이트로 장착
    ///
    /// 장치에서 주소를 조회해 세션 주소로 삼고 계정 번호를 가져온다.
    pub async fn use_ledger_signer(
        &mut self,
        transport: Arc<dyn DeviceTransport>,
        account: u32,
    ) -> UndResult<&mut Self> {
        let signer = DeviceSigner::new(
            transport,
            self.config.device_path(account),
            self.config.bech32_prefix(),
        );
        let (address, _) = signer.get_address().await?;

        let (_, account_number) = self.fetch_account(&address).await?;
        self.address = Some(address);
        self.account_number = Some(account_number);
        self.signer = Some(Arc::new(signer));
        Ok(self)
    }

    /// 사용자 정의 서명 델리게이트 장착
    ///
    /// 세션 주소는 바뀌지 않으므로 외부 키로 서명하려면
    /// `set_account_number`와 함께 사용한다.
    pub fn set_signing_delegate(&mut self, signer: Arc<dyn TxSigner>) -> &mut Self {
        self.signer = Some(signer);
        self
    }

    /// 세션 키의 주소 반환
    pub fn get_client_key_address(&self) -> UndResult<&str> {
        self.address.as_deref().ok_or(UndError::SignerNotSet)
    }

    // ========================================================================
    // 쓰기 연산
    // ========================================================================

    /// FUND 전송
    pub async fn transfer_und(
        &mut self,
        to_address: &str,
        amount: f64,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let from = self.resolve_from(&params)?;
        self.require_account_address(to_address, "to_address")?;
        self.require_account_address(&from, "from_address")?;
        check_number(amount, "amount")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::Send,
            MsgParams {
                from_address: Some(from.clone()),
                to_address: Some(to_address.to_string()),
                amount: Some(amount.to_string()),
                denom: params.denom.clone(),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &from, fee, params).await
    }

    /// 엔터프라이즈 FUND 구매 주문 제출
    pub async fn raise_enterprise_po(
        &mut self,
        amount: f64,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let from = self.resolve_from(&params)?;
        self.require_account_address(&from, "from_address")?;
        check_number(amount, "amount")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::PurchaseUnd,
            MsgParams {
                from_address: Some(from.clone()),
                amount: Some(amount.to_string()),
                denom: params.denom.clone(),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &from, fee, params).await
    }

    /// 밸리데이터에게 위임
    pub async fn delegate(
        &mut self,
        validator: &str,
        amount: f64,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let delegator = self.resolve_from(&params)?;
        self.require_account_address(&delegator, "delegator")?;
        self.require_validator_address(validator, "validator")?;
        check_number(amount, "amount")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::Delegate,
            MsgParams {
                delegator_address: Some(delegator.clone()),
                validator_address: Some(validator.to_string()),
                amount: Some(amount.to_string()),
                denom: params.denom.clone(),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &delegator, fee, params).await
    }

    /// 위임 해제
    pub async fn undelegate(
        &mut self,
        validator: &str,
        amount: f64,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let delegator = self.resolve_from(&params)?;
        self.require_account_address(&delegator, "delegator")?;
        self.require_validator_address(validator, "validator")?;
        check_number(amount, "amount")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::Undelegate,
            MsgParams {
                delegator_address: Some(delegator.clone()),
                validator_address: Some(validator.to_string()),
                amount: Some(amount.to_string()),
                denom: params.denom.clone(),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &delegator, fee, params).await
    }

    /// 위임 이전 (재위임)
    pub async fn redelegate(
        &mut self,
        validator_from: &str,
        validator_to: &str,
        amount: f64,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let delegator = self.resolve_from(&params)?;
        self.require_account_address(&delegator, "delegator")?;
        self.require_validator_address(validator_from, "validator_from")?;
        self.require_validator_address(validator_to, "validator_to")?;
        check_number(amount, "amount")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::BeginRedelegate,
            MsgParams {
                delegator_address: Some(delegator.clone()),
                validator_src_address: Some(validator_from.to_string()),
                validator_dst_address: Some(validator_to.to_string()),
                amount: Some(amount.to_string()),
                denom: params.denom.clone(),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &delegator, fee, params).await
    }

    /// 위임 보상 출금
    pub async fn withdraw_delegation_reward(
        &mut self,
        validator: &str,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let delegator = self.resolve_from(&params)?;
        self.require_account_address(&delegator, "delegator")?;
        self.require_validator_address(validator, "validator")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::WithdrawDelegationReward,
            MsgParams {
                delegator_address: Some(delegator.clone()),
                validator_address: Some(validator.to_string()),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &delegator, fee, params).await
    }

    /// 보상 출금 주소 변경
    pub async fn modify_withdraw_address(
        &mut self,
        withdraw_address: &str,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let delegator = self.resolve_from(&params)?;
        self.require_account_address(&delegator, "delegator")?;
        self.require_account_address(withdraw_address, "withdraw_address")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::ModifyWithdrawAddress,
            MsgParams {
                delegator_address: Some(delegator.clone()),
                withdraw_address: Some(withdraw_address.to_string()),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &delegator, fee, params).await
    }

    /// BEACON 등록
    pub async fn register_beacon(
        &mut self,
        moniker: &str,
        name: &str,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let owner = self.resolve_from(&params)?;
        self.require_account_address(&owner, "owner")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::RegisterBeacon,
            MsgParams {
                moniker: Some(moniker.to_string()),
                name: Some(name.to_string()),
                owner: Some(owner.clone()),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &owner, fee, params).await
    }

    /// BEACON 타임스탬프 기록
    pub async fn record_beacon_timestamp(
        &mut self,
        beacon_id: u64,
        hash: &str,
        submit_time: u64,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let owner = self.resolve_from(&params)?;
        self.require_account_address(&owner, "owner")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::RecordBeaconTimestamp,
            MsgParams {
                beacon_id: Some(beacon_id),
                hash: Some(hash.to_string()),
                submit_time: Some(submit_time),
                owner: Some(owner.clone()),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &owner, fee, params).await
    }

    /// WRKChain 등록
    pub async fn register_wrkchain(
        &mut self,
        moniker: &str,
        name: &str,
        genesis: &str,
        base_type: &str,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let owner = self.resolve_from(&params)?;
        self.require_account_address(&owner, "owner")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::RegisterWrkChain,
            MsgParams {
                moniker: Some(moniker.to_string()),
                name: Some(name.to_string()),
                genesis: Some(genesis.to_string()),
                base_type: Some(base_type.to_string()),
                owner: Some(owner.clone()),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &owner, fee, params).await
    }

    /// WRKChain 블록 헤더 해시 기록
    pub async fn record_wrkchain_block(
        &mut self,
        wrkchain_id: u64,
        height: u64,
        block_hash: &str,
        hashes: WrkChainBlockHashes,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let owner = self.resolve_from(&params)?;
        self.require_account_address(&owner, "owner")?;
        check_coins(&fee.amount)?;

        let msg = Msg::build(
            MsgType::RecordWrkChainBlock,
            MsgParams {
                wrkchain_id: Some(wrkchain_id),
                height: Some(height),
                block_hash: Some(block_hash.to_string()),
                parent_hash: hashes.parent_hash,
                hash1: hashes.hash1,
                hash2: hashes.hash2,
                hash3: hashes.hash3,
                owner: Some(owner.clone()),
                ..Default::default()
            },
            &self.config,
        )?;
        self.send_msg(msg, &owner, fee, params).await
    }

    /// 서명 완료된 트랜잭션 브로드캐스트
    pub async fn send_raw_transaction(&self, signed_tx: &SignedTx) -> UndResult<ApiResponse> {
        let body = serde_json::to_value(signed_tx)?;
        match self.http.post_json(api::BROADCAST_TX, &body).await {
            Ok(response) => Ok(response),
            Err(err) => {
                warn!(error = %err, "send_raw_transaction transport failure");
                Ok(ApiResponse::error(0, format!("send_raw_transaction error: {err}")))
            }
        }
    }

    /// 메시지를 서명된 envelope로 조립 (브로드캐스트는 하지 않음)
    pub async fn prepare_tx(
        &mut self,
        msg: Msg,
        address: &str,
        fee: Fee,
        sequence: Option<u64>,
        memo: &str,
    ) -> UndResult<SignedTx> {
        self.init_chain().await?;
        let chain_id = self.chain_id.clone().ok_or_else(|| UndError::BadResponse {
            message: "chain id unavailable".to_string(),
        })?;

        let (sequence, account_number) = match (sequence, self.account_number) {
            (Some(sequence), Some(account_number)) => (sequence, account_number),
            _ => {
                let (fetched_sequence, fetched_account) = self.fetch_account(address).await?;
                self.account_number = Some(fetched_account);
                (sequence.unwrap_or(fetched_sequence), fetched_account)
            }
        };

        let signer = self.signer.clone().ok_or(UndError::SignerNotSet)?;

        let mut tx = Transaction::new(TxOptions {
            account_number,
            chain_id,
            memo: memo.to_string(),
            msg,
            sequence,
            fee,
        })?;
        tx.sign(signer.as_ref()).await?;
        tx.to_signed_tx(self.broadcast_mode)
    }

    // ========================================================================
    // 조회 연산 — 전함수, 항상 ApiResponse
    // ========================================================================

    /// 계정 정보 조회
    pub async fn get_account(&self, address: Option<&str>) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(400, "get_account error: address should not be empty");
        };
        self.query(&format!("{}/{}", api::QUERY_ACCOUNT, address), "get_account")
            .await
    }

    /// 잔액 조회. result는 계정의 코인 목록.
    pub async fn get_balance(&self, address: Option<&str>) -> ApiResponse {
        let response = self.get_account(address).await;
        if !response.is_success() {
            return response;
        }
        let coins = response.result["result"]["account"]["value"]["coins"].clone();
        match coins {
            serde_json::Value::Array(_) => ApiResponse {
                status: response.status,
                result: coins,
            },
            _ => ApiResponse::error(response.status, "get_balance error: account has no coins"),
        }
    }

    /// 엔터프라이즈 잠금 FUND 조회
    pub async fn get_enterprise_locked(&self, address: Option<&str>) -> ApiResponse {
        let response = self.get_account(address).await;
        if !response.is_success() {
            return response;
        }
        let locked = response.result["result"]["enterprise"]["locked"].clone();
        if locked.is_null() {
            ApiResponse {
                status: response.status,
                result: serde_json::json!([]),
            }
        } else {
            ApiResponse {
                status: response.status,
                result: locked,
            }
        }
    }

    /// 계정이 보낸 트랜잭션 목록
    pub async fn get_transactions(&self, address: Option<&str>, page: u32, limit: u32) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(400, "get_transactions error: address should not be empty");
        };
        self.query(
            &format!(
                "{}?message.sender={}&page={}&limit={}",
                api::QUERY_TXS, address, page, limit
            ),
            "get_transactions",
        )
        .await
    }

    /// 계정이 받은 FUND 전송 목록
    pub async fn get_transactions_received(
        &self,
        address: Option<&str>,
        page: u32,
        limit: u32,
    ) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(
                400,
                "get_transactions_received error: address should not be empty",
            );
        };
        self.query(
            &format!(
                "{}?transfer.recipient={}&page={}&limit={}",
                api::QUERY_TXS, address, page, limit
            ),
            "get_transactions_received",
        )
        .await
    }

    /// 임의 필터로 트랜잭션 조회. 필터가 없으면 400 에러 응답.
    pub async fn get_filtered_transactions(&self, filters: &[TxFilter]) -> ApiResponse {
        if filters.is_empty() {
            return ApiResponse::error(
                400,
                "get_filtered_transactions error: must include at least one filter",
            );
        }
        let query: Vec<String> = filters
            .iter()
            .map(|f| format!("{}={}", f.key, f.val))
            .collect();
        self.query(
            &format!("{}?{}", api::QUERY_TXS, query.join("&")),
            "get_filtered_transactions",
        )
        .await
    }

    /// 해시로 트랜잭션 조회
    pub async fn get_tx(&self, hash: &str) -> ApiResponse {
        if hash.is_empty() {
            return ApiResponse::error(400, "get_tx error: hash should not be empty");
        }
        self.query(&format!("{}/{}", api::QUERY_TX, hash), "get_tx").await
    }

    /// 엔터프라이즈 구매 주문 조회
    pub async fn get_enterprise_pos(&self, address: Option<&str>, page: u32, limit: u32) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(400, "get_enterprise_pos error: address should not be empty");
        };
        self.query(
            &format!(
                "{}?purchaser={}&page={}&limit={}",
                api::QUERY_ENTERPRISE_POS, address, page, limit
            ),
            "get_enterprise_pos",
        )
        .await
    }

    /// 위임 목록 조회 (선택적으로 특정 밸리데이터)
    pub async fn get_delegations(&self, address: Option<&str>, val_address: Option<&str>) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(400, "get_delegations error: address should not be empty");
        };
        let path = match val_address {
            Some(val) if !val.is_empty() => {
                format!("{}/{}/delegations/{}", api::STAKING_DELEGATORS, address, val)
            }
            _ => format!("{}/{}/delegations", api::STAKING_DELEGATORS, address),
        };
        self.query(&path, "get_delegations").await
    }

    /// 위임 해제 중인 수량 조회
    pub async fn get_unbonding_delegations(
        &self,
        address: Option<&str>,
        val_address: Option<&str>,
    ) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(
                400,
                "get_unbonding_delegations error: address should not be empty",
            );
        };
        let path = match val_address {
            Some(val) if !val.is_empty() => format!(
                "{}/{}/unbonding_delegations/{}",
                api::STAKING_DELEGATORS, address, val
            ),
            _ => format!("{}/{}/unbonding_delegations", api::STAKING_DELEGATORS, address),
        };
        self.query(&path, "get_unbonding_delegations").await
    }

    /// 위임 중인 밸리데이터 조회
    pub async fn get_bonded_validators(
        &self,
        address: Option<&str>,
        val_address: Option<&str>,
    ) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(
                400,
                "get_bonded_validators error: address should not be empty",
            );
        };
        let path = match val_address {
            Some(val) if !val.is_empty() => {
                format!("{}/{}/validators/{}", api::STAKING_DELEGATORS, address, val)
            }
            _ => format!("{}/{}/validators", api::STAKING_DELEGATORS, address),
        };
        self.query(&path, "get_bonded_validators").await
    }

    /// 위임 보상 조회
    pub async fn get_delegator_rewards(
        &self,
        address: Option<&str>,
        val_address: Option<&str>,
    ) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(
                400,
                "get_delegator_rewards error: address should not be empty",
            );
        };
        let path = match val_address {
            Some(val) if !val.is_empty() => {
                format!("{}/{}/rewards/{}", api::DISTRIBUTION_DELEGATORS, address, val)
            }
            _ => format!("{}/{}/rewards", api::DISTRIBUTION_DELEGATORS, address),
        };
        self.query(&path, "get_delegator_rewards").await
    }

    /// 현재 보상 출금 주소 조회
    pub async fn get_delegator_withdraw_address(&self, address: Option<&str>) -> ApiResponse {
        let Some(address) = self.query_address(address) else {
            return ApiResponse::error(
                400,
                "get_delegator_withdraw_address error: address should not be empty",
            );
        };
        self.query(
            &format!("{}/{}/withdraw_address", api::DISTRIBUTION_DELEGATORS, address),
            "get_delegator_withdraw_address",
        )
        .await
    }

    /// 밸리데이터 목록 조회. 모르는 status는 bonded로 정규화.
    pub async fn get_validators(
        &self,
        status: &str,
        page: u32,
        limit: u32,
        val_address: Option<&str>,
    ) -> ApiResponse {
        let status = match status {
            "bonded" | "unbonded" | "unbonding" => status,
            _ => "bonded",
        };
        let path = match val_address {
            Some(val) if !val.is_empty() => format!("{}/{}", api::STAKING_VALIDATORS, val),
            _ => format!(
                "{}?status={}&page={}&limit={}",
                api::STAKING_VALIDATORS, status, page, limit
            ),
        };
        self.query(&path, "get_validators").await
    }

    /// 밸리데이터의 위임 목록
    pub async fn get_validator_delegations(&self, val_address: &str) -> ApiResponse {
        self.query(
            &format!("{}/{}/delegations", api::STAKING_VALIDATORS, val_address),
            "get_validator_delegations",
        )
        .await
    }

    /// 밸리데이터의 위임 해제 목록
    pub async fn get_validator_unbonding_delegations(&self, val_address: &str) -> ApiResponse {
        self.query(
            &format!(
                "{}/{}/unbonding_delegations",
                api::STAKING_VALIDATORS, val_address
            ),
            "get_validator_unbonding_delegations",
        )
        .await
    }

    /// 재위임 조회 (필터 선택)
    pub async fn get_redelegations(
        &self,
        delegator: Option<&str>,
        val_src: Option<&str>,
        val_dst: Option<&str>,
    ) -> ApiResponse {
        self.query(
            &format!(
                "{}?delegator={}&validator_from={}&validator_to={}",
                api::STAKING_REDELEGATIONS,
                delegator.unwrap_or(""),
                val_src.unwrap_or(""),
                val_dst.unwrap_or("")
            ),
            "get_redelegations",
        )
        .await
    }

    /// 밸리데이터 분배 정보
    pub async fn get_validator_distribution_info(&self, val_address: &str) -> ApiResponse {
        self.query(
            &format!("{}/{}", api::DISTRIBUTION_VALIDATORS, val_address),
            "get_validator_distribution_info",
        )
        .await
    }

    /// 밸리데이터 미지급 보상
    pub async fn get_validator_outstanding_rewards(&self, val_address: &str) -> ApiResponse {
        self.query(
            &format!(
                "{}/{}/outstanding_rewards",
                api::DISTRIBUTION_VALIDATORS, val_address
            ),
            "get_validator_outstanding_rewards",
        )
        .await
    }

    /// 밸리데이터 커미션/자기 위임 보상
    pub async fn get_validator_rewards(&self, val_address: &str) -> ApiResponse {
        self.query(
            &format!("{}/{}/rewards", api::DISTRIBUTION_VALIDATORS, val_address),
            "get_validator_rewards",
        )
        .await
    }

    /// 총 발행량 조회
    pub async fn get_total_supply(&self) -> ApiResponse {
        self.query(api::QUERY_SUPPLY, "get_total_supply").await
    }

    /// BEACON 모듈 파라미터
    pub async fn get_beacon_params(&self) -> ApiResponse {
        self.query(api::BEACON_PARAMS, "get_beacon_params").await
    }

    /// WRKChain 모듈 파라미터
    pub async fn get_wrkchain_params(&self) -> ApiResponse {
        self.query(api::WRKCHAIN_PARAMS, "get_wrkchain_params").await
    }

    /// 엔터프라이즈 모듈 파라미터
    pub async fn get_enterprise_params(&self) -> ApiResponse {
        self.query(api::QUERY_ENTERPRISE_PARAMS, "get_enterprise_params").await
    }

    // ========================================================================
    // 계정 생성/복구
    // ========================================================================

    /// 새 계정 생성
    pub fn create_account(&self) -> UndResult<Account> {
        let private_key = crypto::keys::generate_private_key();
        Ok(Account {
            private_key: hex::encode(private_key),
            address: crypto::address::private_key_to_address(
                &private_key,
                self.config.bech32_prefix(),
            )?,
        })
    }

    /// 키스토어와 함께 계정 생성
    pub fn create_account_with_keystore(&self, password: &str) -> UndResult<KeystoreAccount> {
        let private_key = crypto::keys::generate_private_key();
        let address =
            crypto::address::private_key_to_address(&private_key, self.config.bech32_prefix())?;
        let keystore = crypto::keystore::generate_keystore(&private_key, password)?;
        Ok(KeystoreAccount {
            private_key: hex::encode(private_key),
            address,
            keystore,
        })
    }

    /// 니모닉과 함께 계정 생성
    pub fn create_account_with_mnemonic(&self) -> UndResult<MnemonicAccount> {
        let mnemonic = crypto::keys::generate_mnemonic()?;
        let private_key =
            crypto::keys::private_key_from_mnemonic(&mnemonic, true, 0, self.config.coin_type())?;
        Ok(MnemonicAccount {
            private_key: hex::encode(private_key),
            address: crypto::address::private_key_to_address(
                &private_key,
                self.config.bech32_prefix(),
            )?,
            mnemonic,
        })
    }

    /// 키스토어에서 계정 복구
    pub fn recover_account_from_keystore(
        &self,
        keystore: &Keystore,
        password: &str,
    ) -> UndResult<Account> {
        let private_key = crypto::keystore::get_private_key_from_keystore(keystore, password)?;
        Ok(Account {
            private_key: hex::encode(private_key),
            address: crypto::address::private_key_to_address(
                &private_key,
                self.config.bech32_prefix(),
            )?,
        })
    }

    /// 니모닉에서 계정 복구
    pub fn recover_account_from_mnemonic(&self, mnemonic: &str) -> UndResult<Account> {
        let private_key =
            crypto::keys::private_key_from_mnemonic(mnemonic, true, 0, self.config.coin_type())?;
        Ok(Account {
            private_key: hex::encode(private_key),
            address: crypto::address::private_key_to_address(
                &private_key,
                self.config.bech32_prefix(),
            )?,
        })
    }

    /// 개인키에서 계정 복구
    pub fn recover_account_from_private_key(&self, private_key_hex: &str) -> UndResult<Account> {
        let private_key = crypto::keys::parse_private_key(private_key_hex)?;
        Ok(Account {
            private_key: hex::encode(private_key),
            address: crypto::address::private_key_to_address(
                &private_key,
                self.config.bech32_prefix(),
            )?,
        })
    }

    /// 주소 유효성 검사
    pub fn check_address(&self, address: &str) -> bool {
        crypto::address::check_address(address, self.config.bech32_prefix())
    }

    // ========================================================================
    // 내부 헬퍼
    // ========================================================================

    fn resolve_from(&self, params: &TxParams) -> UndResult<String> {
        params
            .from_address
            .clone()
            .or_else(|| self.address.clone())
            .ok_or_else(|| UndError::InvalidInput {
                message: "from_address should not be empty".to_string(),
            })
    }

    fn require_account_address(&self, address: &str, name: &str) -> UndResult<()> {
        if address.is_empty() {
            return Err(UndError::InvalidInput {
                message: format!("{name} should not be empty"),
            });
        }
        if !crypto::address::check_address(address, self.config.bech32_prefix()) {
            return Err(UndError::InvalidInput {
                message: format!("invalid {name}"),
            });
        }
        Ok(())
    }

    fn require_validator_address(&self, address: &str, name: &str) -> UndResult<()> {
        if address.is_empty() {
            return Err(UndError::InvalidInput {
                message: format!("{name} should not be empty"),
            });
        }
        if !crypto::address::check_address(address, self.config.bech32_val_prefix()) {
            return Err(UndError::InvalidInput {
                message: format!("invalid {name}"),
            });
        }
        Ok(())
    }

    fn query_address(&self, address: Option<&str>) -> Option<String> {
        match address {
            Some(address) if !address.is_empty() => Some(address.to_string()),
            _ => self.address.clone(),
        }
    }

    async fn query(&self, path: &str, op: &str) -> ApiResponse {
        match self.http.get(path).await {
            Ok(response) => response,
            Err(err) => {
                warn!(operation = op, error = %err, "query transport failure");
                ApiResponse::error(0, format!("{op} error: {err}"))
            }
        }
    }

    /// /auth/accounts 응답에서 (sequence, account_number) 추출
    async fn fetch_account(&self, address: &str) -> UndResult<(u64, u64)> {
        let response = self
            .http
            .get(&format!("{}/{}", api::QUERY_ACCOUNT, address))
            .await?;
        let value = &response.result["result"]["account"]["value"];
        let sequence = json_u64(&value["sequence"]).ok_or_else(|| UndError::BadResponse {
            message: format!("account query for {address} missing sequence"),
        })?;
        let account_number =
            json_u64(&value["account_number"]).ok_or_else(|| UndError::BadResponse {
                message: format!("account query for {address} missing account_number"),
            })?;
        Ok((sequence, account_number))
    }

    async fn send_msg(
        &mut self,
        msg: Msg,
        address: &str,
        fee: Fee,
        params: TxParams,
    ) -> UndResult<ApiResponse> {
        let memo = params.memo.clone().unwrap_or_default();
        let signed = self
            .prepare_tx(msg, address, fee, params.sequence, &memo)
            .await?;
        self.send_raw_transaction(&signed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::Coin;

    const ADDRESS: &str = "und1x8pl6wzqf9atkm77ymc5vn5dnpl5xytmn200xy";
    const TARGET: &str = "und150xrwj6ca9kyzz20e4x0qj6zm0206jhe4tk7nf";

    fn client() -> UndClient {
        UndClient::new("http://localhost:1317", ChainConfig::default()).unwrap()
    }

    fn fee() -> Fee {
        Fee::new(vec![Coin::new("nund", "1000")], 90_000)
    }

    #[test]
    fn test_empty_server_rejected() {
        let err = UndClient::new("", ChainConfig::default()).unwrap_err();
        assert!(err.to_string().contains("server url should not be empty"));
    }

    #[test]
    fn test_client_debug_redacts_signer() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("UndClient"));
        assert!(debug.contains("base_url"));
        assert!(!debug.contains("private_key"));
    }

    #[test]
    fn test_broadcast_mode_setter() {
        let mut client = client();
        client.set_broadcast_mode("block").unwrap();
        assert_eq!(client.broadcast_mode(), BroadcastMode::Block);
        assert!(client.set_broadcast_mode("commit").is_err());
    }

    #[test]
    fn test_key_address_requires_signer() {
        let client = client();
        assert_eq!(client.get_client_key_address().unwrap_err().code(), "SIGNER_NOT_SET");
    }

    #[tokio::test]
    async fn test_transfer_rejects_zero_amount() {
        let mut client = client();
        let err = client
            .transfer_und(
                TARGET,
                0.0,
                fee(),
                TxParams {
                    from_address: Some(ADDRESS.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: amount should be a positive number");
    }

    #[tokio::test]
    async fn test_transfer_rejects_overflow_amount() {
        let mut client = client();
        let err = client
            .transfer_und(
                TARGET,
                2f64.powi(63),
                fee(),
                TxParams {
                    from_address: Some(ADDRESS.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: amount should be less than 2^63");
    }

    #[tokio::test]
    async fn test_transfer_rejects_bad_target() {
        let mut client = client();
        let err = client
            .transfer_und(
                "cosmos1notanundaddress",
                1.0,
                fee(),
                TxParams {
                    from_address: Some(ADDRESS.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: invalid to_address");
    }

    #[tokio::test]
    async fn test_delegate_rejects_account_address_as_validator() {
        let mut client = client();
        let err = client
            .delegate(
                ADDRESS,
                1.0,
                fee(),
                TxParams {
                    from_address: Some(ADDRESS.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: invalid validator");
    }

    #[tokio::test]
    async fn test_filtered_transactions_require_filter() {
        let client = client();
        let response = client.get_filtered_transactions(&[]).await;
        assert_eq!(response.status, 400);
        assert_eq!(
            response.result["error"],
            "get_filtered_transactions error: must include at least one filter"
        );
    }

    #[tokio::test]
    async fn test_query_transport_failure_shaped() {
        // 연결 불가능한 서버로의 조회는 status 0 에러 응답
        let client =
            UndClient::new("http://127.0.0.1:1", ChainConfig::default().with_timeout_ms(500))
                .unwrap();
        let response = client.get_total_supply().await;
        assert_eq!(response.status, 0);
        assert!(response.result["error"]
            .as_str()
            .unwrap()
            .starts_with("get_total_supply error"));
    }

    #[test]
    fn test_account_lifecycle() {
        let client = client();
        let account = client.create_account().unwrap();
        assert!(client.check_address(&account.address));

        let recovered = client
            .recover_account_from_private_key(&account.private_key)
            .unwrap();
        assert_eq!(recovered.address, account.address);
    }

    #[test]
    fn test_mnemonic_account_roundtrip() {
        let client = client();
        let created = client.create_account_with_mnemonic().unwrap();
        let recovered = client.recover_account_from_mnemonic(&created.mnemonic).unwrap();
        assert_eq!(created.address, recovered.address);
        assert_eq!(created.private_key, recovered.private_key);
    }
}
