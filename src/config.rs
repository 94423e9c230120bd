//! 체인 설정 및 REST 엔드포인트 상수

/// REST API 경로 상수
pub mod api {
    pub const NODE_INFO: &str = "/node_info";
    pub const QUERY_ACCOUNT: &str = "/auth/accounts";
    pub const QUERY_TX: &str = "/txs";
    pub const QUERY_TXS: &str = "/txs";
    pub const BROADCAST_TX: &str = "/txs";
    pub const QUERY_SUPPLY: &str = "/supply/total";
    pub const QUERY_ENTERPRISE_POS: &str = "/enterprise/pos";
    pub const QUERY_ENTERPRISE_LOCKED: &str = "/enterprise/locked";
    pub const QUERY_ENTERPRISE_PARAMS: &str = "/enterprise/params";
    pub const STAKING_DELEGATORS: &str = "/staking/delegators";
    pub const STAKING_VALIDATORS: &str = "/staking/validators";
    pub const STAKING_REDELEGATIONS: &str = "/staking/redelegations";
    pub const DISTRIBUTION_DELEGATORS: &str = "/distribution/delegators";
    pub const DISTRIBUTION_VALIDATORS: &str = "/distribution/validators";
    pub const BEACON_PARAMS: &str = "/beacon/params";
    pub const BEACON_PREFIX: &str = "/beacon";
    pub const WRKCHAIN_PARAMS: &str = "/wrkchain/params";
    pub const WRKCHAIN_PREFIX: &str = "/wrkchain";
}

/// 체인 파라미터 설정
///
/// 기본값은 Unification 메인넷(FUND) 기준이며, 테스트넷 등
/// 변형 체인은 빌더 메서드로 덮어쓴다.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// 계정 주소 bech32 프리픽스
    bech32_prefix: String,
    /// 밸리데이터 주소 bech32 프리픽스
    bech32_val_prefix: String,
    /// BIP-44 코인 타입 (44'/{coin_type}'/0'/0/{index})
    coin_type: u32,
    /// 체인 기본 단위 denom
    base_denom: String,
    /// 표시 단위 denom 별칭 (기본 단위로 환산 대상)
    display_denoms: Vec<String>,
    /// 표시 단위 1개당 기본 단위 수량 (10^9)
    base_factor: u64,
    /// HTTP 요청 타임아웃 (ms)
    timeout_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            bech32_prefix: "und".to_string(),
            bech32_val_prefix: "undvaloper".to_string(),
            coin_type: 5555,
            base_denom: "nund".to_string(),
            display_denoms: vec!["und".to_string(), "fund".to_string()],
            base_factor: 1_000_000_000,
            timeout_ms: 30_000,
        }
    }
}

impl ChainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bech32_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bech32_prefix = prefix.into();
        self
    }

    pub fn with_bech32_val_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bech32_val_prefix = prefix.into();
        self
    }

    pub fn with_coin_type(mut self, coin_type: u32) -> Self {
        self.coin_type = coin_type;
        self
    }

    pub fn with_base_denom(mut self, denom: impl Into<String>) -> Self {
        self.base_denom = denom.into();
        self
    }

    pub fn with_display_denoms(mut self, denoms: Vec<String>) -> Self {
        self.display_denoms = denoms;
        self
    }

    pub fn with_base_factor(mut self, factor: u64) -> Self {
        self.base_factor = factor;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    // Getters

    pub fn bech32_prefix(&self) -> &str {
        &self.bech32_prefix
    }

    pub fn bech32_val_prefix(&self) -> &str {
        &self.bech32_val_prefix
    }

    pub fn coin_type(&self) -> u32 {
        self.coin_type
    }

    pub fn base_denom(&self) -> &str {
        &self.base_denom
    }

    pub fn display_denoms(&self) -> &[String] {
        &self.display_denoms
    }

    pub fn base_factor(&self) -> u64 {
        self.base_factor
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// 표시 단위 denom인지 확인 (대소문자 구분 없음)
    pub fn is_display_denom(&self, denom: &str) -> bool {
        self.display_denoms
            .iter()
            .any(|d| d.eq_ignore_ascii_case(denom))
    }

    /// HD 파생 경로 생성: m/44'/{coin_type}'/0'/0/{index}
    pub fn hd_path(&self, index: u32) -> String {
        format!("m/44'/{}'/0'/0/{}", self.coin_type, index)
    }

    /// 하드웨어 장치용 파생 경로 성분 (하드닝은 장치 쪽에서 적용)
    pub fn device_path(&self, account: u32) -> [u32; 5] {
        [44, self.coin_type, 0, 0, account]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChainConfig::default();
        assert_eq!(config.bech32_prefix(), "und");
        assert_eq!(config.bech32_val_prefix(), "undvaloper");
        assert_eq!(config.coin_type(), 5555);
        assert_eq!(config.base_denom(), "nund");
        assert_eq!(config.base_factor(), 1_000_000_000);
    }

    #[test]
    fn test_builder() {
        let config = ChainConfig::new()
            .with_bech32_prefix("tund")
            .with_timeout_ms(5_000);
        assert_eq!(config.bech32_prefix(), "tund");
        assert_eq!(config.timeout_ms(), 5_000);
    }

    #[test]
    fn test_display_denom_aliases() {
        let config = ChainConfig::default();
        assert!(config.is_display_denom("und"));
        assert!(config.is_display_denom("FUND"));
        assert!(!config.is_display_denom("nund"));
        assert!(!config.is_display_denom("atom"));
    }

    #[test]
    fn test_hd_path() {
        let config = ChainConfig::default();
        assert_eq!(config.hd_path(0), "m/44'/5555'/0'/0/0");
        assert_eq!(config.hd_path(7), "m/44'/5555'/0'/0/7");
        assert_eq!(config.device_path(2), [44, 5555, 0, 0, 2]);
    }
}
