//! und-rust 에러 타입 정의

use thiserror::Error;

/// SDK 전역에서 사용하는 에러 타입
#[derive(Error, Debug)]
pub enum UndError {
    /// 입력 파라미터 검증 실패
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// bech32 주소 검증 실패
    #[error("invalid address: {address}")]
    InvalidAddress { address: String },

    /// 개인키 파싱/검증 실패
    #[error("invalid private key: {message}")]
    InvalidPrivateKey { message: String },

    /// 니모닉 구문 검증 실패
    #[error("invalid mnemonic: {message}")]
    InvalidMnemonic { message: String },

    /// 서명 생성/검증 실패
    #[error("signature error: {message}")]
    SignatureError { message: String },

    /// 키스토어 생성/복호화 실패
    #[error("keystore error: {message}")]
    KeystoreError { message: String },

    /// 키스토어 MAC 불일치 (비밀번호 오류)
    #[error("keystore mac check failed: wrong password?")]
    KeystoreMacMismatch,

    /// 지원하지 않는 메시지 타입
    #[error("unsupported message type: {type_tag}")]
    UnsupportedMsgType { type_tag: String },

    /// 지원하지 않는 브로드캐스트 모드
    #[error("unsupported broadcast mode: {mode} (expected sync, async or block)")]
    InvalidBroadcastMode { mode: String },

    /// 서명되지 않은 트랜잭션의 직렬화 시도
    #[error("transaction has not been signed")]
    TxNotSigned,

    /// 서명 델리게이트 미설정 상태에서 서명 시도
    #[error("no signing delegate configured: call set_private_key or use_ledger_signer first")]
    SignerNotSet,

    /// 바이너리/시간 인코딩 실패
    #[error("encode error: {message}")]
    EncodeError { message: String },

    /// 네트워크 통신 실패
    #[error("network error: {message}")]
    NetworkError { message: String },

    /// 요청 타임아웃
    #[error("request timeout: {url}")]
    RequestTimeout { url: String },

    /// 응답 본문이 기대한 형태가 아님
    #[error("bad response: {message}")]
    BadResponse { message: String },

    /// JSON 직렬화/역직렬화 실패
    #[error("json error: {message}")]
    JsonError { message: String },

    /// 하드웨어 서명 장치 오류
    #[error("device error [{code:#06x}]: {message}")]
    DeviceError { code: u16, message: String },
}

impl UndError {
    /// 에러 코드를 문자열로 반환
    pub fn code(&self) -> &'static str {
        match self {
            UndError::InvalidInput { .. } => "INVALID_INPUT",
            UndError::InvalidAddress { .. } => "INVALID_ADDRESS",
            UndError::InvalidPrivateKey { .. } => "INVALID_PRIVATE_KEY",
            UndError::InvalidMnemonic { .. } => "INVALID_MNEMONIC",
            UndError::SignatureError { .. } => "SIGNATURE_ERROR",
            UndError::KeystoreError { .. } => "KEYSTORE_ERROR",
            UndError::KeystoreMacMismatch => "KEYSTORE_MAC_MISMATCH",
            UndError::UnsupportedMsgType { .. } => "UNSUPPORTED_MSG_TYPE",
            UndError::InvalidBroadcastMode { .. } => "INVALID_BROADCAST_MODE",
            UndError::TxNotSigned => "TX_NOT_SIGNED",
            UndError::SignerNotSet => "SIGNER_NOT_SET",
            UndError::EncodeError { .. } => "ENCODE_ERROR",
            UndError::NetworkError { .. } => "NETWORK_ERROR",
            UndError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            UndError::BadResponse { .. } => "BAD_RESPONSE",
            UndError::JsonError { .. } => "JSON_ERROR",
            UndError::DeviceError { .. } => "DEVICE_ERROR",
        }
    }

    /// 재시도 가능한 에러인지 확인
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UndError::NetworkError { .. } | UndError::RequestTimeout { .. }
        )
    }

    /// 입력 검증 단계의 에러인지 확인
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            UndError::InvalidInput { .. }
                | UndError::InvalidAddress { .. }
                | UndError::InvalidPrivateKey { .. }
                | UndError::InvalidMnemonic { .. }
                | UndError::UnsupportedMsgType { .. }
                | UndError::InvalidBroadcastMode { .. }
        )
    }

    /// 네트워크 관련 에러인지 확인
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            UndError::NetworkError { .. }
                | UndError::RequestTimeout { .. }
                | UndError::BadResponse { .. }
        )
    }
}

impl From<serde_json::Error> for UndError {
    fn from(err: serde_json::Error) -> Self {
        UndError::JsonError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for UndError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UndError::RequestTimeout {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            UndError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

/// Result 타입 별칭
pub type UndResult<T> = Result<T, UndError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = UndError::InvalidInput {
            message: "amount should be a positive number".to_string(),
        };
        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(err.is_validation_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_network_error_retryable() {
        let err = UndError::NetworkError {
            message: "connection refused".to_string(),
        };
        assert!(err.is_retryable());
        assert!(err.is_network_error());
    }

    #[test]
    fn test_mac_mismatch_message() {
        let err = UndError::KeystoreMacMismatch;
        assert_eq!(err.to_string(), "keystore mac check failed: wrong password?");
    }
}
