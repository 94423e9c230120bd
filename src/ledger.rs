//! 하드웨어 서명 장치 트랜스포트 추상화
//!
//! USB/HID 드라이버 구현은 이 크레이트 밖에 있다. SDK는 파생 경로와
//! 서명 대상 문서만 넘기고 `{return_code, ...}` 형태의 응답을 받는다.
//! 경로 성분은 하드닝 적용 전 값이며([44, 5555, 0, 0, account]),
//! 하드닝은 장치 드라이버가 적용한다.

use crate::errors::{UndError, UndResult};
use async_trait::async_trait;

/// 장치 성공 응답 코드 (APDU 0x9000)
pub const DEVICE_RETURN_CODE_OK: u16 = 0x9000;

/// 주소/공개키 조회 응답
#[derive(Debug, Clone)]
pub struct DeviceAddressResponse {
    pub return_code: u16,
    pub error_message: String,
    pub bech32_address: String,
    pub compressed_pk: Vec<u8>,
}

/// 서명 응답 (DER 인코딩 서명)
#[derive(Debug, Clone)]
pub struct DeviceSignResponse {
    pub return_code: u16,
    pub error_message: String,
    pub signature: Vec<u8>,
}

/// 하드웨어 장치와의 통신 채널
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// 파생 경로의 bech32 주소와 압축 공개키 조회
    async fn get_address_and_pub_key(
        &self,
        path: &[u32; 5],
        hrp: &str,
    ) -> UndResult<DeviceAddressResponse>;

    /// canonical JSON 텍스트에 서명
    async fn sign(&self, path: &[u32; 5], message: &[u8]) -> UndResult<DeviceSignResponse>;
}

/// 0x9000이 아닌 응답 코드를 에러로 변환
pub fn check_return_code(return_code: u16, error_message: &str) -> UndResult<()> {
    if return_code == DEVICE_RETURN_CODE_OK {
        Ok(())
    } else {
        Err(UndError::DeviceError {
            code: return_code,
            message: if error_message.is_empty() {
                "device returned an error".to_string()
            } else {
                error_message.to_string()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_ok() {
        assert!(check_return_code(0x9000, "").is_ok());
    }

    #[test]
    fn test_return_code_error_names_code() {
        let err = check_return_code(0x6986, "Transaction rejected").unwrap_err();
        assert_eq!(
            err.to_string(),
            "device error [0x6986]: Transaction rejected"
        );
    }

    #[test]
    fn test_return_code_error_default_message() {
        let err = check_return_code(0x6e00, "").unwrap_err();
        assert!(err.to_string().contains("0x6e00"));
    }
}
