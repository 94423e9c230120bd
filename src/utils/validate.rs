//! 입력 검증 헬퍼

use crate::errors::{UndError, UndResult};
use crate::msg::Coin;
use crate::utils::precise::Precise;
use serde_json::Value;

/// int64 상한 (2^63)
const MAX_INT64: f64 = 9_223_372_036_854_775_808.0;

/// 수량이 (0, 2^63) 범위의 유한한 양수인지 검증
pub fn check_number(value: f64, name: &str) -> UndResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(UndError::InvalidInput {
            message: format!("{name} should be a positive number"),
        });
    }
    if value >= MAX_INT64 {
        return Err(UndError::InvalidInput {
            message: format!("{name} should be less than 2^63"),
        });
    }
    Ok(())
}

/// 수수료 코인 목록 검증: 양수 수량, 비어있지 않은 denom
pub fn check_coins(coins: &[Coin]) -> UndResult<()> {
    for coin in coins {
        let amount = Precise::from_string(&coin.amount)?;
        if !amount.is_positive() {
            return Err(UndError::InvalidInput {
                message: format!("coin amount should be a positive number: {}", coin.amount),
            });
        }
        if coin.denom.trim().is_empty() {
            return Err(UndError::InvalidInput {
                message: "coin denom should not be empty".to_string(),
            });
        }
    }
    Ok(())
}

/// JSON 값에서 u64 추출 (숫자/문자열 양쪽 허용)
pub fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// JSON 값에서 문자열 추출
pub fn json_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}
