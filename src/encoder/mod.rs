//! Wire encoders: legacy amino binary helpers and canonical sign-doc JSON

pub mod amino;
pub mod canonical;
pub mod varint;

pub use amino::{encode_bool, encode_number, encode_string, encode_time};
pub use canonical::{convert_object_to_sign_bytes, deep_sort};
