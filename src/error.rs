//! # 错误类型
//!
//! 隐写核心与载体读写共用的错误枚举。命令行层再用 `anyhow` 为其附加上下文。

use thiserror::Error;

/// 隐写操作可能产生的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// LSB 位宽不在 1..=15 范围内。
    #[error("Invalid LSB width: {0} (must be 1-15)")]
    InvalidLsbWidth(u8),

    /// 载荷所需的位数超过了载体中可用采样能提供的位数。
    #[error("Not enough space in the carrier: {required_bits} bits required, {available_bits} bits available")]
    CapacityExceeded {
        /// 载荷需要的位数 (按位组向上取整)。
        required_bits: u64,
        /// 可用采样能容纳的位数。
        available_bits: u64,
    },

    /// 提取时载体在凑够请求的字节数之前就耗尽了。
    #[error("Carrier exhausted after recovering {recovered} of {requested} bytes")]
    CarrierExhausted {
        /// 请求提取的字节数。
        requested: usize,
        /// 实际恢复的字节数。
        recovered: usize,
    },

    /// 载体不是 16 位有符号整数 PCM。
    #[error("Malformed carrier: {0}")]
    MalformedCarrier(String),

    /// 长度前缀声明的长度超出了载体容量，通常说明载体中没有分帧数据。
    #[error("Declared payload length {declared} exceeds carrier capacity of {capacity} bytes")]
    MalformedFrame {
        /// 前缀中记录的长度。
        declared: u64,
        /// 载体扣除前缀后的容量。
        capacity: u64,
    },

    /// I/O 错误。
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for StegoError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => Self::Io(io),
            other => Self::MalformedCarrier(other.to_string()),
        }
    }
}

/// 隐写操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;
