//! # 编解码配置
//!
//! `LsbWidth` 在一次隐藏或提取操作中保持不变，作为不可变的值显式传入每次调用。

use crate::constants::{DEFAULT_LSB_WIDTH, MAX_LSB_WIDTH, MIN_LSB_WIDTH, SAMPLE_BITS};
use crate::error::StegoError;

/// 每个采样使用的最低有效位数量，取值范围 1..=15。
///
/// 载体中不记录位宽，提取时必须使用与隐藏时相同的位宽，否则恢复出的数据会被悄然破坏。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LsbWidth(u8);

impl LsbWidth {
    /// 创建一个经过校验的位宽。
    ///
    /// # Errors
    ///
    /// 位宽不在 1..=15 范围内时返回 [`StegoError::InvalidLsbWidth`]。
    pub fn new(bits: u8) -> Result<Self, StegoError> {
        if (MIN_LSB_WIDTH..=MAX_LSB_WIDTH).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(StegoError::InvalidLsbWidth(bits))
        }
    }

    pub fn bits(self) -> u32 {
        u32::from(self.0)
    }

    /// 隐藏掩码：清除采样幅值的低 `bits` 位，即 `(1 << 15) - (1 << bits)`。
    pub fn embed_mask(self) -> u16 {
        (1u16 << (SAMPLE_BITS - 1)) - (1u16 << self.0)
    }

    /// 提取掩码：只保留低 `bits` 位，即 `(1 << bits) - 1`。
    pub fn extract_mask(self) -> u16 {
        (1u16 << self.0) - 1
    }

    /// 容纳 `byte_len` 字节载荷所需的位组数量 (向上取整)。
    pub fn groups_for(self, byte_len: usize) -> u64 {
        (byte_len as u64 * 8).div_ceil(u64::from(self.0))
    }

    /// `usable_samples` 个可用采样能容纳的完整字节数。
    pub fn capacity_bytes(self, usable_samples: usize) -> u64 {
        usable_samples as u64 * u64::from(self.0) / 8
    }
}

impl Default for LsbWidth {
    fn default() -> Self {
        Self(DEFAULT_LSB_WIDTH)
    }
}

impl TryFrom<u8> for LsbWidth {
    type Error = StegoError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}
