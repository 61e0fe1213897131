//! # 位流适配器
//!
//! 在字节粒度的数据与 `LsbWidth` 粒度的位组之间相互转换。
//! 两个方向共用同一个累加器 [`BitBuffer`]：
//!
//! * 隐藏时，按整字节 (8 位) 从载荷移入，每次取出低 `LsbWidth` 位作为一个位组；
//! * 提取时，按位组移入，每凑够 8 位就取出一个字节。
//!
//! 位序为 LSB 优先：字节的最低位最先进入位组，位组的最低位对应字节中较早的位。

use crate::config::LsbWidth;

/// 尚未消费的位的临时累加器。
///
/// 由一次隐藏或提取调用独占，调用结束即丢弃。
/// `len` 可能为负：载荷耗尽时最后一个位组会用零补齐，补齐的位数记为负的剩余量。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    acc: u64,
    len: i32,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前有效位数，可能为负 (见类型说明)。
    pub fn len(&self) -> i32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len <= 0
    }

    /// 从 `source` 取出下一个位组。
    ///
    /// 有效位不足 `width` 且仍有未读字节时，逐字节移入累加器并把位游标 `cursor` 推进 8；
    /// 随后取出低 `width` 位。载荷已读完时不足的高位以零补齐。
    /// `cursor / 8` 即下一个未读字节的下标。
    pub fn pull_group(&mut self, source: &[u8], cursor: &mut usize, width: LsbWidth) -> u16 {
        let bits = width.bits() as i32;
        while self.len < bits && *cursor / 8 < source.len() {
            let fill = self.len.max(0) as u32;
            self.acc |= u64::from(source[*cursor / 8]) << fill;
            self.len = fill as i32 + 8;
            *cursor += 8;
        }

        let group = (self.acc & u64::from(width.extract_mask())) as u16;
        self.acc >>= bits;
        self.len -= bits;
        group
    }

    /// 把一个位组移入累加器的当前有效位之上。
    pub fn push_group(&mut self, group: u16, width: LsbWidth) {
        let fill = self.len.max(0) as u32;
        self.acc |= u64::from(group & width.extract_mask()) << fill;
        self.len = fill as i32 + width.bits() as i32;
    }

    /// 有效位不少于 8 时取出最低的一个字节，否则返回 `None`。
    pub fn drain_byte(&mut self) -> Option<u8> {
        if self.len < 8 {
            return None;
        }
        let byte = (self.acc & 0xFF) as u8;
        self.acc >>= 8;
        self.len -= 8;
        Some(byte)
    }

    /// 载荷的所有字节都已读入且累加器已被取空时，位流耗尽。
    pub fn is_exhausted(&self, source: &[u8], cursor: usize) -> bool {
        cursor / 8 >= source.len() && self.is_empty()
    }
}

/// 把字节切片切分为位组的迭代器，直到位流耗尽为止。
#[derive(Debug, Clone)]
pub struct Groups<'a> {
    source: &'a [u8],
    cursor: usize,
    buffer: BitBuffer,
    width: LsbWidth,
}

impl<'a> Groups<'a> {
    pub fn new(source: &'a [u8], width: LsbWidth) -> Self {
        Self {
            source,
            cursor: 0,
            buffer: BitBuffer::new(),
            width,
        }
    }
}

impl Iterator for Groups<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_exhausted(self.source, self.cursor) {
            return None;
        }
        Some(
            self.buffer
                .pull_group(self.source, &mut self.cursor, self.width),
        )
    }
}
