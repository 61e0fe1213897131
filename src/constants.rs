/// 默认每个采样使用的最低有效位数量。
pub const DEFAULT_LSB_WIDTH: u8 = 2;

/// 允许的最小 LSB 位宽。
pub const MIN_LSB_WIDTH: u8 = 1;

/// 允许的最大 LSB 位宽。
/// 16 位有符号采样去掉符号位后只剩 15 位幅值。
pub const MAX_LSB_WIDTH: u8 = 15;

/// 载体采样的位深 (位)。
pub const SAMPLE_BITS: u16 = 16;

/// 可表示的最小采样值 (-32768)。
/// 它的绝对值无法用 16 位有符号整数表示，因此这类采样永远不会被写入或读取。
pub const MIN_SAMPLE: i16 = i16::MIN;

/// `--framed` 模式下用于记录载荷长度的前缀字节数 (`u64`，小端序)。
pub const LENGTH_PREFIX_BYTES: usize = 8;
