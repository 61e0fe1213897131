//! # 采样编解码
//!
//! 逐个采样地把载荷位组写入 (或读出) 16 位有符号采样的低 `LsbWidth` 位。
//!
//! 负采样按“符号 + 幅值”处理：取绝对值后再做掩码，最后恢复符号，
//! 这样写入的位不会受补码表示的影响。值为 [`MIN_SAMPLE`] 的采样没有可表示的绝对值，
//! 因此两个方向都原样跳过，也不计入容量。

use crate::bitstream::{BitBuffer, Groups};
use crate::config::LsbWidth;
use crate::constants::{LENGTH_PREFIX_BYTES, MIN_SAMPLE};
use crate::error::{Result, StegoError};
use log::debug;

/// 可以承载位组的采样数量 (即不等于 [`MIN_SAMPLE`] 的采样)。
pub fn usable_samples(samples: &[i16]) -> usize {
    samples.iter().filter(|&&s| s != MIN_SAMPLE).count()
}

/// 载体在给定位宽下能容纳的载荷字节数。
pub fn capacity_bytes(samples: &[i16], width: LsbWidth) -> u64 {
    width.capacity_bytes(usable_samples(samples))
}

fn embed_sample(sample: i16, group: u16, width: LsbWidth) -> i16 {
    // sample != MIN_SAMPLE，幅值不超过 0x7FFF
    let magnitude = sample.unsigned_abs();
    let altered = ((magnitude & width.embed_mask()) | group) as i16;
    if sample < 0 { -altered } else { altered }
}

fn extract_sample(sample: i16, width: LsbWidth) -> u16 {
    sample.unsigned_abs() & width.extract_mask()
}

/// 将 `payload` 隐藏到 `samples` 中，返回等长的新采样序列。
///
/// 载荷按 LSB 优先切分为 `width` 位的位组，依次写入每个可用采样的低位；
/// [`MIN_SAMPLE`] 采样以及载荷耗尽后的所有采样保持不变。
///
/// # Errors
///
/// 可用采样不足以容纳整个载荷时返回 [`StegoError::CapacityExceeded`]，此时不会修改任何采样。
pub fn embed(samples: &[i16], payload: &[u8], width: LsbWidth) -> Result<Vec<i16>> {
    let usable = usable_samples(samples);
    let required_bits = payload.len() as u64 * 8;
    let available_bits = usable as u64 * u64::from(width.bits());
    if required_bits > available_bits {
        return Err(StegoError::CapacityExceeded {
            required_bits,
            available_bits,
        });
    }

    debug!(
        "embedding {} bytes into {} usable of {} samples ({} groups of {} bits)",
        payload.len(),
        usable,
        samples.len(),
        width.groups_for(payload.len()),
        width.bits()
    );

    let mut groups = Groups::new(payload, width);
    let stego = samples
        .iter()
        .map(|&sample| {
            if sample == MIN_SAMPLE {
                return sample;
            }
            match groups.next() {
                Some(group) => embed_sample(sample, group, width),
                None => sample,
            }
        })
        .collect();

    Ok(stego)
}

/// 按载体顺序从可用采样中逐字节恢复载荷，跨多次读取保留未取完的位。
struct ByteReader<'a> {
    samples: std::slice::Iter<'a, i16>,
    buffer: BitBuffer,
    width: LsbWidth,
    consumed: usize,
}

impl<'a> ByteReader<'a> {
    fn new(samples: &'a [i16], width: LsbWidth) -> Self {
        Self {
            samples: samples.iter(),
            buffer: BitBuffer::new(),
            width,
            consumed: 0,
        }
    }

    /// 读取接下来的 `count` 个字节。调用方需事先确认载体容量足够。
    fn read(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut recovered = Vec::with_capacity(count);
        while recovered.len() < count {
            if let Some(byte) = self.buffer.drain_byte() {
                recovered.push(byte);
                continue;
            }
            match self.samples.next() {
                Some(&sample) => {
                    self.consumed += 1;
                    if sample != MIN_SAMPLE {
                        self.buffer
                            .push_group(extract_sample(sample, self.width), self.width);
                    }
                }
                None => {
                    return Err(StegoError::CarrierExhausted {
                        requested: count,
                        recovered: recovered.len(),
                    });
                }
            }
        }
        Ok(recovered)
    }
}

/// 从 `samples` 中恢复前 `byte_count` 个载荷字节。
///
/// 位宽必须与隐藏时一致；载体中不记录位宽，不一致时得到的是错误的数据而不是错误。
/// `byte_count` 为 0 时不读取任何采样，直接返回空缓冲区。
///
/// # Errors
///
/// `byte_count` 超出载体容量时返回 [`StegoError::CarrierExhausted`]，
/// 其中 `recovered` 为载体实际能提供的字节数。检查先于任何分配和读取。
pub fn extract(samples: &[i16], byte_count: usize, width: LsbWidth) -> Result<Vec<u8>> {
    if byte_count == 0 {
        return Ok(Vec::new());
    }

    let capacity = capacity_bytes(samples, width);
    if byte_count as u64 > capacity {
        return Err(StegoError::CarrierExhausted {
            requested: byte_count,
            recovered: capacity as usize,
        });
    }

    let mut reader = ByteReader::new(samples, width);
    let recovered = reader.read(byte_count)?;
    debug!("recovered {byte_count} bytes after {} samples", reader.consumed);
    Ok(recovered)
}

/// 先写入 8 字节小端序的载荷长度，再写入载荷本身。
///
/// # Errors
///
/// 同 [`embed`]，容量计算包含长度前缀。
pub fn embed_framed(samples: &[i16], payload: &[u8], width: LsbWidth) -> Result<Vec<i16>> {
    let mut framed = Vec::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
    framed.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    framed.extend_from_slice(payload);
    embed(samples, &framed, width)
}

/// 读取 [`embed_framed`] 写入的长度前缀，并返回其后的载荷。
///
/// # Errors
///
/// * 载体连长度前缀都容纳不下时返回 [`StegoError::CarrierExhausted`]。
/// * 前缀声明的长度超出载体剩余容量时返回 [`StegoError::MalformedFrame`]。
pub fn extract_framed(samples: &[i16], width: LsbWidth) -> Result<Vec<u8>> {
    let capacity = capacity_bytes(samples, width);
    if capacity < LENGTH_PREFIX_BYTES as u64 {
        return Err(StegoError::CarrierExhausted {
            requested: LENGTH_PREFIX_BYTES,
            recovered: capacity as usize,
        });
    }

    let mut reader = ByteReader::new(samples, width);
    let mut raw = [0u8; LENGTH_PREFIX_BYTES];
    raw.copy_from_slice(&reader.read(LENGTH_PREFIX_BYTES)?);
    let declared = u64::from_le_bytes(raw);

    let capacity = capacity - LENGTH_PREFIX_BYTES as u64;
    if declared > capacity {
        return Err(StegoError::MalformedFrame { declared, capacity });
    }

    let payload = reader.read(declared as usize)?;
    debug!(
        "recovered framed payload of {declared} bytes after {} samples",
        reader.consumed
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn width(bits: u8) -> LsbWidth {
        LsbWidth::new(bits).unwrap()
    }

    fn random_carrier(rng: &mut StdRng, len: usize) -> Vec<i16> {
        (0..len).map(|_| rng.random::<i16>()).collect()
    }

    #[test]
    fn test_roundtrip_all_widths() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let carrier = random_carrier(&mut rng, 4096);
        let mut payload = vec![0u8; 200];
        rng.fill(&mut payload[..]);

        for bits in 1..=8 {
            let w = width(bits);
            let stego = embed(&carrier, &payload, w).unwrap();
            assert_eq!(stego.len(), carrier.len());
            assert_eq!(extract(&stego, payload.len(), w).unwrap(), payload, "width {bits}");
        }
    }

    #[test]
    fn test_roundtrip_wide_groups() {
        let mut rng = StdRng::seed_from_u64(42);
        let carrier = random_carrier(&mut rng, 512);
        let payload = b"fifteen bits per sample";

        for bits in 9..=15 {
            let w = width(bits);
            let stego = embed(&carrier, payload, w).unwrap();
            assert_eq!(extract(&stego, payload.len(), w).unwrap(), payload, "width {bits}");
        }
    }

    #[test]
    fn test_min_sample_only_carrier_is_rejected() {
        let carrier = vec![MIN_SAMPLE; 16];
        let result = embed(&carrier, b"x", width(2));
        assert!(matches!(
            result,
            Err(StegoError::CapacityExceeded {
                required_bits: 8,
                available_bits: 0
            })
        ));
    }

    #[test]
    fn test_unchanged_tail() {
        let mut rng = StdRng::seed_from_u64(7);
        let carrier = random_carrier(&mut rng, 1000);
        let w = width(4);
        let stego = embed(&carrier, b"abc", w).unwrap();

        // 3 字节 = 6 个 4 位组，只占用前 6 个可用采样
        let sixth_usable = carrier
            .iter()
            .enumerate()
            .filter(|(_, s)| **s != MIN_SAMPLE)
            .nth(5)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(stego[sixth_usable + 1..], carrier[sixth_usable + 1..]);
    }

    #[test]
    fn test_sign_preservation() {
        // |-100| = 0b110_0100，低 2 位已为 0，写入 3 后幅值为 103
        assert_eq!(embed_sample(-100, 3, width(2)), -103);
        assert_eq!(embed_sample(-99, 0, width(2)), -96);
        assert_eq!(embed_sample(0, 1, width(2)), 1);
        assert_eq!(embed_sample(i16::MAX, 0, width(15)), 0);
        assert_eq!(embed_sample(-32767, 0x7FFF, width(15)), -32767);
    }

    #[test]
    fn test_extract_zero_bytes_reads_nothing() {
        assert!(extract(&[], 0, width(2)).unwrap().is_empty());
    }

    #[test]
    fn test_empty_payload_leaves_carrier_untouched() {
        let carrier = vec![1, -2, 3, MIN_SAMPLE, 5];
        assert_eq!(embed(&carrier, &[], width(3)).unwrap(), carrier);
    }

    #[test]
    fn test_min_sample_interleaving() {
        let carrier = [MIN_SAMPLE, 40, 41, MIN_SAMPLE, 42, 43];
        let w = width(2);
        let stego = embed(&carrier, &[0b0000_0110], w).unwrap();
        assert_eq!(stego, [MIN_SAMPLE, 42, 41, MIN_SAMPLE, 40, 40]);
        assert_eq!(extract(&stego, 1, w).unwrap(), [6u8]);
    }

    #[test]
    fn test_insufficient_usable_samples() {
        // 只有 3 个可用采样 (6 位)，放不下一个字节
        let carrier = [MIN_SAMPLE, 40, 41, MIN_SAMPLE, 42];
        let result = embed(&carrier, &[6], width(2));
        assert!(matches!(
            result,
            Err(StegoError::CapacityExceeded {
                required_bits: 8,
                available_bits: 6
            })
        ));
    }

    #[test]
    fn test_extract_past_end_of_carrier() {
        let carrier = [1, 2, 3, MIN_SAMPLE, 4, 5];
        let result = extract(&carrier, 2, width(2));
        assert!(matches!(
            result,
            Err(StegoError::CarrierExhausted {
                requested: 2,
                recovered: 1
            })
        ));
    }

    #[test]
    fn test_extract_huge_byte_count() {
        // 4 个采样 x 2 位只能提供 1 个字节，超大请求不能触发分配
        for count in [usize::MAX, 1 << 40] {
            let result = extract(&[1, 2, 3, 4], count, width(2));
            assert!(matches!(
                result,
                Err(StegoError::CarrierExhausted { requested, recovered: 1 }) if requested == count
            ));
        }
    }

    #[test]
    fn test_capacity() {
        let carrier = [0, MIN_SAMPLE, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(usable_samples(&carrier), 8);
        assert_eq!(capacity_bytes(&carrier, width(2)), 2);
        assert_eq!(capacity_bytes(&carrier, width(3)), 3);
    }

    #[test]
    fn test_framed_roundtrip() {
        let mut rng = StdRng::seed_from_u64(3);
        let carrier = random_carrier(&mut rng, 2048);
        let w = width(3);
        let stego = embed_framed(&carrier, b"length prefixed", w).unwrap();
        assert_eq!(extract_framed(&stego, w).unwrap(), b"length prefixed");
    }

    #[test]
    fn test_framed_empty_payload() {
        let carrier: Vec<i16> = (1..=40).collect();
        let w = width(2);
        let stego = embed_framed(&carrier, &[], w).unwrap();
        assert!(extract_framed(&stego, w).unwrap().is_empty());
    }

    #[test]
    fn test_framed_carrier_too_small_for_prefix() {
        let carrier = [5_i16; 16];
        let result = extract_framed(&carrier, width(2));
        assert!(matches!(
            result,
            Err(StegoError::CarrierExhausted {
                requested: 8,
                recovered: 4
            })
        ));
    }

    #[test]
    fn test_framed_rejects_bogus_length() {
        // 所有采样低位全为 1，前缀被读成 u64::MAX
        let carrier = vec![0x7FFF_i16; 256];
        let result = extract_framed(&carrier, width(2));
        assert!(matches!(result, Err(StegoError::MalformedFrame { .. })));
    }
}
