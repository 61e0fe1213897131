//! # 载体读写
//!
//! 使用 `hound` 读写 16 位有符号整数 PCM 的 WAV 文件。
//! 多声道文件按文件中的交织顺序展开为一个采样序列，写回时保持相同的顺序和格式参数。

use crate::constants::SAMPLE_BITS;
use crate::error::{Result, StegoError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 解码后的载体：全部采样以及重新编码所需的格式参数。
#[derive(Debug, Clone, PartialEq)]
pub struct Carrier {
    pub spec: WavSpec,
    pub samples: Vec<i16>,
}

impl Carrier {
    /// 帧数 (每帧包含 `channels` 个采样)。
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.spec.channels.max(1))
    }
}

/// 读取 WAV 文件中的全部采样。
///
/// # Errors
///
/// * 文件不是 16 位整数 PCM 时返回 [`StegoError::MalformedCarrier`]。
/// * 读取失败时返回 [`StegoError::Io`]。
pub fn read_carrier(path: &Path) -> Result<Carrier> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != SAMPLE_BITS {
        return Err(StegoError::MalformedCarrier(format!(
            "expected {}-bit integer PCM, found {}-bit {:?}",
            SAMPLE_BITS, spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    info!(
        "decoded {} samples ({} channels, {} Hz) from {}",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        path.display()
    );

    Ok(Carrier { spec, samples })
}

/// 按给定格式参数把采样写入 `path`。
///
/// 先写入同目录下的临时文件，完成后再重命名到目标路径，失败时不会留下写了一半的文件。
/// `overwrite` 为 `false` 时，目标在重命名那一刻已存在就放弃写入。
///
/// # Errors
///
/// 写入或重命名失败 (包括拒绝覆盖) 时返回 [`StegoError::Io`]。
pub fn write_carrier(
    path: &Path,
    spec: WavSpec,
    samples: &[i16],
    overwrite: bool,
) -> Result<()> {
    let tmp = NamedTempFile::new_in(parent_dir(path))?;
    {
        let mut writer = WavWriter::new(BufWriter::new(tmp.as_file()), spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    persist(tmp, path, overwrite)?;
    debug!("wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// 以先写临时文件再重命名的方式写入提取出的载荷，`overwrite` 含义同 [`write_carrier`]。
///
/// # Errors
///
/// 写入或重命名失败 (包括拒绝覆盖) 时返回 [`StegoError::Io`]。
pub fn write_payload(path: &Path, payload: &[u8], overwrite: bool) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(payload)?;
    tmp.as_file().sync_all()?;
    persist(tmp, path, overwrite)
}

/// 读取要隐藏的载荷。
///
/// # Errors
///
/// 读取失败时返回 [`StegoError::Io`]。
pub fn read_payload(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

fn persist(tmp: NamedTempFile, path: &Path, overwrite: bool) -> Result<()> {
    let persisted = if overwrite {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    persisted.map_err(|e| e.error)?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
