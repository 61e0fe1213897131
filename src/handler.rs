//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::carrier::{read_carrier, read_payload, write_carrier, write_payload};
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::config::LsbWidth;
use crate::constants::LENGTH_PREFIX_BYTES;
use crate::steganography::{
    capacity_bytes, embed, embed_framed, extract, extract_framed, usable_samples,
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// 在 `source` 所在目录下生成 `<prefix><文件名><extension>` 形式的默认输出路径。
fn default_output(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "carrier".to_owned());
    source.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 未指定 `--force` 时拒绝覆盖已存在的输出文件。
///
/// 这里只是提前给出友好的提示；写入时 [`write_carrier`] 和 [`write_payload`] 会再次拒绝覆盖。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {} \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取音频和载荷文件、检查隐写空间是否足够、调用隐写核心函数隐藏载荷，
/// 最后将结果写入目标音频文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和位宽的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入的音频或载荷文件，或音频不是 16 位 PCM。
/// * 音频没有足够的空间来隐藏载荷。
/// * 无法写入到目标音频文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let width: LsbWidth = args.lsb.try_into()?;
    let dest = args
        .dest
        .unwrap_or_else(|| default_output(&args.audio, "doctored_", "wav"));
    ensure_writable(&dest, args.force)?;

    let carrier = read_carrier(&args.audio).with_context(|| {
        format!(
            "Unable to read audio file: {}",
            args.audio.to_string_lossy().red().bold()
        )
    })?;

    let payload = read_payload(&args.payload).with_context(|| {
        format!(
            "Unable to read payload file: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;

    let required = if args.framed {
        payload.len() + LENGTH_PREFIX_BYTES
    } else {
        payload.len()
    };
    let stego = if args.framed {
        embed_framed(&carrier.samples, &payload, width)
    } else {
        embed(&carrier.samples, &payload, width)
    }
    .with_context(|| {
        format!(
            "Not enough space in the audio to hide the payload. \nRequired: {} bytes, Available: {} bytes",
            required.to_string().red().bold(),
            capacity_bytes(&carrier.samples, width).to_string().green().bold()
        )
    })?;

    write_carrier(&dest, carrier.spec, &stego, args.force).with_context(|| {
        format!(
            "Unable to write to target audio file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The payload ({} bytes) has been successfully hidden and saved: {}",
        payload.len(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的音频文件、按指定字节数 (或长度前缀) 恢复载荷，
/// 最后将恢复的数据写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、字节数和位宽的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入的音频文件，或音频不是 16 位 PCM。
/// * 音频中的数据不足以恢复请求的字节数，或长度前缀无效。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let width: LsbWidth = args.lsb.try_into()?;
    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.audio, "recovered_", "bin"));
    ensure_writable(&output, args.force)?;

    let carrier = read_carrier(&args.audio).with_context(|| {
        format!(
            "Unable to read audio file: {}",
            args.audio.to_string_lossy().red().bold()
        )
    })?;

    let payload = match args.bytes {
        Some(count) => extract(&carrier.samples, count, width),
        None => extract_framed(&carrier.samples, width),
    }
    .with_context(|| {
        format!(
            "Failed to recover the payload from '{}'. \nThe audio may not contain a hidden payload, or the LSB width differs from the one used to hide it.",
            args.audio.to_string_lossy().red().bold()
        )
    })?;

    write_payload(&output, &payload, args.force).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The payload ({} bytes) has been successfully recovered and saved: {}",
        payload.len(),
        output.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 报告音频的采样数、可用采样数以及在给定位宽下可隐藏的字节数，并返回该字节数。
///
/// # Errors
///
/// 无法读取音频文件或音频不是 16 位 PCM 时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<u64> {
    let width: LsbWidth = args.lsb.try_into()?;
    let carrier = read_carrier(&args.audio).with_context(|| {
        format!(
            "Unable to read audio file: {}",
            args.audio.to_string_lossy().red().bold()
        )
    })?;

    let capacity = capacity_bytes(&carrier.samples, width);
    println!(
        "{}: {} frames, {} usable of {} samples, {} bytes at {} LSB(s) per sample",
        args.audio.to_string_lossy().bold(),
        carrier.frames(),
        usable_samples(&carrier.samples),
        carrier.samples.len(),
        capacity.to_string().green().bold(),
        width.bits()
    );
    Ok(capacity)
}
