//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{DEFAULT_LSB_WIDTH, MAX_LSB_WIDTH, MIN_LSB_WIDTH};
use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 16 位 PCM WAV 音频中隐藏或恢复任意数据。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 16 位 PCM WAV 音频中隐藏或恢复任意数据。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在 WAV 音频中隐藏文件内容。
    Hide(HideArgs),

    /// 从经过隐写的 WAV 音频中恢复隐藏的数据。
    Recover(RecoverArgs),

    /// 显示 WAV 音频在给定位宽下能隐藏的字节数。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入音频文件路径 (16 位 PCM WAV)。
    #[arg(short, long)]
    pub audio: PathBuf,

    /// 要隐藏的文件路径。
    #[arg(short, long)]
    pub payload: PathBuf,

    /// 隐写完成后，保存结果音频的输出路径。
    /// 省略时在输入音频旁生成 `doctored_<文件名>.wav`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个采样使用的最低有效位数量。
    #[arg(short, long, default_value_t = DEFAULT_LSB_WIDTH,
          value_parser = clap::value_parser!(u8).range(MIN_LSB_WIDTH as i64..=MAX_LSB_WIDTH as i64))]
    pub lsb: u8,

    /// 在载荷前写入 8 字节长度前缀，恢复时无需再指定字节数。
    #[arg(long)]
    pub framed: bool,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的音频文件路径。
    #[arg(short, long)]
    pub audio: PathBuf,

    /// 要恢复的字节数。省略时读取 `hide --framed` 写入的长度前缀。
    #[arg(short, long)]
    pub bytes: Option<usize>,

    /// 恢复数据后的保存路径。
    /// 省略时在输入音频旁生成 `recovered_<文件名>.bin`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 每个采样使用的最低有效位数量，必须与隐藏时一致。
    #[arg(short, long, default_value_t = DEFAULT_LSB_WIDTH,
          value_parser = clap::value_parser!(u8).range(MIN_LSB_WIDTH as i64..=MAX_LSB_WIDTH as i64))]
    pub lsb: u8,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的音频文件路径。
    #[arg(short, long)]
    pub audio: PathBuf,

    /// 每个采样使用的最低有效位数量。
    #[arg(short, long, default_value_t = DEFAULT_LSB_WIDTH,
          value_parser = clap::value_parser!(u8).range(MIN_LSB_WIDTH as i64..=MAX_LSB_WIDTH as i64))]
    pub lsb: u8,
}
