//! # wav_hide 库
//!
//! 本库包含音频 LSB 隐写工具的核心逻辑。

// 声明库包含的所有模块。

pub mod bitstream;
pub mod carrier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod handler;
pub mod steganography;

pub use config::LsbWidth;
pub use error::{Result, StegoError};
