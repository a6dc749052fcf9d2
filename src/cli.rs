//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中嵌入或提取文本消息。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中嵌入或提取文本消息。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (嵌入) 和 decode (提取)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将文本消息嵌入无损格式图像 (如 PNG, BMP) 中。
    Encode(EncodeArgs),

    /// 从经过编码的图像中提取隐藏的消息。
    Decode(DecodeArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用作封面的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 直接在命令行中给出的消息文本。
    #[arg(short, long, conflicts_with = "text")]
    pub message: Option<String>,

    /// 包含消息内容的文件路径。
    #[arg(short, long, required_unless_present = "message")]
    pub text: Option<PathBuf>,

    /// 嵌入完成后，保存结果图像的输出路径；缺省为封面同目录下的 encoded_<文件名>.png。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 已嵌入消息的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 提取出的消息的保存路径；缺省为图像同目录下的 decoded_<文件名>.txt。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}
