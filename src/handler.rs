//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心编解码算法以及向用户报告结果。

use crate::capacity::max_payload_bytes;
use crate::cli::{DecodeArgs, EncodeArgs};
use crate::constants::{DECODED_PREFIX, ENCODED_PREFIX};
use crate::pixels::PixelBuffer;
use crate::steganography::{embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责读取封面图像与消息内容、在改动任何像素之前检查嵌入空间是否足够、
/// 调用编码核心生成新图像，最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与消息来源的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或消息文件。
/// * 图像无法以无损像素格式解码。
/// * 图像没有足够的空间来嵌入消息。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法写入目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let message = read_message(&args)?;

    let cover_bytes = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let pixels = PixelBuffer::from_bytes(&cover_bytes).with_context(|| {
        format!(
            "Unable to decode image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let required_space = message.len();
    let available_space = max_payload_bytes(pixels.usable_samples());

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the message. \nRequired: {} bytes, Available: {} bytes",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    let encoded = embed(&pixels, &message).with_context(|| {
        "Failed to embed the message into the image. \nThe cover image may be too small for the message."
    })?;

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_sibling(&args.image, ENCODED_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    encoded.into_image().save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过编码的图像文件、调用提取核心恢复隐藏的消息，
/// 最后将消息内容原样写入目标文件。提取失败绝不会被伪装成空消息。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像文件。
/// * 图像中没有可信的隐藏消息（从未编码过，或编码后被改动）。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法写入目标文件。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    let image_bytes = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let pixels = PixelBuffer::from_bytes(&image_bytes).with_context(|| {
        format!(
            "Unable to decode image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let message = extract(&pixels).with_context(|| {
        format!(
            "Failed to recover a message from '{}'. \nThe image may not contain a hidden message or was altered since encoding.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_sibling(&args.image, DECODED_PREFIX, "txt"));
    ensure_writable(&output, args.force)?;

    fs::write(&output, &message).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully recovered and saved: {}",
        output.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 取得要嵌入的消息字节：优先使用命令行内联文本，否则读取消息文件。
fn read_message(args: &EncodeArgs) -> Result<Vec<u8>> {
    match (&args.message, &args.text) {
        (Some(message), _) => Ok(message.clone().into_bytes()),
        (None, Some(path)) => fs::read(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        }),
        (None, None) => anyhow::bail!("No message provided. Use --message or --text."),
    }
}

/// 基于输入路径，在同一目录下生成带前缀的默认输出文件名。
fn default_sibling(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("output"));
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 目标文件已存在且未指定 `--force` 时拒绝写入。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {} \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}
