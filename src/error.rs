//! # 错误类型模块
//!
//! 定义隐写编解码全流程共用的错误类型。核心算法不打印、不记录日志，
//! 所有失败都以 [`StegoError`] 的形式返回给调用方，由上层决定如何呈现。

use core::fmt;

/// 编码或解码隐藏消息时可能出现的错误。
#[derive(Debug)]
pub enum StegoError {
    /// 消息对于给定封面图像而言过大。携带所需与可用的位数，便于调用方提示用户。
    /// 位数以 u64 计量：在 32 位平台上，大载荷的位数可能超出 usize 的表示范围。
    CapacityExceeded {
        /// 嵌入整个帧（32 位长度字段 + 载荷）所需的位数。
        needed_bits: u64,
        /// 图像中可用于嵌入的样本数（每个样本承载 1 bit）。
        available_bits: u64,
    },
    /// 提取到的长度前缀与图像容量不一致。
    /// 最常见的原因是图像从未经过本工具编码，或编码后被有损压缩、缩放过。
    NoHiddenMessage,
    /// 图像文件无法以无损、可逐样本访问的像素格式解码或编码。
    UnsupportedImage(image::ImageError),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                needed_bits,
                available_bits,
            } => write!(
                f,
                "message too large for this image: {needed_bits} bits needed, {available_bits} available"
            ),
            Self::NoHiddenMessage => {
                write!(f, "no hidden message found (image was never encoded, or was altered since encoding)")
            }
            Self::UnsupportedImage(e) => write!(f, "unsupported image: {e}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedImage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for StegoError {
    fn from(e: image::ImageError) -> Self {
        Self::UnsupportedImage(e)
    }
}
