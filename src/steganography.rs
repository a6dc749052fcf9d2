//! # LSB 隐写编解码核心
//!
//! 帧格式为 `[32 位大端载荷长度][载荷字节]`，按字节内高位在前的顺序逐位
//! 展开，每个可嵌入样本的最低有效位承载 1 bit。嵌入与提取共享
//! [`PixelBuffer`] 的扫描顺序，这一对应关系是编解码正确性的全部前提。
//! 两个操作都是无状态的纯变换：不做 I/O，不产生日志，出错时输入保持原样。

use crate::capacity::required_bits;
use crate::constants::{BITS_PER_BYTE, LENGTH_FIELD_BITS};
use crate::error::StegoError;
use crate::pixels::PixelBuffer;

/// 构造帧：4 字节大端长度前缀加载荷本身。
fn build_frame(payload: &[u8], payload_len: u32) -> Vec<u8> {
    let mut frame = Vec::with_capacity(LENGTH_FIELD_BITS / BITS_PER_BYTE + payload.len());
    frame.extend_from_slice(&payload_len.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// 把帧展开为位序列，字节内高位在前。
fn frame_bits(frame: &[u8]) -> impl Iterator<Item = u8> + '_ {
    frame
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1))
}

/// 把载荷嵌入像素缓冲区，返回嵌入后的新缓冲区。
///
/// 输入缓冲区不会被修改；输出与输入的尺寸、通道布局完全一致，
/// 帧位之外的样本保持逐位相同，被写入的样本也只有最低有效位会变化。
///
/// # Errors
///
/// 载荷的帧放不进缓冲区时返回 [`StegoError::CapacityExceeded`]，
/// 此时不会发生任何部分嵌入，消息也绝不会被截断。
pub fn embed(pixels: &PixelBuffer, payload: &[u8]) -> Result<PixelBuffer, StegoError> {
    let available_bits = pixels.usable_samples() as u64;
    // 帧位数与 extract 的合理性校验一样在 u64 中计算，32 位平台上不会回绕。
    let needed_bits = required_bits(payload.len());
    let capacity_error = StegoError::CapacityExceeded {
        needed_bits,
        available_bits,
    };

    // 长度字段为 u32，超出其表示范围的载荷在任何图像中都放不下。
    let Ok(payload_len) = u32::try_from(payload.len()) else {
        return Err(capacity_error);
    };
    // 按位比较而非按字节：样本数不足 32 时，连空载荷的帧也放不下。
    if needed_bits > available_bits {
        return Err(capacity_error);
    }

    let frame = build_frame(payload, payload_len);
    let mut encoded = pixels.clone();
    for (sample, bit) in encoded.embeddable_samples_mut().zip(frame_bits(&frame)) {
        *sample = (*sample & 0xFE) | bit;
    }

    Ok(encoded)
}

/// 从像素缓冲区中提取隐藏的载荷。
///
/// 先按嵌入时的扫描顺序读出 32 位长度 `L` 并校验其合理性，
/// 再读出后续 `L * 8` 位重组为字节。结果要么是完整的载荷，
/// 要么是一个错误，不存在截断或掺杂垃圾数据的中间态。
///
/// # Errors
///
/// 长度前缀与缓冲区容量不一致时返回 [`StegoError::NoHiddenMessage`]。
/// 这通常意味着图像从未经过本工具编码，或编码后被有损压缩、缩放过。
/// 长度为 0 是合法的：此时返回空载荷而非错误。
pub fn extract(pixels: &PixelBuffer) -> Result<Vec<u8>, StegoError> {
    let usable = pixels.usable_samples();
    let mut bits = pixels.embeddable_samples().map(|sample| sample & 1);

    let mut declared_len: u32 = 0;
    for _ in 0..LENGTH_FIELD_BITS {
        let bit = bits.next().ok_or(StegoError::NoHiddenMessage)?;
        declared_len = (declared_len << 1) | u32::from(bit);
    }

    // 合理性校验在 u64 中进行，避免 32 位平台上 L * 8 的乘法回绕。
    let needed_bits = LENGTH_FIELD_BITS as u64 + u64::from(declared_len) * BITS_PER_BYTE as u64;
    if needed_bits > usable as u64 {
        return Err(StegoError::NoHiddenMessage);
    }
    let payload_len = declared_len as usize;

    let mut payload = Vec::with_capacity(payload_len);
    for _ in 0..payload_len {
        let mut byte = 0u8;
        for _ in 0..BITS_PER_BYTE {
            let bit = bits.next().ok_or(StegoError::NoHiddenMessage)?;
            byte = (byte << 1) | bit;
        }
        payload.push(byte);
    }

    Ok(payload)
}
