//! # 容量规划模块
//!
//! 根据图像的可嵌入样本数计算其能承载的最大载荷。encode 路径在改动任何
//! 像素之前先用这里的函数做预校验，避免产生被截断的半成品嵌入。
//! 所有函数都是纯函数，没有错误分支。

use crate::constants::{BITS_PER_BYTE, LENGTH_FIELD_BITS};

/// 计算 `sample_count` 个可嵌入样本最多能承载的载荷字节数。
///
/// 每个样本承载 1 bit，且 32 位长度字段先于载荷嵌入，
/// 因此结果为 `(sample_count - 32) / 8` 向下取整；样本数不足 32 时容量为 0。
///
/// # Examples
///
/// ```
/// use lsb_veil::capacity::max_payload_bytes;
///
/// assert_eq!(max_payload_bytes(32), 0);
/// assert_eq!(max_payload_bytes(40), 1);
/// assert_eq!(max_payload_bytes(192), 20);
/// ```
pub fn max_payload_bytes(sample_count: usize) -> usize {
    sample_count.saturating_sub(LENGTH_FIELD_BITS) / BITS_PER_BYTE
}

/// 计算嵌入 `payload_len` 字节载荷所需的总位数，含 32 位长度字段。
///
/// 与 [`max_payload_bytes`] 互为对偶：当且仅当
/// `required_bits(len) <= sample_count` 时，长度为 `len` 的载荷才放得下。
/// 结果在 u64 中计算，长度乘 8 即便在 32 位平台上也不会回绕。
pub fn required_bits(payload_len: usize) -> u64 {
    LENGTH_FIELD_BITS as u64 + payload_len as u64 * BITS_PER_BYTE as u64
}
