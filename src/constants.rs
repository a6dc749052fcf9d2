/// 帧头中长度字段所占的位数。
/// 载荷长度以 32 位大端无符号整数嵌入扫描顺序中的前 32 个样本。
pub const LENGTH_FIELD_BITS: usize = 32;

/// 每个载荷字节占用的位数。
/// 每个可嵌入样本的最低有效位承载 1 bit，因此一个字节消耗 8 个样本。
pub const BITS_PER_BYTE: usize = 8;

/// 每个像素参与嵌入的通道数。
/// 无论像素是否带有 alpha 通道，只有 R、G、B 三个颜色通道参与扫描。
pub const EMBEDDABLE_CHANNELS: usize = 3;

/// `encode` 未指定输出路径时，默认输出文件名的前缀。
pub const ENCODED_PREFIX: &str = "encoded_";

/// `decode` 未指定输出路径时，默认输出文件名的前缀。
pub const DECODED_PREFIX: &str = "decoded_";
