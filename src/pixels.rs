//! # 像素缓冲区模块
//!
//! 把解码后的图像展开为扁平的样本序列，供编解码核心按确定性扫描顺序
//! （行优先、逐列、逐通道）读写。alpha 通道若存在则原样保留，但不参与嵌入。
//! 图像文件与缓冲区之间的转换也在本模块完成，解码失败统一映射为
//! [`StegoError::UnsupportedImage`]。

use crate::constants::EMBEDDABLE_CHANNELS;
use crate::error::StegoError;
use image::{DynamicImage, RgbImage, RgbaImage};

/// 样本布局：每像素的通道数与 alpha 通道的有无。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// 每像素 3 个样本 (R, G, B)。
    Rgb8,
    /// 每像素 4 个样本 (R, G, B, A)；第 4 个样本不参与嵌入。
    Rgba8,
}

impl SampleLayout {
    /// 每像素的样本总数，含 alpha。
    pub fn samples_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// 一幅图像的全部样本，按行优先、逐列、逐通道的顺序排列。
///
/// 缓冲区由单次编码或解码操作独占，嵌入不会原地修改它，
/// 而是返回一个新的缓冲区（见 [`crate::steganography::embed`]）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: SampleLayout,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// 由原始样本构造缓冲区。
    ///
    /// 样本数必须恰好等于 `width * height * layout.samples_per_pixel()`，
    /// 否则返回 `None`。
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: SampleLayout,
        samples: Vec<u8>,
    ) -> Option<Self> {
        let expected = width as usize * height as usize * layout.samples_per_pixel();
        (samples.len() == expected).then(|| Self {
            width,
            height,
            layout,
            samples,
        })
    }

    /// 由解码完成的图像构造缓冲区。
    ///
    /// 不带 alpha 的输入统一转为 [`SampleLayout::Rgb8`]，带 alpha 的转为
    /// [`SampleLayout::Rgba8`]；16 位深度的输入按通道降为 8 位。
    pub fn from_image(image: &DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        if image.color().has_alpha() {
            Self {
                width,
                height,
                layout: SampleLayout::Rgba8,
                samples: image.to_rgba8().into_raw(),
            }
        } else {
            Self {
                width,
                height,
                layout: SampleLayout::Rgb8,
                samples: image.to_rgb8().into_raw(),
            }
        }
    }

    /// 解码图像文件的字节内容并构造缓冲区。
    ///
    /// # Errors
    ///
    /// 字节内容不是本工具支持的无损格式时返回
    /// [`StegoError::UnsupportedImage`]。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&image))
    }

    /// 把缓冲区还原为图像，通道布局与构造时完全一致。
    ///
    /// 每条构造路径都校验过样本数与尺寸的一致性，内部转换因此不会失败。
    pub fn into_image(self) -> DynamicImage {
        match self.layout {
            SampleLayout::Rgb8 => {
                let buffer = RgbImage::from_raw(self.width, self.height, self.samples)
                    .expect("sample count matches dimensions");
                DynamicImage::ImageRgb8(buffer)
            }
            SampleLayout::Rgba8 => {
                let buffer = RgbaImage::from_raw(self.width, self.height, self.samples)
                    .expect("sample count matches dimensions");
                DynamicImage::ImageRgba8(buffer)
            }
        }
    }

    /// 图像宽度（像素）。
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 图像高度（像素）。
    pub fn height(&self) -> u32 {
        self.height
    }

    /// 样本布局。
    pub fn layout(&self) -> SampleLayout {
        self.layout
    }

    /// 全部样本（含 alpha），按扫描顺序排列。
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// 可用于嵌入的样本数，即像素数乘以颜色通道数（不含 alpha）。
    pub fn usable_samples(&self) -> usize {
        let pixels = self.samples.len() / self.layout.samples_per_pixel();
        pixels * EMBEDDABLE_CHANNELS
    }

    /// 按扫描顺序遍历可嵌入样本的值，跳过 alpha。
    pub fn embeddable_samples(&self) -> impl Iterator<Item = u8> + '_ {
        self.samples
            .chunks_exact(self.layout.samples_per_pixel())
            .flat_map(|pixel| pixel.iter().take(EMBEDDABLE_CHANNELS).copied())
    }

    /// 按扫描顺序可变遍历可嵌入样本，跳过 alpha。仅编解码核心使用。
    pub(crate) fn embeddable_samples_mut(&mut self) -> impl Iterator<Item = &mut u8> + '_ {
        self.samples
            .chunks_exact_mut(self.layout.samples_per_pixel())
            .flat_map(|pixel| pixel.iter_mut().take(EMBEDDABLE_CHANNELS))
    }
}
