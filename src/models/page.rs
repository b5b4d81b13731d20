use std::ops::Range;
use std::str::FromStr;

use image::RgbaImage;
use serde::Deserialize;

use crate::error::ConfigError;

/// 每毫米的微米数
pub const UM_PER_MM: u64 = 1_000;
/// 每英寸的微米数
pub const UM_PER_INCH: u64 = 25_400;

/// 物理纸张尺寸，单位为微米，保证分页运算是精确整数运算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct PageSize {
    pub width_um: u64,
    pub height_um: u64,
}

impl PageSize {
    /// A4 纵向 210mm x 297mm
    pub const A4: PageSize = PageSize {
        width_um: 210 * UM_PER_MM,
        height_um: 297 * UM_PER_MM,
    };

    /// US Letter 215.9mm x 279.4mm
    pub const LETTER: PageSize = PageSize {
        width_um: 215_900,
        height_um: 279_400,
    };

    pub fn new(width_um: u64, height_um: u64) -> Self {
        Self {
            width_um,
            height_um,
        }
    }

    pub fn width_mm(&self) -> f64 {
        self.width_um as f64 / UM_PER_MM as f64
    }

    pub fn height_mm(&self) -> f64 {
        self.height_um as f64 / UM_PER_MM as f64
    }

    /// PDF 用户空间单位（1/72 英寸）
    pub fn width_pt(&self) -> f64 {
        um_to_pt(self.width_um)
    }

    pub fn height_pt(&self) -> f64 {
        um_to_pt(self.height_um)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

impl FromStr for PageSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::LETTER),
            other => Err(ConfigError::UnknownValue {
                field: "page_size",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PageSize {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 微米转 PDF 点
pub fn um_to_pt(um: u64) -> f64 {
    um as f64 * 72.0 / UM_PER_INCH as f64
}

/// 分页输出的一页
#[derive(Debug, Clone)]
pub struct Page {
    /// 从 0 开始的页序号
    pub index: usize,
    /// 本页暴露的源像素行，页面剩余部分留白
    pub slice: RgbaImage,
    /// 整幅缩放图像相对本页顶部的上移距离（微米），恒为 index * P
    pub offset_um: u64,
    /// 本页窗口对应的源位图行区间
    pub source_rows: Range<u32>,
}

impl Page {
    /// 本页真实内容在纸面上的高度（微米）
    pub fn content_height_um(&self, page_width_um: u64) -> u64 {
        if self.slice.width() == 0 {
            return 0;
        }
        self.slice.height() as u64 * page_width_um / self.slice.width() as u64
    }
}
