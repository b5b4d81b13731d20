//! 分页 - 业务能力层
//!
//! 把一张任意高度的位图切成固定纸张大小的页序列。
//!
//! 缩放后总高 `H = height_px * W / width_px`，页高 `P`：
//! - 页数 `ceil(H / P)`，至少 1 页；`H` 恰为 `P` 的整数倍时不追加空白尾页
//! - 第 i 页偏移 `i * P`
//! - 第 i 页窗口对应源行 `[floor(i*P*w/W), floor((i+1)*P*w/W))`，截断到位图高度
//!
//! 全部使用 u128 整数运算，不存在浮点累积误差。

use std::ops::Range;

use image::imageops;
use tracing::debug;

use crate::models::{Page, PageSize};
use crate::render::Bitmap;

/// 单页窗口（不含像素）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub index: usize,
    pub offset_um: u64,
    pub source_rows: Range<u32>,
}

/// 分页计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationPlan {
    pub page_size: PageSize,
    /// 缩放到纸宽后的总高度（微米，向上取整）
    pub scaled_height_um: u64,
    pub windows: Vec<PageWindow>,
}

impl PaginationPlan {
    pub fn page_count(&self) -> usize {
        self.windows.len()
    }

    pub fn offsets_um(&self) -> Vec<u64> {
        self.windows.iter().map(|w| w.offset_um).collect()
    }
}

/// 计算分页计划
///
/// 位图宽高为零时返回空计划；`Bitmap` 的构造已排除这种情况。
pub fn pagination_plan(width_px: u32, height_px: u32, page_size: PageSize) -> PaginationPlan {
    let w = width_px as u128;
    let h = height_px as u128;
    let page_w = page_size.width_um as u128;
    let page_h = page_size.height_um as u128;

    if w == 0 || h == 0 || page_w == 0 || page_h == 0 {
        return PaginationPlan {
            page_size,
            scaled_height_um: 0,
            windows: Vec::new(),
        };
    }

    let scaled_height_um = div_ceil(h * page_w, w) as u64;
    let page_count = div_ceil(h * page_w, w * page_h).max(1) as usize;

    let row_start = |i: u128| -> u32 { ((i * page_h * w) / page_w).min(h) as u32 };

    let windows = (0..page_count)
        .map(|i| {
            let n = i as u128;
            PageWindow {
                index: i,
                offset_um: (n * page_h) as u64,
                source_rows: row_start(n)..row_start(n + 1),
            }
        })
        .collect();

    PaginationPlan {
        page_size,
        scaled_height_um,
        windows,
    }
}

/// 按计划切片
pub fn paginate(bitmap: &Bitmap, page_size: PageSize) -> Vec<Page> {
    let plan = pagination_plan(bitmap.width(), bitmap.height(), page_size);
    debug!(
        "分页: 位图 {}x{} → 缩放高度 {}µm, 页高 {}µm, 共 {} 页",
        bitmap.width(),
        bitmap.height(),
        plan.scaled_height_um,
        page_size.height_um,
        plan.page_count()
    );

    plan.windows
        .into_iter()
        .map(|window| {
            let rows = window.source_rows.clone();
            let slice = imageops::crop_imm(
                bitmap.pixels(),
                0,
                rows.start,
                bitmap.width(),
                rows.end - rows.start,
            )
            .to_image();
            Page {
                index: window.index,
                slice,
                offset_um: window.offset_um,
                source_rows: rows,
            }
        })
        .collect()
}

fn div_ceil(a: u128, b: u128) -> u128 {
    (a + b - 1) / b
}
