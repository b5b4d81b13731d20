//! 纯 Rust 渲染
//!
//! 不依赖浏览器。使用 8x8 点阵字体逐字绘制，等宽折行，
//! 保证内容、顺序和高度正确，不追求排版精度。

use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::error::RenderError;
use crate::models::{BlockContent, ComposedDocument, ContentBlock, HeaderMeta};
use crate::render::{Bitmap, CanvasSpec, RenderTarget};

/// 单张位图允许的最大高度（设备像素）
const MAX_HEIGHT_PX: u32 = 400_000;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TITLE: Rgba<u8> = Rgba([0x2c, 0x3e, 0x50, 255]);
const MUTED: Rgba<u8> = Rgba([0x7f, 0x8c, 0x8d, 255]);
const BODY: Rgba<u8> = Rgba([0x34, 0x49, 0x5e, 255]);
const ACCENT: Rgba<u8> = Rgba([0x66, 0x7e, 0xea, 255]);

/// 一次填充
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FillRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    color: Rgba<u8>,
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
}

/// 文本样式（CSS 像素）
#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font_px: f32,
    line_height: f32,
    color: Rgba<u8>,
    align: Align,
}

impl TextStyle {
    const H1: TextStyle = TextStyle { font_px: 32.0, line_height: 1.2, color: TITLE, align: Align::Center };
    const SCORE: TextStyle = TextStyle { font_px: 48.0, line_height: 1.2, color: TITLE, align: Align::Center };
    const CAPTION: TextStyle = TextStyle { font_px: 16.0, line_height: 1.5, color: MUTED, align: Align::Center };
    const SCORE_CAPTION: TextStyle = TextStyle { font_px: 18.0, line_height: 1.5, color: MUTED, align: Align::Center };
    const H2: TextStyle = TextStyle { font_px: 24.0, line_height: 1.2, color: TITLE, align: Align::Left };
    const PARAGRAPH: TextStyle = TextStyle { font_px: 16.0, line_height: 1.8, color: BODY, align: Align::Left };
    const LIST_ITEM: TextStyle = TextStyle { font_px: 16.0, line_height: 2.0, color: BODY, align: Align::Left };

    fn with_color(mut self, color: Rgba<u8>) -> Self {
        self.color = color;
        self
    }
}

/// 布局游标，坐标均为设备像素
struct LayoutCursor {
    scale: f32,
    left: u32,
    width: u32,
    y: u32,
    ops: Vec<FillRect>,
}

impl LayoutCursor {
    fn px(&self, css: f32) -> u32 {
        (css * self.scale).round() as u32
    }

    fn advance(&mut self, css: f32) {
        self.y += self.px(css);
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        if w > 0 && h > 0 {
            self.ops.push(FillRect { x, y, w, h, color });
        }
    }

    /// 点阵单元边长（设备像素），字形宽高均为 8 个单元
    fn glyph_unit(&self, font_px: f32) -> u32 {
        ((font_px * self.scale) / 16.0).round().max(1.0) as u32
    }

    /// 折行绘制一段文本，返回行数
    fn text(&mut self, text: &str, style: TextStyle, indent_css: f32) -> usize {
        let indent = self.px(indent_css);
        let max_width = self.width.saturating_sub(indent);
        let unit = self.glyph_unit(style.font_px);
        let cell = unit * GLYPH_CELLS;
        let line_px = self.px(style.font_px * style.line_height).max(cell);

        let lines = wrap_words(text, max_width, cell as f32);
        for line in &lines {
            let line_width = line_width(line, cell as f32, cell);
            let start_x = match style.align {
                Align::Left => self.left + indent,
                Align::Center => self.left + indent + max_width.saturating_sub(line_width) / 2,
            };
            let glyph_top = self.y + (line_px - cell) / 2;
            let mut x = start_x;
            for word in line {
                for ch in word.chars() {
                    self.glyph(ch, x, glyph_top, unit, style.color);
                    x += cell;
                }
                x += cell;
            }
            self.y += line_px;
        }
        lines.len()
    }

    /// 绘制单个字形，字体中没有的字符画成 '?'
    fn glyph(&mut self, ch: char, x: u32, y: u32, unit: u32, color: Rgba<u8>) {
        let bitmap = lookup_glyph(ch);
        for (row, bits) in bitmap.iter().enumerate() {
            for col in 0..GLYPH_CELLS {
                if bits & (1 << col) != 0 {
                    self.fill(x + col * unit, y + row as u32 * unit, unit, unit, color);
                }
            }
        }
    }
}

/// 点阵字形的边长
const GLYPH_CELLS: u32 = 8;

fn lookup_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// 按可用宽度折行，超长单词按字符切开
fn wrap_words(text: &str, max_width: u32, advance: f32) -> Vec<Vec<String>> {
    let max_chars = ((max_width as f32 / advance).floor() as usize).max(1);
    let mut lines: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(max_chars) {
            let piece: String = chunk.iter().collect();
            let needed = if current.is_empty() { chunk.len() } else { current_chars + 1 + chunk.len() };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            current_chars = if current.is_empty() { chunk.len() } else { current_chars + 1 + chunk.len() };
            current.push(piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn line_width(line: &[String], advance: f32, space: u32) -> u32 {
    let glyphs: u32 = line
        .iter()
        .map(|w| (w.chars().count() as f32 * advance).round() as u32)
        .sum();
    glyphs + space * line.len().saturating_sub(1) as u32
}

/// 纯 Rust 渲染目标
#[derive(Debug, Clone)]
pub struct SoftwareRenderTarget {
    canvas: CanvasSpec,
}

impl SoftwareRenderTarget {
    pub fn new(canvas: CanvasSpec) -> Self {
        Self { canvas }
    }

    /// 计算布局，返回 (总高度, 填充操作)
    fn layout(&self, document: &ComposedDocument) -> Result<(u32, Vec<FillRect>), RenderError> {
        let scale = self.canvas.scale as f32;
        let padding = self.canvas.padding_px * self.canvas.scale;
        let device_width = self.canvas.device_width();
        let content_width = device_width.saturating_sub(padding * 2);
        if content_width == 0 {
            return Err(RenderError::Layout(format!(
                "画布宽度 {}px 不足以容纳内边距 {}px",
                self.canvas.width_px, self.canvas.padding_px
            )));
        }

        let mut cursor = LayoutCursor {
            scale,
            left: padding,
            width: content_width,
            y: padding,
            ops: Vec::new(),
        };

        layout_header(&mut cursor, document.header());
        for block in document.sections() {
            layout_section(&mut cursor, block);
        }

        let height = cursor.y + padding;
        if height > MAX_HEIGHT_PX {
            return Err(RenderError::Layout(format!(
                "文档高度 {}px 超出上限 {}px",
                height, MAX_HEIGHT_PX
            )));
        }
        Ok((height, cursor.ops))
    }
}

fn layout_header(cursor: &mut LayoutCursor, meta: &HeaderMeta) {
    cursor.text(&meta.title, TextStyle::H1, 0.0);
    cursor.advance(10.0);
    cursor.text(&format!("Generated on {}", meta.generated_on()), TextStyle::CAPTION, 0.0);
    cursor.advance(30.0 + 40.0);

    let [r, g, b] = meta.tone.rgb();
    cursor.text(
        &format!("{}/100", meta.score),
        TextStyle::SCORE.with_color(Rgba([r, g, b, 255])),
        0.0,
    );
    cursor.text("Feasibility Score", TextStyle::SCORE_CAPTION, 0.0);
    cursor.advance(40.0);
}

fn layout_section(cursor: &mut LayoutCursor, block: &ContentBlock) {
    cursor.text(&block.title, TextStyle::H2, 0.0);
    cursor.advance(10.0);
    let rule_h = cursor.px(2.0).max(1);
    let (left, y, width) = (cursor.left, cursor.y, cursor.width);
    cursor.fill(left, y, width, rule_h, ACCENT);
    cursor.y += rule_h;
    cursor.advance(16.0);

    match &block.content {
        BlockContent::Paragraph(text) => {
            cursor.text(text, TextStyle::PARAGRAPH, 0.0);
        }
        BlockContent::Items(items) => {
            for item in items {
                let bullet = cursor.px(6.0).max(1);
                let line_px = cursor.px(TextStyle::LIST_ITEM.font_px * TextStyle::LIST_ITEM.line_height);
                let (x, y) = (cursor.left + cursor.px(22.0), cursor.y + line_px.saturating_sub(bullet) / 2);
                cursor.fill(x, y, bullet, bullet, BODY);
                if cursor.text(item, TextStyle::LIST_ITEM, 40.0) == 0 {
                    cursor.y += line_px;
                }
            }
        }
        BlockContent::Header(_) => {}
    }
    cursor.advance(30.0);
}

impl RenderTarget for SoftwareRenderTarget {
    async fn render_document(&self, document: &ComposedDocument) -> Result<Bitmap, RenderError> {
        let (height, ops) = self.layout(document)?;
        let width = self.canvas.device_width();
        debug!("软件渲染: {}x{}, {} 个填充块", width, height, ops.len());

        let mut pixels = RgbaImage::from_pixel(width, height, WHITE);
        for op in ops {
            let x_end = (op.x + op.w).min(width);
            let y_end = (op.y + op.h).min(height);
            for y in op.y..y_end {
                for x in op.x..x_end {
                    pixels.put_pixel(x, y, op.color);
                }
            }
        }
        Bitmap::new(pixels)
    }

    fn name(&self) -> &'static str {
        "software"
    }
}
