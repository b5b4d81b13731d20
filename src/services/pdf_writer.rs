//! PDF 组装 - 业务能力层
//!
//! 按页序把分页结果写成 PDF：每页一个 FlateDecode 的 RGB 图像 XObject，
//! 顶端对齐、宽度铺满纸宽，剩余部分留白。

use std::io::Write;

use chrono::{DateTime, Datelike, Local, Timelike};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use tracing::debug;

use crate::error::WriteError;
use crate::models::page::um_to_pt;
use crate::models::{Page, PageSize, REPORT_TITLE};

const PRODUCER: &str = "startup_report";

/// PDF 组装器
#[derive(Debug, Clone)]
pub struct PdfWriter {
    page_size: PageSize,
    title: String,
    created_at: DateTime<Local>,
}

/// 单页使用的对象编号
struct PageRefs {
    page: Ref,
    content: Ref,
    image: Ref,
}

impl PdfWriter {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            title: REPORT_TITLE.to_string(),
            created_at: Local::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Local>) -> Self {
        self.created_at = created_at;
        self
    }

    /// 编码为 PDF 字节
    pub fn encode(&self, pages: &[Page]) -> Result<Vec<u8>, WriteError> {
        if pages.is_empty() {
            return Err(WriteError::Encode("没有可写入的页面".to_string()));
        }

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let info_id = Ref::new(3);
        let mut next_id = 4;
        let refs: Vec<PageRefs> = pages
            .iter()
            .map(|_| {
                let base = next_id;
                next_id += 3;
                PageRefs {
                    page: Ref::new(base),
                    content: Ref::new(base + 1),
                    image: Ref::new(base + 2),
                }
            })
            .collect();

        let page_w = um_to_pt(self.page_size.width_um) as f32;
        let page_h = um_to_pt(self.page_size.height_um) as f32;

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(refs.iter().map(|r| r.page))
            .count(pages.len() as i32);
        pdf.document_info(info_id)
            .title(TextStr(&self.title))
            .producer(TextStr(PRODUCER))
            .creation_date(pdf_date(&self.created_at));

        for (page, ids) in pages.iter().zip(&refs) {
            let image_name = format!("Im{}", page.index);
            let image_name = Name(image_name.as_bytes());

            let mut pdf_page = pdf.page(ids.page);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, page_w, page_h))
                .parent(page_tree_id)
                .contents(ids.content);
            let mut resources = pdf_page.resources();
            resources.x_objects().pair(image_name, ids.image);
            resources.finish();
            pdf_page.finish();

            let mut content = Content::new();
            if page.slice.height() > 0 {
                let drawn_h = um_to_pt(page.content_height_um(self.page_size.width_um)) as f32;
                content.save_state();
                content.transform([page_w, 0.0, 0.0, drawn_h, 0.0, page_h - drawn_h]);
                content.x_object(image_name);
                content.restore_state();
            }
            pdf.stream(ids.content, &content.finish());

            let compressed = flate_compress(&flatten_to_rgb(&page.slice))?;
            let mut image = pdf.image_xobject(ids.image, &compressed);
            image.filter(Filter::FlateDecode);
            image.width(page.slice.width().max(1) as i32);
            image.height(page.slice.height().max(1) as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.finish();
        }

        let bytes = pdf.finish();
        debug!("PDF 编码完成: {} 页, {} 字节", pages.len(), bytes.len());
        Ok(bytes)
    }
}

fn pdf_date(at: &DateTime<Local>) -> Date {
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second().min(59) as u8)
}

/// RGBA 合成到白底后丢弃 alpha
fn flatten_to_rgb(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((image.width() * image.height().max(1) * 3) as usize);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let blend = |c: u8| -> u8 {
            ((c as u16 * a as u16 + 255 * (255 - a as u16)) / 255) as u8
        };
        rgb.extend_from_slice(&[blend(r), blend(g), blend(b)]);
    }
    if rgb.is_empty() {
        // 零高度切片仍需一个合法的 1 行白色图像
        rgb.resize((image.width().max(1) * 3) as usize, 255);
    }
    rgb
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, WriteError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| WriteError::Encode(e.to_string()))?;
    encoder.finish().map_err(|e| WriteError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use chrono::TimeZone;
    use flate2::read::ZlibDecoder;
    use image::Rgba;

    use crate::render::Bitmap;
    use crate::services::paginator::paginate;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_one_pdf_page_per_paginated_page() {
        let bitmap = Bitmap::new(RgbaImage::from_pixel(1600, 5000, Rgba([10, 20, 30, 255]))).unwrap();
        let pages = paginate(&bitmap, PageSize::A4);
        assert_eq!(pages.len(), 3);

        let pdf = PdfWriter::new(PageSize::A4).encode(&pages).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(count(&pdf, b"%%EOF"), 1);
        assert_eq!(count(&pdf, b"/Subtype /Image"), 3);
        assert_eq!(count(&pdf, b"/FlateDecode"), 3);
        assert_eq!(count(&pdf, b"/DeviceRGB"), 3);
        assert_eq!(count(&pdf, b"/Count 3"), 1);
        assert_eq!(count(&pdf, b"/Im0"), 2);
        assert_eq!(count(&pdf, b"/Im2"), 2);
    }

    #[test]
    fn test_document_info() {
        let created_at = Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let pdf = PdfWriter::new(PageSize::LETTER)
            .with_title("Farm pilot report")
            .with_created_at(created_at)
            .encode(&paginate(
                &Bitmap::new(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]))).unwrap(),
                PageSize::LETTER,
            ))
            .unwrap();

        assert_eq!(count(&pdf, b"/Producer (startup_report)"), 1);
        assert_eq!(count(&pdf, b"(Farm pilot report)"), 1);
        assert_eq!(count(&pdf, b"D:20260314092653"), 1);
    }

    #[test]
    fn test_image_stream_holds_page_pixels() {
        let bitmap = Bitmap::new(RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255]))).unwrap();
        let pages = paginate(&bitmap, PageSize::A4);
        let rgb = flatten_to_rgb(&pages[0].slice);
        assert_eq!(rgb, [1, 2, 3].repeat(8));

        let mut inflated = Vec::new();
        ZlibDecoder::new(flate_compress(&rgb).unwrap().as_slice())
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, rgb);
    }

    #[test]
    fn test_empty_pages_rejected() {
        assert!(matches!(
            PdfWriter::new(PageSize::A4).encode(&[]),
            Err(WriteError::Encode(_))
        ));
    }

    #[test]
    fn test_flatten_transparent_to_white() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        assert_eq!(flatten_to_rgb(&img), vec![255, 255, 255]);
    }
}
