//! 报告 HTML 模板
//!
//! 无头浏览器后端加载的离屏文档。样式沿用网页端的配色。

use std::fmt::Write;

use crate::models::{BlockContent, ComposedDocument, ContentBlock, HeaderMeta};
use crate::render::CanvasSpec;

const HEADING_STYLE: &str =
    "color: #2c3e50; border-bottom: 2px solid #667eea; padding-bottom: 10px;";
const TEXT_STYLE: &str = "line-height: 1.8; color: #34495e;";
const LIST_STYLE: &str = "line-height: 2; color: #34495e;";

/// 生成完整 HTML 文档
pub fn build_report_html(document: &ComposedDocument, canvas: &CanvasSpec) -> String {
    let mut body = String::new();
    write_header(&mut body, document.header());
    for block in document.sections() {
        write_section(&mut body, block);
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  html, body {{ margin: 0; padding: 0; background: white; }}
  #report {{ width: {width}px; padding: {padding}px; box-sizing: border-box; background: white;
             font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; }}
</style>
</head>
<body>
<div id="report">
{body}</div>
</body>
</html>
"#,
        width = canvas.width_px,
        padding = canvas.padding_px,
        body = body
    )
}

fn write_header(out: &mut String, meta: &HeaderMeta) {
    let _ = write!(
        out,
        r#"  <div style="text-align: center; margin-bottom: 30px;">
    <h1 style="color: #2c3e50; font-size: 32px; margin-bottom: 10px;">{title}</h1>
    <p style="color: #7f8c8d;">Generated on {date}</p>
  </div>
  <div style="text-align: center; margin: 40px 0;">
    <div style="font-size: 48px; font-weight: bold; color: {color};">{score}/100</div>
    <p style="color: #7f8c8d; font-size: 18px;">Feasibility Score</p>
  </div>
"#,
        title = escape_html(&meta.title),
        date = meta.generated_on(),
        color = meta.tone.color_hex(),
        score = meta.score,
    );
}

fn write_section(out: &mut String, block: &ContentBlock) {
    let _ = writeln!(out, r#"  <div style="margin-bottom: 30px;">"#);
    let _ = writeln!(
        out,
        r#"    <h2 style="{}">{}</h2>"#,
        HEADING_STYLE,
        escape_html(&block.title)
    );
    match &block.content {
        BlockContent::Paragraph(text) => {
            let _ = writeln!(out, r#"    <p style="{}">{}</p>"#, TEXT_STYLE, escape_html(text));
        }
        BlockContent::Items(items) => {
            let _ = write!(out, r#"    <ul style="{}">"#, LIST_STYLE);
            for item in items {
                let _ = write!(out, "<li>{}</li>", escape_html(item));
            }
            let _ = writeln!(out, "</ul>");
        }
        BlockContent::Header(_) => {}
    }
    let _ = writeln!(out, "  </div>");
}

/// 转义记录中的文本，避免上游内容被当作标记解释
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EvaluationRecord;
    use crate::services::document_composer::compose;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"R&D"</b> isn't"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt; isn&#39;t"
        );
    }

    #[test]
    fn test_html_contains_sections_in_order() {
        let record = EvaluationRecord::from_json(
            r#"{"feasibility_score": 45, "strengths": ["<script>x</script>", "b"]}"#,
        )
        .unwrap();
        let html = build_report_html(&compose(&record), &CanvasSpec::default());

        assert!(html.contains("width: 800px"));
        assert!(html.contains("#e74c3c"));
        assert!(html.contains("45/100"));
        assert!(html.contains("<li>&lt;script&gt;x&lt;/script&gt;</li><li>b</li>"));
        assert!(!html.contains("<script>"));

        let summary = html.find("Executive Summary").unwrap();
        let strengths = html.find("Strengths").unwrap();
        let finale = html.find("Final Recommendation").unwrap();
        assert!(summary < strengths && strengths < finale);
        assert!(html.contains("Innovation &amp; Uniqueness"));
    }
}
