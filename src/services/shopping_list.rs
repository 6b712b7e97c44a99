//! Shopping-list aggregation and PDF rendering
//!
//! Lines are laid out top-down on A4 pages with a fixed line height. Every
//! page starts with a header; a page break happens once the next row would
//! cross the bottom margin. Lines wider than the text area wrap onto extra
//! rows, and the rows of one ingredient stay on the same page when they fit.
//! An empty cart renders a single header-only page.
//!
//! Text is set in an embedded DejaVu Sans so Cyrillic and other non-Latin
//! names survive; characters the font has no glyph for are rendered as `?`.

use std::sync::Arc;

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::{debug, warn};
use ttf_parser::Face;

use crate::errors::{FoodgramError, Result};
use crate::storage::{SeaOrmStorage, ShoppingListLine};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const HEADER_HEIGHT_MM: f32 = 16.0;
const LINE_HEIGHT_MM: f32 = 8.0;
const HEADER_FONT_SIZE: f32 = 16.0;
const LINE_FONT_SIZE: f32 = 12.0;
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const MM_PER_PT: f32 = 25.4 / 72.0;

const DOCUMENT_TITLE: &str = "Shopping list";
const MISSING_GLYPH: char = '?';

static FONT_DATA: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans.ttf"
));

/// 每页可容纳的行数
pub fn lines_per_page() -> usize {
    let usable = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM - HEADER_HEIGHT_MM;
    (usable / LINE_HEIGHT_MM).floor() as usize
}

/// 单行文本：`flour: 500g`
pub fn format_line(line: &ShoppingListLine) -> String {
    format!(
        "{}: {}{}",
        line.name, line.total_amount, line.measurement_unit
    )
}

/// 字体度量，用于替换缺失字形和计算排版宽度
pub struct FontMetrics<'a> {
    face: Face<'a>,
}

impl FontMetrics<'static> {
    pub fn embedded() -> Result<Self> {
        let face = Face::parse(FONT_DATA, 0)
            .map_err(|e| FoodgramError::document_render(format!("解析字体失败: {}", e)))?;
        Ok(Self { face })
    }
}

impl FontMetrics<'_> {
    /// 字体中没有的字符替换为 `?`，避免被静默丢弃
    pub fn sanitize(&self, text: &str) -> String {
        text.chars()
            .map(|ch| {
                if ch.is_whitespace() || self.face.glyph_index(ch).is_some() {
                    ch
                } else {
                    MISSING_GLYPH
                }
            })
            .collect()
    }

    /// 文本在给定字号下的宽度（毫米）
    pub fn width_mm(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .filter_map(|ch| self.face.glyph_index(ch))
            .filter_map(|gid| self.face.glyph_hor_advance(gid))
            .map(u32::from)
            .sum();
        units as f32 / f32::from(self.face.units_per_em()) * font_size * MM_PER_PT
    }
}

/// 按单词折行；单个单词超宽时按字符硬切
pub fn wrap_line<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        if measure(word) <= max_width {
            current = word.to_string();
            continue;
        }
        for ch in word.chars() {
            current.push(ch);
            if current.chars().count() > 1 && measure(&current) > max_width {
                current.pop();
                rows.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

/// 按页切分；每个 block 是一条清单的全部折行。空清单也返回一页
pub fn paginate(blocks: &[Vec<String>], per_page: usize) -> Vec<Vec<String>> {
    let per_page = per_page.max(1);
    let mut pages = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for block in blocks {
        // 放不下整条时换页，超过一页的 block 只能跨页
        if !current.is_empty() && current.len() + block.len() > per_page {
            pages.push(std::mem::take(&mut current));
        }
        for row in block {
            if current.len() == per_page {
                pages.push(std::mem::take(&mut current));
            }
            current.push(row.clone());
        }
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// 清单行 → 折行后的 blocks
pub fn layout_lines(lines: &[ShoppingListLine], metrics: &FontMetrics<'_>) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|line| {
            let raw = format_line(line);
            let text = metrics.sanitize(&raw);
            if text != raw {
                warn!("Ingredient '{}' has characters without a glyph", line.name);
            }
            wrap_line(&text, TEXT_WIDTH_MM, |row| {
                metrics.width_mm(row, LINE_FONT_SIZE)
            })
        })
        .collect()
}

fn draw_page(layer: &PdfLayerReference, header: &str, rows: &[String], font: &IndirectFontRef) {
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text(header, HEADER_FONT_SIZE, Mm(MARGIN_MM), Mm(y), font);
    y -= HEADER_HEIGHT_MM;

    for text in rows {
        layer.use_text(text.as_str(), LINE_FONT_SIZE, Mm(MARGIN_MM), Mm(y), font);
        y -= LINE_HEIGHT_MM;
    }
}

/// 渲染购物清单 PDF
pub fn render_pdf(lines: &[ShoppingListLine]) -> Result<Vec<u8>> {
    let metrics = FontMetrics::embedded()?;
    let pages = paginate(&layout_lines(lines, &metrics), lines_per_page());
    let total_pages = pages.len();

    let (doc, first_page, first_layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_external_font(FONT_DATA)
        .map_err(|e| FoodgramError::document_render(format!("加载字体失败: {}", e)))?;

    for (index, rows) in pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let header = if total_pages > 1 {
            format!("{} ({}/{})", DOCUMENT_TITLE, index + 1, total_pages)
        } else {
            DOCUMENT_TITLE.to_string()
        };
        let layer = doc.get_page(page).get_layer(layer);
        draw_page(&layer, &header, rows, &font);
    }

    doc.save_to_bytes()
        .map_err(|e| FoodgramError::document_render(format!("生成 PDF 失败: {}", e)))
}

pub struct ShoppingListService {
    storage: Arc<SeaOrmStorage>,
}

impl ShoppingListService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 聚合用户购物车中所有食谱的食材
    pub async fn aggregate(&self, user_id: i32) -> Result<Vec<ShoppingListLine>> {
        self.storage.shopping_list(user_id).await
    }

    pub async fn render_for_user(&self, user_id: i32) -> Result<Vec<u8>> {
        let lines = self.aggregate(user_id).await?;
        debug!(
            "Rendering shopping list for user {} ({} lines)",
            user_id,
            lines.len()
        );
        render_pdf(&lines)
    }
}
