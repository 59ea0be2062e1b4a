// Fixed A4 layout of an estimate, independent of the output format.
// Positions are in millimetres measured from the top-left corner.

use crate::estimate::Estimate;
use crate::pricing::format_amount;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;

const PT_TO_MM: f32 = 0.3528;
const LINE_SPACING: f32 = 1.4;

const QTY_COLUMN_MM: f32 = 140.0;
const DESCRIPTION_WRAP: usize = 80;

pub const TAGLINE: &str = "Professional Audio Engineering";
pub const DISCLAIMER: &str =
    "This estimate is for reference only and may change by mutual agreement before work begins.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Anchor x; meaning depends on `align`
    pub x_mm: f32,
    /// Baseline, from the top edge
    pub y_mm: f32,
    pub weight: Weight,
    pub align: Align,
}

impl TextRun {
    /// Left edge after alignment, using an average Helvetica glyph width
    pub fn left_mm(&self) -> f32 {
        let factor = match self.weight {
            Weight::Regular => 0.5,
            Weight::Bold => 0.55,
        };
        let width = self.text.chars().count() as f32 * self.size * factor * PT_TO_MM;
        match self.align {
            Align::Left => self.x_mm,
            Align::Center => self.x_mm - width / 2.0,
            Align::Right => self.x_mm - width,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn build(estimate: &Estimate) -> Self {
        let mut b = Builder::new();
        let right = PAGE_WIDTH_MM - MARGIN_MM;
        let center = PAGE_WIDTH_MM / 2.0;

        // Header
        b.advance(8.0);
        b.text(&estimate.brand, 24.0, center, Weight::Bold, Align::Center);
        b.text(TAGLINE, 9.0, center, Weight::Regular, Align::Center);
        b.rule();
        b.advance(6.0);

        b.text("ESTIMATE", 18.0, MARGIN_MM, Weight::Bold, Align::Left);
        b.row(&[
            (format!("Date: {}", estimate.display_date()), MARGIN_MM, Align::Left),
            (format!("Ref: {}", estimate.reference()), right, Align::Right),
        ], 9.0, Weight::Regular);
        b.advance(6.0);

        // Line-item table
        b.row(&[
            ("SERVICE".to_string(), MARGIN_MM, Align::Left),
            ("QTY".to_string(), QTY_COLUMN_MM, Align::Center),
            ("AMOUNT".to_string(), right, Align::Right),
        ], 10.0, Weight::Bold);
        b.rule();

        for line in &estimate.lines {
            let description: Vec<String> = line
                .description
                .lines()
                .flat_map(|l| wrap(l, DESCRIPTION_WRAP))
                .collect();
            b.keep_together(line_height(10.0) + description.len() as f32 * line_height(8.0) + 2.0);

            b.row(&[
                (line.name.clone(), MARGIN_MM, Align::Left),
                (line.quantity.to_string(), QTY_COLUMN_MM, Align::Center),
                (format!("KRW {}", format_amount(line.amount)), right, Align::Right),
            ], 10.0, Weight::Bold);
            for text in &description {
                b.text(text, 8.0, MARGIN_MM, Weight::Regular, Align::Left);
            }
            b.advance(2.0);
        }

        if let Some(commercial) = &estimate.commercial {
            b.keep_together(line_height(10.0) + line_height(8.0) + 2.0);
            b.row(&[
                (commercial.name.clone(), MARGIN_MM, Align::Left),
                (commercial.unit.clone(), QTY_COLUMN_MM, Align::Center),
                (format!("+KRW {}", format_amount(commercial.amount)), right, Align::Right),
            ], 10.0, Weight::Bold);
            for text in wrap(&commercial.description, DESCRIPTION_WRAP) {
                b.text(&text, 8.0, MARGIN_MM, Weight::Regular, Align::Left);
            }
            b.advance(2.0);
        }

        // Summary
        b.keep_together(line_height(10.0) + line_height(16.0) + line_height(7.0) + 12.0);
        b.rule();
        b.row(&[
            ("Total Tracks".to_string(), QTY_COLUMN_MM - 20.0, Align::Left),
            (format!("{} Tracks", estimate.totals.total_tracks), right, Align::Right),
        ], 10.0, Weight::Regular);
        b.advance(2.0);
        b.row(&[
            ("Total".to_string(), QTY_COLUMN_MM - 20.0, Align::Left),
            (format!("KRW {}", format_amount(estimate.totals.total)), right, Align::Right),
        ], 16.0, Weight::Bold);
        b.text("VAT included", 7.0, right, Weight::Regular, Align::Right);

        // Footer
        b.keep_together(line_height(7.0) * 2.0 + 10.0);
        b.advance(8.0);
        b.rule();
        b.text(DISCLAIMER, 7.0, center, Weight::Regular, Align::Center);
        b.text(
            &format!("(c) {} {}. All Rights Reserved.", estimate.generated_at.format("%Y"), estimate.brand),
            7.0,
            center,
            Weight::Regular,
            Align::Center,
        );

        b.finish()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

struct Builder {
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor: f32,
}

impl Builder {
    fn new() -> Self {
        Builder {
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: MARGIN_MM,
        }
    }

    fn advance(&mut self, mm: f32) {
        self.cursor += mm;
    }

    /// Start a new page unless `height` still fits on this one
    fn keep_together(&mut self, height: f32) {
        if self.cursor + height > PAGE_HEIGHT_MM - MARGIN_MM && !self.current.runs.is_empty() {
            let page = std::mem::take(&mut self.current);
            self.pages.push(page);
            self.cursor = MARGIN_MM;
        }
    }

    fn text(&mut self, text: &str, size: f32, x_mm: f32, weight: Weight, align: Align) {
        self.row(&[(text.to_string(), x_mm, align)], size, weight);
    }

    fn row(&mut self, cells: &[(String, f32, Align)], size: f32, weight: Weight) {
        let height = line_height(size);
        self.keep_together(height);
        self.cursor += height;
        for (text, x_mm, align) in cells {
            self.current.runs.push(TextRun {
                text: text.clone(),
                size,
                x_mm: *x_mm,
                y_mm: self.cursor,
                weight,
                align: *align,
            });
        }
    }

    fn rule(&mut self) {
        let width = ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / (6.0 * 0.5 * PT_TO_MM)) as usize;
        self.text(&"_".repeat(width), 6.0, MARGIN_MM, Weight::Regular, Align::Left);
        self.advance(1.5);
    }

    fn finish(mut self) -> DocumentLayout {
        if !self.current.runs.is_empty() {
            self.pages.push(self.current);
        }
        DocumentLayout { pages: self.pages }
    }
}

/// Greedy word wrap at `width` characters
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
