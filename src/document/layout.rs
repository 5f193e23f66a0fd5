//! Page layout of an order document
//!
//! Produces a [`DocumentLayout`]: every text run and rule of every page,
//! positioned in millimetres from the top-left corner. The PDF writer only
//! draws what is here, so tests inspect the visible content through this
//! model instead of parsing PDF bytes.
//!
//! The line-item table paginates: when rows no longer fit above the bottom
//! margin the table continues on a new page under a repeated header row.
//! Every line becomes exactly one row.

use crate::config::DocumentConfig;
use crate::document::CustomerIdentity;
use crate::document::format::{CurrencyFormat, format_discount};
use crate::pricing::NormalizedOrderLine;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MARGIN_X: f32 = 15.0;
const TITLE_Y: f32 = 20.0;
const FIRST_TABLE_TOP: f32 = 75.0;
const CONTINUED_TABLE_TOP: f32 = 20.0;
const HEADER_ROW_HEIGHT: f32 = 8.0;
const BODY_ROW_HEIGHT: f32 = 7.0;
const TABLE_BOTTOM_GAP: f32 = 30.0;
const CAPTION_GAP: f32 = 20.0;
const PAGE_NUMBER_GAP: f32 = 10.0;
const CELL_PADDING: f32 = 2.0;

const TITLE_SIZE: f32 = 16.0;
const BLOCK_SIZE: f32 = 12.0;
const TABLE_HEADER_SIZE: f32 = 9.0;
const TABLE_BODY_SIZE: f32 = 9.0;
const PAGE_NUMBER_SIZE: f32 = 8.0;

const PT_TO_MM: f32 = 0.352_778;

/// Paper size of generated documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in millimetres
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

/// A positioned piece of text; `x` is the left edge, `y` the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
}

/// A straight stroked line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Content of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub texts: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

/// Every page of a rendered order document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs in drawing order
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|page| page.texts.iter())
    }

    /// Visible text, one run per line
    pub fn visible_text(&self) -> String {
        self.text_runs()
            .map(|run| run.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of runs whose text is exactly `text`
    pub fn count_runs(&self, text: &str) -> usize {
        self.text_runs().filter(|run| run.text == text).count()
    }
}

struct Column {
    label: &'static str,
    width: f32,
    align: Align,
    /// Shorten overflowing cells; other cells are drawn in full
    clip: bool,
}

const COLUMNS: [Column; 8] = [
    Column { label: "Stock Code", width: 24.0, align: Align::Left, clip: false },
    Column { label: "Product Name", width: 46.0, align: Align::Left, clip: true },
    Column { label: "Boxes", width: 14.0, align: Align::Right, clip: false },
    Column { label: "Units", width: 14.0, align: Align::Right, clip: false },
    Column { label: "Total Qty", width: 18.0, align: Align::Right, clip: false },
    Column { label: "Price", width: 22.0, align: Align::Right, clip: false },
    Column { label: "Discount", width: 18.0, align: Align::Right, clip: false },
    Column { label: "Total", width: 24.0, align: Align::Right, clip: false },
];

/// What goes on the document
pub struct LayoutInput<'a> {
    pub customer: &'a CustomerIdentity,
    pub lines: &'a [NormalizedOrderLine],
    pub order_number: &'a str,
    pub issued_on: NaiveDate,
    pub total: Decimal,
}

/// Lay out an order document
pub fn layout_order(
    currency: &CurrencyFormat,
    settings: &DocumentConfig,
    input: &LayoutInput<'_>,
) -> DocumentLayout {
    let (width, height) = settings.page_size.dimensions_mm();
    let mut builder = PageBuilder::new(width, height);

    builder.header_block(settings, input);
    builder.table(currency, input.lines, input.total);
    builder.closing_caption(&settings.closing_caption);
    builder.page_numbers();

    DocumentLayout {
        width,
        height,
        pages: builder.pages,
    }
}

struct PageBuilder {
    width: f32,
    height: f32,
    pages: Vec<PageLayout>,
}

impl PageBuilder {
    fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: vec![PageLayout::default()],
        }
    }

    fn current(&mut self) -> &mut PageLayout {
        if self.pages.is_empty() {
            self.pages.push(PageLayout::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
    }

    fn table_bottom(&self) -> f32 {
        self.height - TABLE_BOTTOM_GAP
    }

    /// Place text shortened to fit between `left` and `right`
    #[allow(clippy::too_many_arguments)]
    fn text(&mut self, text: &str, left: f32, right: f32, y: f32, size: f32, weight: FontWeight, align: Align) {
        let text = fit_text(&printable(text), size, weight, (right - left).max(0.0));
        self.place(text, left, right, y, size, weight, align);
    }

    /// Place text in full, overflowing its box if needed
    #[allow(clippy::too_many_arguments)]
    fn full_text(&mut self, text: &str, left: f32, right: f32, y: f32, size: f32, weight: FontWeight, align: Align) {
        self.place(printable(text), left, right, y, size, weight, align);
    }

    #[allow(clippy::too_many_arguments)]
    fn place(&mut self, text: String, left: f32, right: f32, y: f32, size: f32, weight: FontWeight, align: Align) {
        let width = text_width(&text, size, weight);
        let x = match align {
            Align::Left => left,
            Align::Center => left + ((right - left) - width) / 2.0,
            Align::Right => right - width,
        };
        self.current().texts.push(TextRun {
            text,
            x,
            y,
            size,
            weight,
        });
    }

    fn rule(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.current().rules.push(Rule { x1, y1, x2, y2 });
    }

    fn header_block(&mut self, settings: &DocumentConfig, input: &LayoutInput<'_>) {
        let left = MARGIN_X;
        let right = self.width - MARGIN_X;
        let customer = input.customer;
        let placeholder = settings.placeholder.as_str();

        self.text(&settings.title, left, right, TITLE_Y, TITLE_SIZE, FontWeight::Bold, Align::Center);
        self.text(
            &format!("Order Number: {}", input.order_number),
            left,
            right,
            30.0,
            BLOCK_SIZE,
            FontWeight::Bold,
            Align::Left,
        );
        self.text(
            &format!("Date: {}", input.issued_on.format(&settings.date_format)),
            left,
            right,
            37.0,
            BLOCK_SIZE,
            FontWeight::Bold,
            Align::Left,
        );

        let details = [
            ("Customer Name", Some(customer.name.as_str())),
            ("Address", customer.address.as_deref()),
            ("Phone", customer.phone.as_deref()),
            ("Email", customer.email.as_deref()),
        ];
        for (row, (label, value)) in details.into_iter().enumerate() {
            let value = value.filter(|v| !v.trim().is_empty()).unwrap_or(placeholder);
            self.text(
                &format!("{}: {}", label, value),
                left,
                right,
                47.0 + 7.0 * row as f32,
                BLOCK_SIZE,
                FontWeight::Regular,
                Align::Left,
            );
        }
    }

    fn header_row(&mut self, top: f32) -> f32 {
        let baseline = top + HEADER_ROW_HEIGHT * 0.68;
        let mut x = MARGIN_X;
        for column in &COLUMNS {
            self.text(
                column.label,
                x + CELL_PADDING,
                x + column.width - CELL_PADDING,
                baseline,
                TABLE_HEADER_SIZE,
                FontWeight::Bold,
                column.align,
            );
            x += column.width;
        }
        top + HEADER_ROW_HEIGHT
    }

    fn body_row(&mut self, top: f32, cells: &[String; 8]) -> f32 {
        let baseline = top + BODY_ROW_HEIGHT * 0.68;
        let mut x = MARGIN_X;
        for (column, cell) in COLUMNS.iter().zip(cells) {
            let left = x + CELL_PADDING;
            let right = x + column.width - CELL_PADDING;
            if column.clip {
                self.text(cell, left, right, baseline, TABLE_BODY_SIZE, FontWeight::Regular, column.align);
            } else {
                self.full_text(cell, left, right, baseline, TABLE_BODY_SIZE, FontWeight::Regular, column.align);
            }
            x += column.width;
        }
        top + BODY_ROW_HEIGHT
    }

    /// Grid for a table segment whose row boundaries are `boundaries`
    fn grid(&mut self, boundaries: &[f32]) {
        let (Some(&top), Some(&bottom)) = (boundaries.first(), boundaries.last()) else {
            return;
        };
        let left = MARGIN_X;
        let right = MARGIN_X + table_width();

        for &y in boundaries {
            self.rule(left, y, right, y);
        }
        let mut x = left;
        self.rule(x, top, x, bottom);
        for column in &COLUMNS {
            x += column.width;
            self.rule(x, top, x, bottom);
        }
    }

    fn table(&mut self, currency: &CurrencyFormat, lines: &[NormalizedOrderLine], total: Decimal) {
        let mut cursor = FIRST_TABLE_TOP;
        let mut boundaries = vec![cursor];
        cursor = self.header_row(cursor);
        boundaries.push(cursor);

        for line in lines {
            if cursor + BODY_ROW_HEIGHT > self.table_bottom() {
                self.grid(&boundaries);
                self.new_page();
                cursor = CONTINUED_TABLE_TOP;
                boundaries = vec![cursor];
                cursor = self.header_row(cursor);
                boundaries.push(cursor);
            }
            cursor = self.body_row(cursor, &row_cells(currency, line));
            boundaries.push(cursor);
        }

        if cursor + HEADER_ROW_HEIGHT > self.table_bottom() {
            self.grid(&boundaries);
            self.new_page();
            cursor = CONTINUED_TABLE_TOP;
            boundaries = vec![cursor];
            cursor = self.header_row(cursor);
            boundaries.push(cursor);
        }
        self.grid(&boundaries);
        self.total_row(cursor, currency.format(total));
    }

    fn total_row(&mut self, top: f32, amount: String) {
        let bottom = top + HEADER_ROW_HEIGHT;
        let baseline = top + HEADER_ROW_HEIGHT * 0.68;
        let left = MARGIN_X;
        let right = MARGIN_X + table_width();
        let last = COLUMNS[COLUMNS.len() - 1].width;
        let divider = right - last;

        self.text(
            "Total Amount:",
            left + CELL_PADDING,
            divider - CELL_PADDING,
            baseline,
            TABLE_HEADER_SIZE,
            FontWeight::Bold,
            Align::Right,
        );
        self.full_text(
            &amount,
            divider + CELL_PADDING,
            right - CELL_PADDING,
            baseline,
            TABLE_HEADER_SIZE,
            FontWeight::Bold,
            Align::Right,
        );

        self.rule(left, bottom, right, bottom);
        self.rule(left, top, left, bottom);
        self.rule(divider, top, divider, bottom);
        self.rule(right, top, right, bottom);
    }

    fn closing_caption(&mut self, caption: &str) {
        if caption.trim().is_empty() {
            return;
        }
        let y = self.height - CAPTION_GAP;
        let right = self.width - MARGIN_X;
        self.text(caption, MARGIN_X, right, y, BLOCK_SIZE, FontWeight::Regular, Align::Center);
    }

    fn page_numbers(&mut self) {
        let count = self.pages.len();
        let y = self.height - PAGE_NUMBER_GAP;
        let right = self.width - MARGIN_X;
        for index in 0..count {
            let text = format!("Page {} of {}", index + 1, count);
            let width = text_width(&text, PAGE_NUMBER_SIZE, FontWeight::Regular);
            self.pages[index].texts.push(TextRun {
                text,
                x: right - width,
                y,
                size: PAGE_NUMBER_SIZE,
                weight: FontWeight::Regular,
            });
        }
    }
}

fn table_width() -> f32 {
    COLUMNS.iter().map(|c| c.width).sum()
}

fn row_cells(currency: &CurrencyFormat, line: &NormalizedOrderLine) -> [String; 8] {
    [
        line.product_code.clone(),
        line.product_name.clone(),
        line.container_count.to_string(),
        line.leftover_units.to_string(),
        line.ordered_quantity.to_string(),
        currency.format(line.unit_price),
        format_discount(line.discount_percent),
        currency.format(line.net_amount),
    ]
}

/// Replace what the standard PDF fonts cannot draw
///
/// Standard Type1 fonts only cover ASCII here; common currency signs are
/// spelled out and anything else becomes `?`.
pub fn printable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' => out.push(' '),
            '€' => out.push_str("EUR"),
            '£' => out.push_str("GBP"),
            '¥' => out.push_str("JPY"),
            _ => out.push('?'),
        }
    }
    out
}

/// Width of `text` in millimetres, using Helvetica metrics
pub fn text_width(text: &str, size: f32, weight: FontWeight) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(helvetica_width(c))).sum();
    let scale = match weight {
        FontWeight::Regular => 1.0,
        FontWeight::Bold => 1.06,
    };
    units as f32 / 1000.0 * size * PT_TO_MM * scale
}

/// Shorten `text` with an ellipsis until it fits `max_width`
fn fit_text(text: &str, size: f32, weight: FontWeight, max_width: f32) -> String {
    if text_width(text, size, weight) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if text_width(&candidate, size, weight) <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// Helvetica advance widths (1/1000 em) for printable ASCII
fn helvetica_width(c: char) -> u16 {
    const WIDTHS: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        278, 278, 278, 469, 556, 333, // '['..'`'
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
        334, 260, 334, 584, // '{'..'~'
    ];
    match c {
        ' '..='~' => WIDTHS[(c as usize) - 32],
        _ => 556,
    }
}
