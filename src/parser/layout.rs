//! Text layer interpretation for PDF pages.
//!
//! Walks a page's content stream, tracks the text matrix, and emits
//! positioned text spans. Spans are then grouped into lines by baseline.

use std::cmp::Ordering;

use crate::error::Result;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Leading used by `T*`, `'` and `"` when the stream never sets one.
const DEFAULT_LEADING: f32 = 12.0;

/// Default font size before any `Tf` operator.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// TJ adjustment (thousandths of an em) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A text span with position information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Width of the text, 0 when unknown
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span of unknown width.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: 0.0,
            font_size,
        }
    }
}

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline of the first span)
    pub y: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        // Stable, so spans at the same X keep stream order
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        Self { spans, y }
    }

    /// Get the combined text of all spans.
    ///
    /// Inserts a space where the horizontal gap between spans exceeds a
    /// fraction of the average character width. No space is inserted between
    /// characters of scripts written without word spaces.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev = &self.spans[i - 1];
            let gap = span.x - (prev.x + prev.width);

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * 0.5
            };

            let spaceless = prev
                .text
                .chars()
                .last()
                .map(is_spaceless_script_char)
                .unwrap_or(false)
                && span
                    .text
                    .chars()
                    .next()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);

            let already_spaced = prev.text.ends_with([' ', '\u{00A0}'])
                || span.text.starts_with([' ', '\u{00A0}']);

            if gap > avg_char_width * 0.2 && !spaceless && !already_spaced {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }
}

/// Text matrix for tracking position in the content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Interpreter state for one page's content stream.
struct SpanCollector<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    font: Vec<u8>,
    font_size: f32,
    matrix: TextMatrix,
    in_text: bool,
    spans: Vec<TextSpan>,
}

impl<'a, B: PdfBackend + ?Sized> SpanCollector<'a, B> {
    fn new(backend: &'a B, page: PageId) -> Self {
        Self {
            backend,
            page,
            font: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            matrix: TextMatrix::default(),
            in_text: false,
            spans: Vec::new(),
        }
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "BT" => {
                self.in_text = true;
                let leading = self.matrix.leading;
                self.matrix = TextMatrix {
                    leading,
                    ..TextMatrix::default()
                };
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font = name.clone();
                }
                self.font_size = op.number(1, DEFAULT_FONT_SIZE);
            }
            "TL" => self.matrix.leading = op.number(0, DEFAULT_LEADING),
            "Td" => self.matrix.translate(op.number(0, 0.0), op.number(1, 0.0)),
            "TD" => {
                let ty = op.number(1, 0.0);
                self.matrix.leading = -ty;
                self.matrix.translate(op.number(0, 0.0), ty);
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    self.matrix.set(
                        op.number(0, 1.0),
                        op.number(1, 0.0),
                        op.number(2, 0.0),
                        op.number(3, 1.0),
                        op.number(4, 0.0),
                        op.number(5, 0.0),
                    );
                }
            }
            "T*" => self.matrix.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.push_span(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let text = self.decode_array(items);
                    self.push_span(text);
                }
            }
            "'" | "\"" => {
                self.matrix.next_line();
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                    let text = self.decode(bytes);
                    self.push_span(text);
                }
            }
            _ => {}
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.backend.decode_text(self.page, &self.font, bytes)
    }

    /// Decode a TJ array; large negative adjustments become word spaces.
    fn decode_array(&self, items: &[PdfValue]) -> String {
        let mut combined = String::new();

        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(bytes)),
                other => {
                    let Some(adjustment) = other.as_number().map(|n| -n) else {
                        continue;
                    };
                    let needs_space = adjustment > TJ_SPACE_THRESHOLD
                        && !combined.ends_with([' ', '\u{00A0}'])
                        && combined
                            .chars()
                            .last()
                            .is_some_and(|c| !is_spaceless_script_char(c));
                    if needs_space {
                        combined.push(' ');
                    }
                }
            }
        }

        combined
    }

    fn push_span(&mut self, text: String) {
        if !self.in_text || text.trim().is_empty() {
            return;
        }
        let (x, y) = self.matrix.position();
        let size = self.font_size * self.matrix.scale();
        self.spans.push(TextSpan::new(text, x, y, size));
    }
}

/// Extract positioned text spans from a page.
pub fn extract_page_spans<B: PdfBackend + ?Sized>(backend: &B, page: PageId) -> Result<Vec<TextSpan>> {
    let content = backend.page_content(page)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let ops = backend.decode_content(&content)?;
    let mut collector = SpanCollector::new(backend, page);
    for op in &ops {
        collector.apply(op);
    }

    Ok(collector.spans)
}

/// Group spans into lines, keeping content stream order.
///
/// A span joins the current line when its baseline is within 30% of its
/// font size of the line's baseline; otherwise it starts a new line.
pub fn group_spans_into_lines(spans: Vec<TextSpan>) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Join line texts with newlines.
pub fn lines_to_text(lines: &[TextLine]) -> String {
    lines
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}
