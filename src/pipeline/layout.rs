//! Text layout for the output document: word wrapping and pagination.
//!
//! Pure arithmetic, kept apart from pdfium so it can be tested without the
//! engine. Glyph widths are estimated at half the font size, which suits
//! Helvetica for Latin text.

/// A4 width in points.
pub const A4_WIDTH_PT: f32 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT_PT: f32 = 841.89;
/// Page margin in points (15 mm).
pub const MARGIN_PT: f32 = 42.52;

const AVG_GLYPH_WIDTH_EM: f32 = 0.5;
const LINE_HEIGHT_EM: f32 = 1.4;

/// Geometry of one output sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
}

impl SheetLayout {
    /// A4 portrait with 15 mm margins.
    pub fn a4(font_size: f32) -> Self {
        Self {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margin: MARGIN_PT,
            font_size,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_EM
    }

    /// Characters that fit on one line.
    pub fn chars_per_line(&self) -> usize {
        let usable = (self.width - 2.0 * self.margin).max(0.0);
        ((usable / (self.font_size * AVG_GLYPH_WIDTH_EM)).floor() as usize).max(1)
    }

    /// Lines that fit on one sheet.
    pub fn lines_per_sheet(&self) -> usize {
        let usable = (self.height - 2.0 * self.margin).max(0.0);
        ((usable / self.line_height()).floor() as usize).max(1)
    }

    /// Baseline of line `n` (0-based) on a sheet, in PDF user space
    /// (origin bottom-left).
    pub fn baseline(&self, n: usize) -> f32 {
        self.height - self.margin - self.font_size - n as f32 * self.line_height()
    }
}

/// Word-wrap `text` to lines of at most `max_chars` characters.
///
/// Existing line breaks are kept; blank lines survive as empty lines. A word
/// longer than a whole line is broken across lines.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut pieces = chars.chunks(max_chars).peekable();
                while let Some(piece) = pieces.next() {
                    let piece: String = piece.iter().collect();
                    if pieces.peek().is_some() {
                        lines.push(piece);
                    } else {
                        line_len = piece.chars().count();
                        line = piece;
                    }
                }
                continue;
            }

            if line.is_empty() {
                line.push_str(word);
                line_len = word_len;
            } else if line_len + 1 + word_len > max_chars {
                lines.push(std::mem::replace(&mut line, word.to_string()));
                line_len = word_len;
            } else {
                line.push(' ');
                line.push_str(word);
                line_len += 1 + word_len;
            }
        }
        lines.push(line);
    }

    lines
}

/// Lay out one translated page as one or more sheets of lines.
///
/// Always returns at least one sheet; an empty page gives one blank sheet.
pub fn paginate(text: &str, layout: &SheetLayout) -> Vec<Vec<String>> {
    let lines = wrap(text, layout.chars_per_line());
    let per_sheet = layout.lines_per_sheet();

    let mut sheets: Vec<Vec<String>> = lines
        .chunks(per_sheet)
        .map(|c| c.to_vec())
        .collect();
    if sheets.is_empty() {
        sheets.push(Vec::new());
    }
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_breaks_overlong_words() {
        assert_eq!(wrap("ab abcdefghij c", 4), vec!["ab", "abcd", "efgh", "ij c"]);
    }

    #[test]
    fn wrap_keeps_paragraphs() {
        assert_eq!(wrap("one\n\ntwo", 20), vec!["one", "", "two"]);
    }

    #[test]
    fn wrap_counts_chars() {
        assert_eq!(wrap("ação ação", 9), vec!["ação ação"]);
        assert_eq!(wrap("ação ação", 8), vec!["ação", "ação"]);
    }

    #[test]
    fn empty_page_is_one_blank_sheet() {
        let sheets = paginate("", &SheetLayout::a4(12.0));
        assert_eq!(sheets, vec![Vec::<String>::new()]);
    }

    #[test]
    fn a4_at_12pt_geometry() {
        let l = SheetLayout::a4(12.0);
        // (595.28 - 85.04) / 6 = 85.04
        assert_eq!(l.chars_per_line(), 85);
        // (841.89 - 85.04) / 16.8 = 45.05
        assert_eq!(l.lines_per_sheet(), 45);
        assert!(l.baseline(0) < l.height - l.margin);
        assert!(l.baseline(l.lines_per_sheet() - 1) >= l.margin - l.line_height());
    }

    #[test]
    fn long_page_overflows_to_more_sheets() {
        let l = SheetLayout::a4(12.0);
        let word = "palavra ";
        let text = word.repeat(l.chars_per_line() * l.lines_per_sheet() / word.len() * 2);
        let sheets = paginate(&text, &l);
        assert!(sheets.len() >= 2, "got {} sheets", sheets.len());
        assert!(sheets.iter().all(|s| s.len() <= l.lines_per_sheet()));
        let rejoined: Vec<&str> = sheets
            .iter()
            .flatten()
            .flat_map(|line| line.split_whitespace())
            .collect();
        assert_eq!(rejoined.len(), text.split_whitespace().count());
    }
}
