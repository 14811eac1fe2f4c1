use super::view_model::{BracketHighlight, ViewModel};
use crate::document_model::{PALETTE_LEVELS, SearchState};
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType, SetTitle, size},
};
use std::io::{self, Write, stdout};
use unicode_width::UnicodeWidthChar;

/// Foreground colours for matched bracket pairs, indexed by nesting level.
pub const BRACKET_PALETTE: [Color; PALETTE_LEVELS] = [
    Color::Blue,
    Color::Green,
    Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    },
];

#[derive(Clone)]
pub struct RenderParams<'a> {
    pub title: &'a str,
    pub status_line: &'a str,
    /// Screen column of the cursor on the status line while a prompt has focus.
    pub prompt_cursor: Option<usize>,
    pub search_state: Option<&'a SearchState>,
    pub bracket_highlights: Option<&'a BracketHighlight>,
}

pub struct View {
    last_lines: Vec<String>,
    last_title: String,
    last_status: String,
    last_terminal_size: (u16, u16),
    scroll_offset: usize,
    horizontal_scroll: usize,
    needs_full_redraw: bool,
    show_line_numbers: bool,
    tab_stop: usize,
}

impl View {
    pub fn new() -> Self {
        Self {
            last_lines: Vec::new(),
            last_title: String::new(),
            last_status: String::new(),
            last_terminal_size: (0, 0),
            scroll_offset: 0,
            horizontal_scroll: 0,
            needs_full_redraw: true,
            show_line_numbers: false,
            tab_stop: 4,
        }
    }

    pub fn force_redraw(&mut self) {
        self.needs_full_redraw = true;
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
        self.horizontal_scroll = 0;
        self.needs_full_redraw = true;
    }

    pub fn set_line_numbers(&mut self, show: bool) {
        if self.show_line_numbers != show {
            self.show_line_numbers = show;
            self.needs_full_redraw = true;
        }
    }

    pub fn line_numbers_shown(&self) -> bool {
        self.show_line_numbers
    }

    /// Text rows visible at the last render, used for page movement.
    pub fn page_height(&self) -> usize {
        (self.last_terminal_size.1 as usize).saturating_sub(2).max(1)
    }

    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        if self.tab_stop != tab_stop {
            self.tab_stop = tab_stop;
            self.needs_full_redraw = true;
        }
    }

    fn char_width(&self, ch: char, column: usize) -> usize {
        match ch {
            '\t' => self.tab_stop - column % self.tab_stop,
            c => c.width().unwrap_or(1),
        }
    }

    /// Display column of byte offset `byte_column` in `text`, accounting for
    /// tab stops and wide characters.
    fn calculate_display_column(&self, text: &str, byte_column: usize) -> usize {
        let mut display_col = 0;
        for (idx, ch) in text.char_indices() {
            if idx >= byte_column {
                break;
            }
            display_col += self.char_width(ch, display_col);
        }
        display_col
    }

    fn style_for(&self, offset: usize, params: &RenderParams<'_>) -> Option<String> {
        if let Some(highlights) = params.bracket_highlights {
            if highlights.unmatched_at_cursor == Some(offset) {
                return Some(format!(
                    "{}{}",
                    SetBackgroundColor(Color::Red),
                    SetForegroundColor(Color::White)
                ));
            }
            if let Some(pair) = highlights.matching {
                if offset == pair.open || offset == pair.close {
                    return Some(format!(
                        "{}{}",
                        SetForegroundColor(BRACKET_PALETTE[pair.level()]),
                        SetAttribute(Attribute::Bold)
                    ));
                }
            }
        }

        if let Some(search) = params.search_state {
            if search
                .current_range()
                .is_some_and(|(start, end)| (start..end).contains(&offset))
            {
                return Some(format!(
                    "{}{}",
                    SetBackgroundColor(Color::Yellow),
                    SetForegroundColor(Color::Black)
                ));
            }
            if search.is_match_at(offset) {
                return Some(format!("{}", SetBackgroundColor(Color::DarkGrey)));
            }
        }

        None
    }

    /// Renders the visible part of one line, starting at document offset
    /// `line_start`, with search and bracket styling applied.
    fn render_line(
        &self,
        line_start: usize,
        text: &str,
        text_width: usize,
        params: &RenderParams<'_>,
    ) -> String {
        let mut result = String::new();
        let mut col = 0;

        for (idx, ch) in text.char_indices() {
            let width = self.char_width(ch, col);
            if col < self.horizontal_scroll {
                col += width;
                continue;
            }
            if col + width > self.horizontal_scroll + text_width {
                break;
            }

            let shown = match ch {
                '\t' => " ".repeat(width),
                c if c.is_control() => "?".to_string(),
                c => c.to_string(),
            };
            match self.style_for(line_start + idx, params) {
                Some(style) => {
                    result.push_str(&style);
                    result.push_str(&shown);
                    result.push_str(&format!("{}", SetAttribute(Attribute::Reset)));
                }
                None => result.push_str(&shown),
            }
            col += width;
        }

        result
    }

    fn adjust_scroll_to_cursor(
        &mut self,
        cursor_line: usize,
        cursor_column: usize,
        visible_lines: usize,
        width: usize,
    ) {
        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
            self.needs_full_redraw = true;
        } else if visible_lines > 0 && cursor_line >= self.scroll_offset + visible_lines {
            self.scroll_offset = cursor_line + 1 - visible_lines;
            self.needs_full_redraw = true;
        }

        if cursor_column < self.horizontal_scroll {
            self.horizontal_scroll = cursor_column;
            self.needs_full_redraw = true;
        } else if cursor_column >= self.horizontal_scroll + width {
            self.horizontal_scroll = cursor_column + 1 - width;
            self.needs_full_redraw = true;
        }
    }

    pub fn render(
        &mut self,
        view_model: &mut dyn ViewModel,
        params: &RenderParams<'_>,
    ) -> io::Result<()> {
        let mut out = stdout();
        let (term_width, term_height) = size()?;
        if self.last_terminal_size != (term_width, term_height) {
            self.last_terminal_size = (term_width, term_height);
            self.needs_full_redraw = true;
        }
        let (width, height) = (term_width as usize, term_height as usize);

        // Row 0 is the title bar, the last row the status line.
        let text_rows = height.saturating_sub(2);
        let line_count = view_model.get_line_count();
        let line_num_width = if self.show_line_numbers {
            (line_count.to_string().len() + 1).max(4)
        } else {
            0
        };
        let text_width = width.saturating_sub(line_num_width).max(1);

        let cursor_pos = view_model.get_cursor_position();
        let cursor_line_text = view_model
            .get_line(cursor_pos.line)
            .map(|(_, text)| text)
            .unwrap_or_default();
        let cursor_col = self.calculate_display_column(&cursor_line_text, cursor_pos.column);
        self.adjust_scroll_to_cursor(cursor_pos.line, cursor_col, text_rows, text_width);

        if self.needs_full_redraw {
            queue!(out, Clear(ClearType::All))?;
            self.needs_full_redraw = false;
            self.last_lines.clear();
            self.last_title.clear();
            self.last_status.clear();
        }

        if self.last_title != params.title {
            queue!(
                out,
                SetTitle(params.title),
                cursor::MoveTo(0, 0),
                Clear(ClearType::CurrentLine),
                SetAttribute(Attribute::Reverse),
                Print(format!("{:<width$}", clip_to_width(params.title, width))),
                SetAttribute(Attribute::Reset)
            )?;
            self.last_title = params.title.to_string();
        }

        let visible_lines: Vec<String> = (0..text_rows)
            .map(|i| {
                let doc_line = self.scroll_offset + i;
                match view_model.get_line(doc_line) {
                    Some((line_start, text)) => {
                        let number = if self.show_line_numbers {
                            format!("{:>w$} ", doc_line + 1, w = line_num_width - 1)
                        } else {
                            String::new()
                        };
                        let body = self.render_line(line_start, &text, text_width, params);
                        format!("{number}{body}")
                    }
                    None => "~".to_string(),
                }
            })
            .collect();

        for (i, line) in visible_lines.iter().enumerate() {
            if self.last_lines.get(i) != Some(line) {
                queue!(
                    out,
                    cursor::MoveTo(0, (i + 1) as u16),
                    Clear(ClearType::CurrentLine),
                    Print(line)
                )?;
            }
        }
        self.last_lines = visible_lines;

        if self.last_status != params.status_line {
            queue!(
                out,
                cursor::MoveTo(0, height.saturating_sub(1) as u16),
                Clear(ClearType::CurrentLine),
                Print(clip_to_width(params.status_line, width))
            )?;
            self.last_status = params.status_line.to_string();
        }

        let (row, column) = match params.prompt_cursor {
            Some(column) => (height.saturating_sub(1), column),
            None => (
                cursor_pos.line - self.scroll_offset + 1,
                cursor_col - self.horizontal_scroll + line_num_width,
            ),
        };
        queue!(out, cursor::MoveTo(column as u16, row as u16))?;

        out.flush()
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest prefix of `text` that fits in `width` terminal columns.
fn clip_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[..idx];
        }
    }
    text
}
