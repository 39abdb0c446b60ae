use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let heading = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    let bad = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(heading)
        .header(heading)
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(bad)
        .error(bad)
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Palette (warm, record-sleeve tones)
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const GOLD: Color = Color::Rgb {
        r: 255,
        g: 196,
        b: 0,
    };
    pub const CORAL: Color = Color::Rgb {
        r: 255,
        g: 111,
        b: 97,
    };
    pub const LEAF: Color = Color::Rgb {
        r: 76,
        g: 217,
        b: 100,
    };
    pub const SKY: Color = Color::Rgb {
        r: 90,
        g: 200,
        b: 250,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

mod glyphs {
    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";
    pub const HORIZONTAL: &str = "─";
    pub const VERTICAL: &str = "│";
    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";
    pub const NOTE: &str = "♪";
    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
}

const SECTION_WIDTH: usize = 60;

// ═══════════════════════════════════════════════════════════════════════════════
// Status lines (stderr, so stdout stays pipeable)
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    eprintln!(
        " {} {}",
        glyphs::CHECK.with(colors::LEAF).bold(),
        message.with(colors::LEAF)
    );
}

pub fn print_error(message: &str) {
    eprintln!(
        " {} {}",
        glyphs::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    eprintln!(
        " {} {}",
        "⚠".with(colors::CORAL).bold(),
        message.with(colors::CORAL)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections and fields
// ═══════════════════════════════════════════════════════════════════════════════

/// Plain (unstyled) header line, padded to the section width.
pub fn section_header_text(title: &str) -> String {
    let title_len = title.width();
    let padding = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;
    let trailing = SECTION_WIDTH.saturating_sub(title_len + 4 + padding);
    format!(
        "{}{} {} {}{}",
        glyphs::ROUND_TOP_LEFT,
        glyphs::HORIZONTAL.repeat(padding),
        title,
        glyphs::HORIZONTAL.repeat(trailing),
        glyphs::ROUND_TOP_RIGHT
    )
}

pub fn print_section_header(title: &str) {
    println!();
    println!(
        "{}",
        section_header_text(title)
            .with(colors::GOLD)
            .attribute(Attribute::Bold)
    );
}

pub fn print_section_footer() {
    println!(
        "{}",
        format!(
            "{}{}{}",
            glyphs::ROUND_BOTTOM_LEFT,
            glyphs::HORIZONTAL.repeat(SECTION_WIDTH - 2),
            glyphs::ROUND_BOTTOM_RIGHT
        )
        .with(colors::GOLD)
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        glyphs::BULLET.with(colors::SKY),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_list_item(item: &str) {
    println!(
        "  {}  {}",
        glyphs::NOTE.with(colors::GOLD),
        item.with(colors::WHITE)
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        glyphs::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

/// Model output is printed unstyled so it can be redirected as-is.
pub fn print_report(text: &str) {
    println!("{}", text);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════════════════════════════════════════

/// Column-aligned box table; widths account for wide characters.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> Self {
        TableBuilder {
            col_widths: headers.iter().map(|h| h.width()).collect(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Cells beyond the header count are dropped; missing cells render blank.
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.resize(self.headers.len(), String::new());
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    fn border(&self, left: &str, join: &str, right: &str) -> String {
        let segments: Vec<String> = self
            .col_widths
            .iter()
            .map(|w| glyphs::HORIZONTAL.repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(join), right)
    }

    fn line(&self, cells: &[String]) -> String {
        let mut out = String::from(glyphs::VERTICAL);
        for (cell, width) in cells.iter().zip(&self.col_widths) {
            let padding = width.saturating_sub(cell.width());
            out.push_str(&format!(" {}{} {}", cell, " ".repeat(padding), glyphs::VERTICAL));
        }
        out
    }

    /// Unstyled rendering, one string per output line.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            self.border(glyphs::ROUND_TOP_LEFT, glyphs::T_TOP, glyphs::ROUND_TOP_RIGHT),
            self.line(&self.headers),
            self.border(glyphs::T_LEFT, glyphs::CROSS, glyphs::T_RIGHT),
        ];
        lines.extend(self.rows.iter().map(|row| self.line(row)));
        lines.push(self.border(
            glyphs::ROUND_BOTTOM_LEFT,
            glyphs::T_BOTTOM,
            glyphs::ROUND_BOTTOM_RIGHT,
        ));
        lines
    }

    pub fn print(&self) {
        let lines = self.render();
        let last = lines.len() - 1;
        for (i, line) in lines.into_iter().enumerate() {
            if i == 1 {
                println!("{}", line.with(colors::GOLD).bold());
            } else if i < 3 || i == last {
                println!("{}", line.with(colors::DIM));
            } else {
                println!("{}", line.with(colors::WHITE));
            }
        }
    }
}
