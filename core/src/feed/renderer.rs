//! Feed renderer
//!
//! Lays out one screen of the feed as styled text lines. Every function
//! returns exactly `height` lines, none wider than `width` columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::entities::ImageState;
use crate::feed::card::Card;
use crate::feed::container::Screen;

pub const DESCRIPTION_PLACEHOLDER: &str = "Loading description...";
pub const IMAGE_UNAVAILABLE: &str = "[image unavailable]";

const SUMMARY_LINES: usize = 2;
const KEY_HINTS: &str = "j/k scroll  o open  s share  q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    Dim,
    /// Pulsing placeholders
    Placeholder,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), Tone::Plain)
    }
}

/// Position shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
    pub loading: bool,
}

/// Render the current screen with a status bar on the last row
pub fn render_screen(
    screen: &Screen<'_>,
    position: Position,
    width: u16,
    height: u16,
    pulse: bool,
) -> Vec<Line> {
    let body_height = height.saturating_sub(1);
    let mut lines = match screen {
        Screen::Card(card) => render_card(card, width, body_height, pulse),
        Screen::End { loading: true } => render_loading(width, body_height, pulse),
        Screen::End { loading: false } => {
            render_message("Scroll down to load more articles.", width, body_height)
        }
    };
    if height > 0 {
        lines.push(render_status(position, width));
    }
    lines
}

/// Thumbnail, title, summary, then the intro or its placeholder
pub fn render_card(card: &Card, width: u16, height: u16, pulse: bool) -> Vec<Line> {
    let cols = usize::from(width);
    let rows = usize::from(height);
    let mut lines = Vec::with_capacity(rows);

    let image_rows = if rows >= 12 { rows * 2 / 5 } else { 0 };
    if image_rows > 0 {
        lines.extend(render_image(card, cols, image_rows, pulse));
        lines.push(Line::blank());
    }

    for text in wrap(&card.article.title, cols) {
        lines.push(Line::new(text, Tone::Title));
    }

    if let Some(summary) = card.article.summary() {
        let mut summary_lines = wrap(summary, cols);
        if summary_lines.len() > SUMMARY_LINES {
            summary_lines.truncate(SUMMARY_LINES);
            if let Some(last) = summary_lines.last_mut() {
                *last = ellipsize(last, cols);
            }
        }
        lines.extend(summary_lines.into_iter().map(|t| Line::new(t, Tone::Dim)));
    }
    lines.push(Line::blank());

    match card.intro.text() {
        Some(intro) => {
            lines.extend(wrap(intro, cols).into_iter().map(|t| Line::new(t, Tone::Plain)))
        }
        None => lines.push(Line::new(
            truncate(DESCRIPTION_PLACEHOLDER, cols),
            Tone::Placeholder,
        )),
    }

    fit(lines, cols, rows)
}

fn render_image(card: &Card, cols: usize, rows: usize, pulse: bool) -> Vec<Line> {
    if card.image == ImageState::Pending {
        let shade = if pulse { "░" } else { "▒" };
        return (0..rows)
            .map(|_| Line::new(shade.repeat(cols), Tone::Placeholder))
            .collect();
    }

    let label = match card.image {
        ImageState::Errored => IMAGE_UNAVAILABLE.to_string(),
        _ => {
            let thumb = &card.article.thumbnail;
            format!("[{}x{} thumbnail]", thumb.width, thumb.height)
        }
    };

    let inner = cols.saturating_sub(2);
    let mut lines = Vec::with_capacity(rows);
    lines.push(Line::new(format!("┌{}┐", "─".repeat(inner)), Tone::Dim));
    for row in 1..rows.saturating_sub(1) {
        let text = if row == rows / 2 {
            center(&label, inner)
        } else {
            " ".repeat(inner)
        };
        lines.push(Line::new(format!("│{}│", text), Tone::Dim));
    }
    lines.push(Line::new(format!("└{}┘", "─".repeat(inner)), Tone::Dim));
    lines
}

/// Loading indicator shown below the last card while a batch is in flight
pub fn render_loading(width: u16, height: u16, pulse: bool) -> Vec<Line> {
    let text = if pulse {
        "Loading articles..."
    } else {
        "Loading articles.  "
    };
    centered(vec![Line::new(text, Tone::Placeholder)], width, height)
}

fn render_message(message: &str, width: u16, height: u16) -> Vec<Line> {
    centered(vec![Line::new(message, Tone::Dim)], width, height)
}

/// Blocking confirmation, dismissed by any key
pub fn render_notice(message: &str, width: u16, height: u16) -> Vec<Line> {
    centered(
        vec![
            Line::new(message, Tone::Title),
            Line::blank(),
            Line::new("Press any key to continue", Tone::Dim),
        ],
        width,
        height,
    )
}

pub fn render_status(position: Position, width: u16) -> Line {
    let cols = usize::from(width);
    let counter = if position.index < position.total {
        format!(" wikitok  {}/{}", position.index + 1, position.total)
    } else {
        format!(" wikitok  end/{}", position.total)
    };
    let left = if position.loading {
        format!("{}  loading", counter)
    } else {
        counter
    };

    let gap = cols.saturating_sub(left.width() + KEY_HINTS.width() + 1);
    let text = if gap > 0 {
        format!("{}{}{} ", left, " ".repeat(gap), KEY_HINTS)
    } else {
        left
    };
    Line::new(truncate(&text, cols), Tone::Status)
}

fn centered(content: Vec<Line>, width: u16, height: u16) -> Vec<Line> {
    let cols = usize::from(width);
    let rows = usize::from(height);
    let top = rows.saturating_sub(content.len()) / 2;

    let mut lines: Vec<Line> = (0..top).map(|_| Line::blank()).collect();
    lines.extend(content.into_iter().map(|line| Line {
        text: center(&line.text, cols),
        tone: line.tone,
    }));
    fit(lines, cols, rows)
}

/// Pad or cut to exactly `rows` lines of at most `cols` columns
fn fit(mut lines: Vec<Line>, cols: usize, rows: usize) -> Vec<Line> {
    lines.truncate(rows);
    for line in &mut lines {
        if line.text.width() > cols {
            line.text = truncate(&line.text, cols);
        }
    }
    lines.resize_with(rows, Line::blank);
    lines
}

fn center(text: &str, cols: usize) -> String {
    let text = truncate(text, cols);
    let pad = cols.saturating_sub(text.width());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

/// Cut `text` to at most `cols` columns
pub fn truncate(text: &str, cols: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > cols {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

fn ellipsize(text: &str, cols: usize) -> String {
    if cols == 0 {
        return String::new();
    }
    let cut = truncate(text, cols.saturating_sub(1));
    format!("{}…", cut.trim_end())
}

/// Word-wrap to `cols` columns; words wider than a line are split
pub fn wrap(text: &str, cols: usize) -> Vec<String> {
    if cols == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + 1 + word_width
            };

            if needed <= cols {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width = needed;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= cols {
                current.push_str(word);
                current_width = word_width;
            } else {
                for ch in word.chars() {
                    let w = ch.width().unwrap_or(0);
                    if current_width + w > cols && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(ch);
                    current_width += w;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::COPIED_NOTICE;
    use crate::domain::entities::IntroState;
    use crate::test_utils::test_article;

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn contains(lines: &[Line], needle: &str) -> bool {
        lines.iter().any(|l| l.text.contains(needle))
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_counts_wide_characters() {
        // Each CJK character is two columns
        assert_eq!(wrap("日本語", 4), vec!["日本", "語"]);
        assert_eq!(truncate("日本語", 5), "日本");
    }

    #[test]
    fn wrap_keeps_paragraphs() {
        assert_eq!(wrap("one\ntwo", 20), vec!["one", "two"]);
    }

    #[test]
    fn card_shows_placeholder_until_intro_loads() {
        let mut card = Card::new(test_article(1));
        let lines = render_card(&card, 60, 30, false);

        assert_eq!(lines.len(), 30);
        assert!(contains(&lines, DESCRIPTION_PLACEHOLDER));
        assert!(contains(&lines, "Article 1"));

        card.intro = IntroState::Loaded("Example summary.".to_string());
        let lines = render_card(&card, 60, 30, false);

        assert!(contains(&lines, "Example summary."));
        assert!(!contains(&lines, DESCRIPTION_PLACEHOLDER));
    }

    #[test]
    fn unavailable_intro_keeps_placeholder() {
        let mut card = Card::new(test_article(1));
        card.intro = IntroState::Unavailable;

        assert!(contains(&render_card(&card, 60, 30, false), DESCRIPTION_PLACEHOLDER));
    }

    #[test]
    fn image_placeholder_pulses_while_pending() {
        let card = Card::new(test_article(1));

        let dim = render_card(&card, 20, 30, false);
        let bright = render_card(&card, 20, 30, true);

        assert!(dim[0].text.starts_with('▒'));
        assert!(bright[0].text.starts_with('░'));
        assert_eq!(dim[0].tone, Tone::Placeholder);
    }

    #[test]
    fn settled_image_dismisses_placeholder() {
        let mut card = Card::new(test_article(1));

        card.image = ImageState::Loaded;
        let loaded = render_card(&card, 40, 30, true);
        assert!(loaded[0].text.starts_with('┌'));
        assert!(contains(&loaded, "[400x300 thumbnail]"));

        card.image = ImageState::Errored;
        let errored = render_card(&card, 40, 30, true);
        assert!(errored[0].text.starts_with('┌'));
        assert!(contains(&errored, IMAGE_UNAVAILABLE));
    }

    #[test]
    fn small_screens_skip_the_image() {
        let card = Card::new(test_article(1));
        let lines = render_card(&card, 40, 6, false);

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].text, "Article 1");
    }

    #[test]
    fn lines_never_exceed_width() {
        let mut card = Card::new(test_article(1));
        card.article.title = "A very long title that has to wrap across lines".to_string();
        card.intro = IntroState::Loaded("word ".repeat(200));

        for line in render_card(&card, 17, 40, false) {
            assert!(line.text.width() <= 17, "too wide: {:?}", line.text);
        }
    }

    #[test]
    fn screen_has_status_bar() {
        let card = Card::new(test_article(1));
        let position = Position {
            index: 0,
            total: 40,
            loading: false,
        };

        let lines = render_screen(&Screen::Card(&card), position, 80, 24, false);

        assert_eq!(lines.len(), 24);
        assert_eq!(lines[23].tone, Tone::Status);
        assert!(lines[23].text.contains("1/40"));
    }

    #[test]
    fn end_screen_shows_loading_indicator() {
        let position = Position {
            index: 40,
            total: 40,
            loading: true,
        };

        let lines = render_screen(&Screen::End { loading: true }, position, 80, 24, true);

        assert!(contains(&lines, "Loading articles..."));
        assert!(lines[23].text.contains("end/40"));
        assert!(lines[23].text.contains("loading"));
    }

    #[test]
    fn notice_is_centered() {
        let lines = render_notice(COPIED_NOTICE, 40, 9);

        assert_eq!(lines.len(), 9);
        let row = texts(&lines)
            .iter()
            .position(|t| t.contains(COPIED_NOTICE))
            .unwrap();
        assert_eq!(row, 3);
        assert!(contains(&lines, "Press any key"));
    }
}
