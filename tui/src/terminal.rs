//! Terminal setup and drawing

use std::io::{self, Stdout, Write};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue};

use wikitok_core::feed::{Line, Tone};

/// Raw mode, alternate screen, hidden cursor and mouse capture for as long
/// as the guard lives. Restored on drop, including when unwinding.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide, EnableMouseCapture) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { stdout })
    }

    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn draw(&mut self, lines: &[Line]) -> io::Result<()> {
        for (row, line) in (0u16..).zip(lines) {
            queue!(
                self.stdout,
                cursor::MoveTo(0, row),
                Clear(ClearType::CurrentLine)
            )?;
            match line.tone {
                Tone::Plain => {}
                Tone::Title => queue!(self.stdout, SetAttribute(Attribute::Bold))?,
                Tone::Dim => queue!(self.stdout, SetForegroundColor(Color::DarkGrey))?,
                Tone::Placeholder => queue!(self.stdout, SetForegroundColor(Color::Grey))?,
                Tone::Status => queue!(self.stdout, SetAttribute(Attribute::Reverse))?,
            }
            queue!(
                self.stdout,
                Print(&line.text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        self.stdout.flush()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            DisableMouseCapture,
            cursor::Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
