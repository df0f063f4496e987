//! Event loop
//!
//! Multiplexes terminal input, background feed events and the placeholder
//! pulse with `tokio::select!`, and repaints when something changed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use futures::StreamExt;

use wikitok_core::app::{CardService, FeedService};
use wikitok_core::domain::entities::ImageState;
use wikitok_core::domain::ports::{ImageLoader, WikipediaClient};
use wikitok_core::feed::{
    render_notice, render_screen, FeedContainer, Line, Position, Screen, Viewport,
};

use crate::terminal::TerminalGuard;

const PULSE_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Prev,
    First,
    Open,
    Share,
    Quit,
    Ignore,
}

pub fn key_action(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown => Action::Next,
        KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => Action::Prev,
        KeyCode::Char('g') | KeyCode::Home => Action::First,
        KeyCode::Char('o') | KeyCode::Enter => Action::Open,
        KeyCode::Char('s') => Action::Share,
        _ => Action::Ignore,
    }
}

pub fn mouse_action(kind: MouseEventKind) -> Action {
    match kind {
        MouseEventKind::ScrollDown => Action::Next,
        MouseEventKind::ScrollUp => Action::Prev,
        _ => Action::Ignore,
    }
}

/// Whether the screen shows something that pulses
fn is_animating(screen: &Screen<'_>) -> bool {
    match screen {
        Screen::Card(card) => card.image == ImageState::Pending,
        Screen::End { loading } => *loading,
    }
}

struct App<W, I>
where
    W: WikipediaClient + 'static,
    I: ImageLoader + 'static,
{
    container: FeedContainer<W, I>,
    size: (u16, u16),
    pulse: bool,
}

impl<W, I> App<W, I>
where
    W: WikipediaClient + 'static,
    I: ImageLoader + 'static,
{
    fn frame(&self) -> Vec<Line> {
        let (cols, rows) = self.size;
        if let Some(message) = self.container.notice() {
            return render_notice(message, cols, rows);
        }

        let feed = self.container.feed();
        let position = Position {
            index: self.container.viewport().index,
            total: feed.len(),
            loading: feed.is_loading(),
        };
        render_screen(&self.container.screen(), position, cols, rows, self.pulse)
    }

    /// Returns false once the user asked to quit. Opening and sharing run
    /// in the background so the loop keeps drawing.
    fn perform(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Next => {
                self.container.scroll_next();
            }
            Action::Prev => {
                self.container.scroll_prev();
            }
            Action::First => {
                self.container.scroll_to(0);
            }
            Action::Open => {
                self.container.open_current();
            }
            Action::Share => {
                self.container.share_current();
            }
            Action::Ignore => {}
        }
        true
    }
}

pub async fn run<W, I>(
    feed: Arc<FeedService<W, I>>,
    cards: Arc<CardService<W, I>>,
    prefetch_screens: u16,
) -> Result<()>
where
    W: WikipediaClient + 'static,
    I: ImageLoader + 'static,
{
    let mut terminal = TerminalGuard::enter().context("Failed to set up the terminal")?;
    let (cols, rows) = terminal.size().context("Failed to read terminal size")?;

    let (container, mut events) =
        FeedContainer::new(feed, cards, Viewport::new(cols, rows), prefetch_screens);
    let mut app = App {
        container,
        size: (cols, rows),
        pulse: false,
    };
    app.container.mount();

    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(PULSE_INTERVAL);
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal
                .draw(&app.frame())
                .context("Failed to draw the feed")?;
            needs_render = false;
        }

        tokio::select! {
            maybe_event = input.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if app.container.dismiss_notice() {
                            needs_render = true;
                            continue;
                        }
                        if !app.perform(key_action(key)) {
                            break;
                        }
                        needs_render = true;
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        let action = mouse_action(mouse.kind);
                        if action != Action::Ignore && app.container.notice().is_none() {
                            app.perform(action);
                            needs_render = true;
                        }
                    }
                    Some(Ok(Event::Resize(cols, rows))) => {
                        app.size = (cols, rows);
                        app.container.resize(cols, rows);
                        needs_render = true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Failed to read terminal input"),
                    None => break,
                }
            }

            Some(event) = events.recv() => {
                needs_render |= app.container.apply(event);
            }

            _ = ticker.tick() => {
                app.pulse = !app.pulse;
                needs_render |= is_animating(&app.container.screen());
            }
        }
    }

    app.container.unmount();
    Ok(())
}
