//! Full-screen error display for fatal failures.
//!
//! Shows a human-readable message and waits for a key press before returning
//! control, so the message is not lost when the alternate screen closes.

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use std::io::{self, Stdout};

/// Alternate-screen display for fatal failures.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ErrorScreen {
    /// Switches to the alternate screen in raw mode.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized or raw mode enabled
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(ErrorScreen { terminal })
    }

    /// Displays an error message and waits for any key press to dismiss it.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn show_error(&mut self, error_message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();

                let [_, body, footer] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(6),
                    Constraint::Fill(1),
                ])
                .areas(area);

                let mut lines = vec![
                    Line::from(Span::styled(
                        "Something went wrong",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::default(),
                ];
                lines.extend(error_message.lines().map(Line::from));

                let paragraph = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, body);

                let hint = Paragraph::new(Line::from(Span::styled(
                    "press any key to exit",
                    Style::default().fg(Color::DarkGray),
                )))
                .alignment(Alignment::Center);
                frame.render_widget(hint, footer);
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(_) = event::read()? {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Leaves the alternate screen and restores the terminal.
    ///
    /// # Errors
    /// - If raw mode cannot be disabled
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
