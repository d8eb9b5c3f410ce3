//! Interview screen: question display, countdown, level meter and the final
//! assessment view.
//!
//! Rendering is a pure projection of the values passed in; the screen holds
//! no session state of its own beyond the spinner position.

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::io::{stdout, Stdout};

/// User input command on the interview screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewCommand {
    /// No relevant key pressed
    Continue,
    /// Start or stop recording (Space or Enter)
    ToggleRecording,
    /// Leave the interview (Escape, 'q' or Ctrl+C)
    Quit,
}

/// Everything the question screen needs for one frame.
pub struct QuestionView<'a> {
    pub index: usize,
    pub total: usize,
    pub question: &'a str,
    pub remaining_secs: u32,
    pub max_secs: u32,
    pub recording: bool,
    pub level: u8,
    pub notice: Option<&'a str>,
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Terminal UI for the interview wizard.
pub struct InterviewTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    spinner_frame: usize,
}

impl InterviewTui {
    /// Creates a new TUI instance and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(InterviewTui {
            terminal,
            spinner_frame: 0,
        })
    }

    /// Renders the active question with countdown and level meter.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_question(&mut self, view: &QuestionView) -> anyhow::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();

            let [header, question, status, meter, notice, footer] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .areas(area);

            let title = Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("Question {}/{}", view.index + 1, view.total),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            frame.render_widget(title, header);

            let question_text = Paragraph::new(view.question)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::LEFT).border_style(
                    Style::default().fg(Color::Rgb(185, 207, 212)),
                ));
            frame.render_widget(question_text, question);

            let status_line = if view.recording {
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(Color::Red)),
                    Span::raw(format!("Time left: {}s", view.remaining_secs)),
                ])
            } else {
                Line::from(vec![
                    Span::styled("○ ", Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("{} seconds per answer", view.max_secs)),
                ])
            };
            frame.render_widget(Paragraph::new(status_line), status);

            if view.recording {
                let gauge = Gauge::default()
                    .ratio(f64::from(view.level) / 100.0)
                    .label("")
                    .gauge_style(Style::default().fg(Color::Rgb(206, 224, 220)));
                frame.render_widget(gauge, meter);
            }

            if let Some(message) = view.notice {
                let warning = Paragraph::new(message)
                    .style(Style::default().fg(Color::Yellow))
                    .wrap(Wrap { trim: true });
                frame.render_widget(warning, notice);
            }

            let help = if view.recording {
                "Space: stop and submit answer  ·  q: quit"
            } else {
                "Space: start recording  ·  q: quit"
            };
            let footer_line = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(footer_line, footer);
        })?;

        Ok(())
    }

    /// Renders one frame of the loading spinner and advances it.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_loading(&mut self, message: &str) -> anyhow::Result<()> {
        let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        self.spinner_frame = self.spinner_frame.wrapping_add(1);

        self.terminal.draw(|frame| {
            let area = frame.area();

            let [_, body, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);

            let line = Line::from(vec![
                Span::styled(spinner, Style::default().fg(Color::Rgb(185, 207, 212))),
                Span::raw(" "),
                Span::raw(message.to_string()),
            ]);
            frame.render_widget(
                Paragraph::new(line).alignment(Alignment::Center),
                body,
            );
        })?;

        Ok(())
    }

    /// Renders the final assessment, replacing the question view.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render_analysis(&mut self, analysis: &str) -> anyhow::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();

            let [header, body, footer] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);

            let title = Paragraph::new(Span::styled(
                "Interview Analysis",
                Style::default().add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(title, header);

            let text = Paragraph::new(analysis).wrap(Wrap { trim: true });
            frame.render_widget(text, body);

            let hint =
                Paragraph::new("press any key to exit").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, footer);
        })?;

        Ok(())
    }

    /// Processes user input and returns the appropriate command.
    ///
    /// # Returns
    /// - `Continue` if no key or an unrecognized key was pressed
    /// - `ToggleRecording` if Space or Enter was pressed
    /// - `Quit` if Escape, 'q' or Ctrl+C was pressed
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<InterviewCommand> {
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        tracing::debug!("Toggle recording requested");
                        InterviewCommand::ToggleRecording
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Quit requested");
                        InterviewCommand::Quit
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: quitting");
                        InterviewCommand::Quit
                    }
                    _ => InterviewCommand::Continue,
                });
            }
        }
        Ok(InterviewCommand::Continue)
    }

    /// Blocks until any key is pressed.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn wait_for_key(&mut self) -> anyhow::Result<()> {
        loop {
            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(_) = event::read()? {
                    return Ok(());
                }
            }
        }
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
