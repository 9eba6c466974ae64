use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::analysis::safe_set;
use crate::game::{Direction, GameState, Position};
use crate::metrics::GameMetrics;

/// Session details shown next to the board
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub policy: String,
    pub episode: u32,
    pub speed: &'static str,
    pub paused: bool,
    /// Autonomous policies restart on their own; a human presses R
    pub autonomous: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics, status: &StatusLine) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics, status), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(5),
                Constraint::Percentage(90),
                Constraint::Percentage(5),
            ])
            .split(chunks[1])[1];

        if state.is_alive() {
            frame.render_widget(self.render_grid(state, status), game_area);
        } else {
            frame.render_widget(self.render_game_over(state, status), game_area);
        }

        frame.render_widget(self.render_controls(status), chunks[2]);
    }

    fn render_grid(&self, state: &GameState, status: &StatusLine) -> Paragraph<'_> {
        let cell = state.cell_size;
        let cols = state.frame_width / cell;
        let rows = state.frame_height / cell;
        let head = state.head();

        let mut lines = Vec::with_capacity(rows as usize);
        for row in 0..rows {
            let mut spans = Vec::with_capacity(cols as usize);

            for col in 0..cols {
                let pos = Position::new(col * cell, row * cell);

                let span = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        let title = if status.paused {
            format!(" {} | PAUSED ", status.policy)
        } else {
            format!(" {} ", status.policy)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(if status.paused {
                        Color::Yellow
                    } else {
                        Color::White
                    }))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics, status: &StatusLine) -> Paragraph<'_> {
        let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
        let value = |text: String| Span::styled(text, Style::default().fg(Color::White));

        let score_line = Line::from(vec![
            label("Score: "),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            label("Length: "),
            value(state.snake.len().to_string()),
            Span::raw("    "),
            label("Steps: "),
            value(state.steps.to_string()),
            Span::raw("    "),
            label("High: "),
            value(metrics.format_high_score()),
            Span::raw("    "),
            label("Time: "),
            value(metrics.format_time()),
        ]);

        let moves = safe_set(state);
        let mut session = vec![
            label("Episode: "),
            value(status.episode.to_string()),
            Span::raw("    "),
            label("Speed: "),
            value(status.speed.to_string()),
            Span::raw("    "),
            label("Safe: "),
        ];
        for (direction, safe) in moves.iter() {
            let color = if safe { Color::Green } else { Color::DarkGray };
            session.push(Span::styled(format!("{} ", arrow(direction)), Style::default().fg(color)));
        }

        Paragraph::new(vec![score_line, Line::from(session)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, status: &StatusLine) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.snake.len().to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
        ];

        if status.autonomous && !status.paused {
            text.push(Line::from(Span::styled(
                "Restarting...",
                Style::default().fg(Color::Gray),
            )));
        } else {
            text.push(Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, status: &StatusLine) -> Paragraph<'_> {
        let mut spans = Vec::new();
        if !status.autonomous {
            spans.extend([
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
            ]);
        }
        spans.extend([
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Left => "←",
        Direction::Right => "→",
        Direction::Up => "↑",
        Direction::Down => "↓",
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
