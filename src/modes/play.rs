//! Interactive terminal mode
//!
//! Runs any policy on a live board. A human steers with the arrow keys or
//! WASD; autonomous policies play on their own and restart after each game.
//!
//! # Controls
//!
//! - Arrows / WASD: steer (manual policy)
//! - Space: pause/unpause
//! - 1-4: speed (slow, normal, fast, very fast)
//! - R: restart the episode
//! - Q/Esc: quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use crate::driver::TickDriver;
use crate::input::{InputHandler, KeyAction, PlaybackSpeed};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, StatusLine};

/// Pause between a finished autonomous game and the next one
const RESTART_DELAY_TICKS: u32 = 8;

pub struct PlayMode {
    driver: TickDriver,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    /// Ticks spent on the game-over screen
    idle_ticks: u32,
}

impl PlayMode {
    pub fn new(driver: TickDriver) -> Self {
        Self {
            driver,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::default(),
            idle_ticks: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(policy = %self.driver.policy_name(), "starting interactive session");

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        let flushed = self.driver.flush();
        tracing::info!(
            games = self.metrics.games_played,
            high_score = %self.metrics.format_high_score(),
            "session ended"
        );

        result.and(flushed)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.update_game()?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let status = self.status_line();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.driver.state(), &self.metrics, &status);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => self.driver.steer(direction),
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::Speed(speed) => self.change_speed(speed, tick_timer),
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) -> Result<()> {
        if !self.driver.state().is_alive() {
            if self.driver.is_autonomous() {
                self.idle_ticks += 1;
                if self.idle_ticks >= RESTART_DELAY_TICKS {
                    self.reset_game();
                }
            }
            return Ok(());
        }

        if let Some(tick) = self.driver.tick()? {
            if tick.result.terminated {
                self.metrics.on_game_over(self.driver.state().score);
            }
        }

        Ok(())
    }

    fn reset_game(&mut self) {
        self.driver.reset();
        self.metrics.on_game_start();
        self.idle_ticks = 0;
    }

    fn change_speed(&mut self, speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = speed;
        *tick_timer = interval(speed.tick_interval());
        tracing::debug!(speed = speed.as_str(), "speed changed");
    }

    fn status_line(&self) -> StatusLine {
        StatusLine {
            policy: self.driver.policy_name(),
            episode: self.driver.episode(),
            speed: self.speed.as_str(),
            paused: self.paused,
            autonomous: self.driver.is_autonomous(),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
