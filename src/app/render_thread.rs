//! Background render thread.
//!
//! The thread owns the terminal, including raw mode and the alternate
//! screen, and draws [`ViewProps`] snapshots sent from the event loop.
//! The loop stays free to service store events and input while a frame
//! is being drawn.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::controller::ViewProps;

pub enum RenderCommand {
    Render(Box<ViewProps>),
    Shutdown,
}

pub struct RenderThread {
    cmd_tx: SyncSender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    pub fn spawn() -> io::Result<Self> {
        // Capacity 1: only the latest frame matters.
        let (cmd_tx, cmd_rx) = mpsc::sync_channel::<RenderCommand>(1);

        let handle = thread::spawn(move || {
            let mut terminal = match setup_terminal() {
                Ok(terminal) => terminal,
                Err(e) => {
                    tracing::error!("Failed to set up terminal: {}", e);
                    return;
                }
            };

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    RenderCommand::Render(props) => {
                        if let Err(e) = terminal.draw(|f| crate::ui::render(f, &props)) {
                            tracing::error!("Render error: {}", e);
                        }
                    }
                    RenderCommand::Shutdown => break,
                }
            }

            restore_terminal(&mut terminal);
        });

        Ok(Self {
            cmd_tx,
            handle: Some(handle),
        })
    }

    /// Queue a frame without blocking. A frame that arrives while the
    /// previous one is still drawing is simply skipped; the next call
    /// carries newer props anyway.
    pub fn render(&self, props: ViewProps) {
        match self.cmd_tx.try_send(RenderCommand::Render(Box::new(props))) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Render thread busy, skipping frame");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Render thread disconnected");
            }
        }
    }

    /// Stop the thread and wait for terminal teardown to finish.
    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(RenderCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(e);
    }
    match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            disable_raw_mode().ok();
            Err(e)
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
}
