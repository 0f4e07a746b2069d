//! Main chat event loop
//!
//! One task owns the `App`. Terminal events arrive from a reader thread,
//! completed side effects arrive as actions, and both are folded into the
//! app before the next frame is drawn.

pub mod executors;
mod keybindings;
mod setup;

pub use self::executors::{CommandExecutor, Services};
pub use self::setup::{bootstrap_session, SessionBootstrap};

use self::keybindings::{handle_key, handle_paste};
use crate::core::app::{
    apply_action, apply_actions, App, AppAction, AppActionDispatcher, ExitReason,
};
use crate::ui::renderer::ui;
use ratatui::crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

type ChatTerminal = Terminal<CrosstermBackend<io::Stdout>>;

const EVENT_POLL: Duration = Duration::from_millis(50);
const TICK: Duration = Duration::from_millis(250);

/// Run the interactive session until the user quits or logs out.
pub async fn run_chat(session: SessionBootstrap) -> Result<ExitReason, Box<dyn Error>> {
    let SessionBootstrap { mut app, services } = session;
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let executor = CommandExecutor::new(services, dispatcher);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_reader = spawn_event_reader(event_tx);

    let result = event_loop(
        &mut terminal,
        &mut app,
        &executor,
        &mut event_rx,
        &mut action_rx,
    )
    .await;

    // The reader thread exits once it sees the channel closed.
    drop(event_rx);
    app.camera.release();
    let restored = restore_terminal(&mut terminal);
    if let Err(err) = event_reader.await {
        warn!(%err, "terminal event reader ended abnormally");
    }

    result?;
    restored?;
    Ok(app.ui.exit_requested.unwrap_or(ExitReason::Quit))
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !event_tx.is_closed() {
            match event::poll(EVENT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(err) => debug!(%err, "terminal read failed"),
                },
                Ok(false) => {}
                Err(err) => {
                    warn!(%err, "terminal poll failed");
                    break;
                }
            }
        }
    })
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    executor: &CommandExecutor,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> Result<(), Box<dyn Error>> {
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal.draw(|f| ui(f, &*app))?;
        if app.ui.exit_requested.is_some() {
            return Ok(());
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                if let Some(action) = handle_terminal_event(app, event, area) {
                    if let Some(command) = apply_action(app, action) {
                        executor.spawn(command);
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                let mut pending = vec![action];
                while let Ok(next) = action_rx.try_recv() {
                    pending.push(next);
                }
                for command in apply_actions(app, pending) {
                    executor.spawn(command);
                }
            }
            _ = tick.tick() => {
                app.ui.expire_status(Instant::now());
            }
        }
    }
}

fn handle_terminal_event(app: &mut App, event: Event, area: Rect) -> Option<AppAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, area),
        Event::Paste(text) => {
            if !app.ui.has_overlay() {
                handle_paste(app, &text);
            }
            None
        }
        _ => None,
    }
}

fn restore_terminal(terminal: &mut ChatTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()
}
