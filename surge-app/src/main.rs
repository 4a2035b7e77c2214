//! SURGE - hold-to-speed terminal player
//!
//! Hold Ctrl, `z` or Right to play faster; release to return to the speed
//! you had before.

mod logging;
mod player;

use std::io::{self, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyboardEnhancementFlags, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tracing::{debug, info, trace, warn};

use surge_config::{format_speed, Config};
use surge_core::{DeferredAction, RateSource, SpeedController};
use surge_input::{translate_key, Command, InputHandler, KeyPhase, StepDirection};
use surge_tui::{
    App, HelpWidget, OverlayWidget, PlayerWidget, SpeedBarWidget, StatusBarWidget, Theme,
};

use crate::player::{OverlayState, SimulatedMedia};

/// Frame rate for UI updates
const FPS: u64 = 30;

type Controller = SpeedController<SimulatedMedia, OverlayState>;

fn main() -> anyhow::Result<()> {
    let log_path = logging::log_path();
    logging::init(&log_path)?;
    info!(log = %log_path.display(), "SURGE starting");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange, EnableMouseCapture)?;

    // Key releases need the enhancement protocol
    let releases = supports_keyboard_enhancement().unwrap_or(false);
    if releases {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_input = shutdown.clone();

    // Spawn input thread
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let input_handle = thread::spawn(move || {
        run_input_thread(event_tx, shutdown_input);
    });

    // Run main event loop
    let result = run_app(&mut terminal, event_rx, releases);

    // Cleanup
    shutdown.store(true, Ordering::SeqCst);
    if releases {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Wait for input thread
    let _ = input_handle.join();

    if let Err(ref e) = result {
        warn!(error = %e, "SURGE exited with error");
    }
    result
}

/// Forward terminal events to the UI thread until shutdown
fn run_input_thread(event_tx: Sender<Event>, shutdown: Arc<AtomicBool>) {
    while !shutdown.load(Ordering::Relaxed) {
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read terminal event");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "failed to poll terminal events");
                break;
            }
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    event_rx: Receiver<Event>,
    releases: bool,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let mut input_handler = InputHandler::new();

    // Load user config (multipliers, timings, speed options)
    let mut config = Config::load();
    app.state.menu = config.menu.clone();
    if let Some(ref name) = config.theme {
        if let Some(theme) = Theme::by_name(name) {
            app.state.theme = theme;
        }
    }

    let mut controller: Controller = SpeedController::new(
        config.speed_config(),
        SimulatedMedia::demo(),
        OverlayState::default(),
    );

    if releases {
        app.state.set_message("SURGE | Hold Ctrl, z or → to speed up. ? for help");
    } else {
        warn!("terminal does not report key releases");
        app.state.set_warning(
            "Terminal does not report key releases; held keys end on focus loss or timeout",
        );
    }
    sync_view(&mut app, &mut controller);
    app.state.refresh_highlight();

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();
    let mut last_advance = Instant::now();

    loop {
        if app.should_quit {
            break;
        }

        let now = Instant::now();
        controller
            .media_mut()
            .advance(now.saturating_duration_since(last_advance));
        last_advance = now;

        // Scheduled work: long-press timer, watchdog poll, pointer recheck
        if controller.next_deadline().is_some_and(|d| d <= now) {
            controller.tick(now);
        }

        sync_view(&mut app, &mut controller);
        app.state.frame_count = app.state.frame_count.wrapping_add(1);

        if last_frame.elapsed() >= frame_duration {
            terminal.draw(|frame| {
                render_ui(frame, &app, controller.is_overriding());
            })?;
            last_frame = Instant::now();
        }

        // Sleep until the next frame or the controller's next deadline
        let now = Instant::now();
        let mut wake = last_frame + frame_duration;
        if let Some(deadline) = controller.next_deadline() {
            wake = wake.min(deadline);
        }
        let timeout = wake.saturating_duration_since(now);

        match event_rx.recv_timeout(timeout) {
            Ok(event) => {
                handle_event(&mut app, &mut input_handler, &mut controller, &mut config, event);
                // Drain whatever queued up behind it
                while let Ok(event) = event_rx.try_recv() {
                    handle_event(&mut app, &mut input_handler, &mut controller, &mut config, event);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                warn!("input thread stopped");
                break;
            }
        }
    }

    info!("SURGE shutting down");
    Ok(())
}

/// Copy media and overlay state into the UI, and run the rate-change observer
fn sync_view(app: &mut App, controller: &mut Controller) {
    app.state.player = controller.media().view();
    app.state.overlay = controller.notifier().visible();

    let mut refresh = controller.notifier_mut().take_refresh();
    if let Some(rate) = controller.media_mut().take_rate_change() {
        // Override writes are the controller's own; only user changes count
        if controller.is_overriding() {
            trace!(rate, "rate change during override");
        } else {
            debug!(rate, "rate changed");
            refresh = true;
        }
    }
    if refresh {
        app.state.refresh_highlight();
    }
}

fn handle_event(
    app: &mut App,
    input: &mut InputHandler,
    controller: &mut Controller,
    config: &mut Config,
    event: Event,
) {
    let now = Instant::now();
    match event {
        Event::Key(key) => {
            let (phase, gesture) = translate_key(&key, input.is_editing());
            let response = match phase {
                KeyPhase::Down => controller.key_down(&gesture, now),
                KeyPhase::Up => controller.key_up(&gesture, now),
            };

            if let Some(DeferredAction::SkipForward(step)) = response.deferred {
                app.state
                    .set_message(format!("Skipped +{}s", step.as_secs_f64()));
            }
            if response.suppress_default {
                return;
            }

            if let Some(cmd) = input.handle_key(key) {
                handle_command(app, controller, config, cmd);
            }
            app.state.set_mode(input.mode());
            app.state.command_buffer = input.command_buffer().to_string();
        }
        Event::FocusLost => controller.focus_lost(),
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
            controller.pointer_down(now);
        }
        _ => {}
    }
}

fn handle_command(app: &mut App, controller: &mut Controller, config: &mut Config, cmd: Command) {
    match cmd {
        // Playback
        Command::TogglePlay => match controller.media_mut().toggle_play() {
            Some(true) => app.state.set_message("▶ Playing"),
            Some(false) => app.state.set_message("❚❚ Paused"),
            None => app.state.set_error("No media loaded"),
        },
        Command::SkipBack => {
            let step = controller.config().seek_step.as_secs_f64();
            controller.media_mut().skip(-step);
        }

        // Speed selection
        Command::SelectSpeed(speed) => select_speed(app, controller, speed),
        Command::SelectVisible(index) => match app.state.menu.visible().get(index).copied() {
            Some(speed) => select_speed(app, controller, speed),
            None => app.state.set_warning(format!("No speed option {}", index + 1)),
        },
        Command::StepSpeed(direction) => {
            let Some(rate) = controller.media().current_rate() else {
                app.state.set_error("No media loaded");
                return;
            };
            let up = direction == StepDirection::Up;
            match app.state.menu.step_from(rate, up) {
                Some(speed) => select_speed(app, controller, speed),
                None => app.state.set_message(if up {
                    "Already at the fastest visible speed"
                } else {
                    "Already at the slowest visible speed"
                }),
            }
        }

        // Speed options
        Command::AddSpeed(speed) => match app.state.menu.add_custom(speed) {
            Ok(added) => {
                app.state.set_success(format!("Added {}x", format_speed(added)));
                save_menu(app, config);
            }
            Err(e) => app.state.set_error(e.to_string()),
        },
        Command::RemoveSpeed(speed) => match app.state.menu.remove_custom(speed) {
            Ok(()) => {
                app.state.set_success(format!("Removed {}x", format_speed(speed)));
                save_menu(app, config);
            }
            Err(e) => app.state.set_error(e.to_string()),
        },
        Command::ToggleSpeed(speed) => match app.state.menu.toggle_visible(speed) {
            Ok(visible) => {
                let verb = if visible { "Showing" } else { "Hiding" };
                app.state
                    .set_success(format!("{} {}x", verb, format_speed(speed)));
                save_menu(app, config);
            }
            Err(e) => app.state.set_error(e.to_string()),
        },

        // Media element
        Command::Eject => {
            if controller.media_mut().eject() {
                info!("media ejected");
                app.state.set_warning("Media ejected (:load to restore)");
            } else {
                app.state.set_error("No media loaded");
            }
        }
        Command::Load => {
            if controller.media_mut().load() {
                info!("media loaded");
                app.state.set_success("Media loaded");
            } else {
                app.state.set_message("Media already loaded");
            }
        }

        // UI
        Command::ToggleHelp => app.state.toggle_help(),
        Command::SetTheme(name) => {
            if app.state.set_theme(&name) {
                config.theme = Some(app.state.theme.name.to_string());
                save_config(app, config);
            }
        }

        Command::EnterCommandMode | Command::EnterNormalMode => {}
        Command::Cancel => app.state.clear_message(),
        Command::Quit => app.quit(),
        Command::ExecuteCommand(line) => {
            app.state.set_error(format!("Unknown command: {}", line));
        }
    }
}

fn select_speed(app: &mut App, controller: &mut Controller, speed: f64) {
    if controller.media().current_rate().is_none() {
        app.state.set_error("No media loaded");
        return;
    }
    controller.select_rate(speed);
    app.state.set_message(format!("Speed {}x", format_speed(speed)));
}

fn save_menu(app: &mut App, config: &mut Config) {
    config.menu = app.state.menu.clone();
    app.state.refresh_highlight();
    save_config(app, config);
}

fn save_config(app: &mut App, config: &Config) {
    if let Err(e) = config.save() {
        warn!(error = %e, "failed to save config");
        app.state.set_warning(format!("Could not save config: {}", e));
    }
}

fn render_ui(frame: &mut ratatui::Frame, app: &App, overriding: bool) {
    let area = frame.area();
    let state = &app.state;
    let theme = &state.theme;

    // Clear with background
    let block = ratatui::widgets::Block::default().style(theme.normal());
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Length(5), // Player
        Constraint::Length(3), // Speed bar
        Constraint::Min(0),    // Stage for the overlay
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], theme);
    frame.render_widget(
        PlayerWidget::new(&state.player, theme).overriding(overriding),
        chunks[1],
    );
    frame.render_widget(
        SpeedBarWidget::new(&state.menu, theme).highlighted(state.highlighted),
        chunks[2],
    );
    frame.render_widget(
        StatusBarWidget::new(state.mode, &state.command_buffer, theme)
            .message(state.message.as_deref(), state.message_type),
        chunks[4],
    );

    if let Some(text) = state.overlay_text() {
        let stage = if chunks[3].height >= 3 {
            chunks[3]
        } else {
            area
        };
        frame.render_widget(OverlayWidget::new(&text, theme), stage);
    }

    if state.show_help {
        let help_area = centered_rect(56, 30, area);
        frame.render_widget(HelpWidget::new(theme), help_area);
    }
}

fn render_title(frame: &mut ratatui::Frame, area: Rect, theme: &Theme) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let title_text = " SURGE ";
    let width = area.width as usize;
    let padding = width.saturating_sub(title_text.len()) / 2;
    let rest = width.saturating_sub(padding + title_text.len());
    let padded = format!(
        "{:═<pad$}{}{:═<rest$}",
        "",
        title_text,
        "",
        pad = padding,
        rest = rest
    );

    let line = Line::from(Span::styled(padded, theme.title()));
    frame.render_widget(Paragraph::new(line), area);
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
