//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! turns keyboard events into calls on the [`ConversationController`].
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (landing page, loading spinner): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms and only redraws on input, a resize, or a
//!   controller change reported through a subscriber.
//!
//! A `SteadyBlock` cursor is used because ratatui's `set_cursor_position`
//! resets the terminal's blink timer on every `draw()`.

mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info};

use crate::core::ConversationController;
use crate::core::config::ResolvedConfig;
use crate::inference::PromptComposer;
use crate::tui::component::EventHandler;
use crate::tui::components::{DialogEvent, EmojiDialog, InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::visitors::{self, ClientInfo, VisitEvent, VisitorLog};

/// TUI-specific presentation state (not part of the conversation state)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Open emoji-limit popup (None = hidden)
    pub emoji_dialog: Option<EmojiDialog>,
    pub model_name: String,
    /// Last notice shown in the title bar (e.g. "Emoji limit set to 6")
    pub status_message: String,
}

impl TuiState {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            emoji_dialog: None,
            model_name: model_name.into(),
            status_message: String::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter be told apart from Enter;
        // terminals without it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// What the loop should do after an event.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Route one event to the dialog, the message list, the controller or the
/// input box. Kept free of terminal I/O so it can be driven from tests.
fn handle_event(controller: &mut ConversationController, tui: &mut TuiState, event: TuiEvent) -> Flow {
    match event {
        TuiEvent::Resize => Flow::Continue,
        TuiEvent::ForceQuit => {
            if controller.quit() {
                Flow::Quit
            } else {
                Flow::Continue
            }
        }
        _ if tui.emoji_dialog.is_some() => {
            handle_dialog_event(controller, tui, &event);
            Flow::Continue
        }
        TuiEvent::OpenEmojiDialog => {
            tui.emoji_dialog = Some(EmojiDialog::new());
            Flow::Continue
        }
        TuiEvent::ScrollUp | TuiEvent::ScrollDown | TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            Flow::Continue
        }
        TuiEvent::Escape if controller.state().loading => {
            controller.stop();
            tui.status_message = "Stopped".to_string();
            Flow::Continue
        }
        TuiEvent::Escape => {
            if controller.quit() {
                Flow::Quit
            } else {
                Flow::Continue
            }
        }
        _ => {
            match tui.input_box.handle_event(&event) {
                Some(InputEvent::Submit(text)) => {
                    if controller.submit(text) {
                        tui.input_box.clear();
                        tui.status_message.clear();
                        tui.message_list.stick_to_bottom = true;
                    }
                }
                Some(InputEvent::Changed) => controller.set_input(tui.input_box.text()),
                None => {}
            }
            Flow::Continue
        }
    }
}

fn handle_dialog_event(controller: &mut ConversationController, tui: &mut TuiState, event: &TuiEvent) {
    let Some(dialog) = tui.emoji_dialog.as_mut() else {
        return;
    };
    match dialog.handle_event(event) {
        Some(DialogEvent::Apply(raw)) => match controller.set_emoji_limit(&raw) {
            Ok(limit) => {
                tui.status_message = format!("Emoji limit set to {limit}");
                tui.emoji_dialog = None;
            }
            Err(e) => dialog.set_error(format!("Enter a whole number ({e})")),
        },
        Some(DialogEvent::Cancel) => tui.emoji_dialog = None,
        None => {}
    }
}

/// Run the interactive chat until the user quits.
///
/// Must be called from inside a multi-threaded tokio runtime: compose calls
/// are spawned onto it while this loop blocks on terminal input.
pub fn run(
    composer: Arc<PromptComposer>,
    config: ResolvedConfig,
    visitors: Option<Arc<dyn VisitorLog>>,
) -> std::io::Result<()> {
    let mut controller = ConversationController::new(composer, config.emoji_limit);
    if let Some(log) = visitors {
        let client = ClientInfo::default();
        visitors::notify(log.clone(), VisitEvent::Visit, client.clone());
        visitors::notify(log.clone(), VisitEvent::PageView, client.clone());
        controller = controller.with_visitor_log(log, client);
    }

    let dirty = Arc::new(AtomicBool::new(true));
    let listener_dirty = dirty.clone();
    controller.subscribe(move |_| listener_dirty.store(true, Ordering::Relaxed));

    let mut tui = TuiState::new(config.gemini_model.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();

    loop {
        let animating = controller.state().loading || !controller.state().has_messages();
        if animating || dirty.swap(false, Ordering::Relaxed) {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, controller.state(), &mut tui, spinner_frame))?;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            dirty.store(true, Ordering::Relaxed);
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut controller, &mut tui, event) == Flow::Quit {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }

        let applied = controller.poll_replies();
        if applied > 0 {
            debug!("Applied {} reply(ies)", applied);
        }
    }

    info!(
        "Leaving chat with {} message(s), {} reply task(s) still running",
        controller.state().messages.len(),
        controller.in_flight()
    );
    ratatui::restore();
    Ok(())
}
