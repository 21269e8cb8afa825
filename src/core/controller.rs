//! # Conversation Controller
//!
//! Owns the [`ConversationState`], applies actions through the reducer, runs
//! composer calls on spawned tasks, and tells subscribers about every change.
//!
//! ```text
//! submit(text) ──▶ update() ──▶ Effect::Compose ──▶ tokio::spawn(compose)
//!                                                         │
//! poll_replies() / next_reply() ◀── mpsc::unbounded ◀─────┘
//!        │
//!        └──▶ update(ReplyReady { request, .. }) ──▶ listeners
//! ```
//!
//! The controller is the only writer of its state. Tasks are never aborted:
//! `stop()` only stops waiting, and a late reply is still appended.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::emoji::{EmojiLimit, ParseEmojiLimitError};
use crate::core::state::ConversationState;
use crate::inference::PromptComposer;
use crate::visitors::{self, ClientInfo, VisitEvent, VisitorLog};

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&ConversationState) + Send>;

/// Submit number and raw reply text, as sent back by a compose task.
type Reply = (u64, String);

pub struct ConversationController {
    state: ConversationState,
    composer: Arc<PromptComposer>,
    visitors: Option<Arc<dyn VisitorLog>>,
    client: ClientInfo,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
    reply_tx: UnboundedSender<Reply>,
    reply_rx: UnboundedReceiver<Reply>,
    tasks: Vec<JoinHandle<()>>,
}

impl ConversationController {
    pub fn new(composer: Arc<PromptComposer>, emoji_limit: EmojiLimit) -> Self {
        let (reply_tx, reply_rx) = unbounded_channel();
        Self {
            state: ConversationState::new(emoji_limit),
            composer,
            visitors: None,
            client: ClientInfo::default(),
            listeners: Vec::new(),
            next_listener_id: 0,
            reply_tx,
            reply_rx,
            tasks: Vec::new(),
        }
    }

    /// Attaches a visitor log; every accepted submit then records a click for `client`.
    pub fn with_visitor_log(mut self, log: Arc<dyn VisitorLog>, client: ClientInfo) -> Self {
        self.visitors = Some(log);
        self.client = client;
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ConversationState) + Send + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Sends `text` unless it is blank or a reply is already pending.
    /// Returns whether the message was accepted.
    pub fn submit(&mut self, text: impl Into<String>) -> bool {
        match self.dispatch(Action::Submit(text.into())) {
            Effect::Compose {
                text,
                emoji_limit,
                request,
            } => {
                self.spawn_compose(text, emoji_limit, request);
                if let Some(log) = &self.visitors {
                    visitors::notify(log.clone(), VisitEvent::Click, self.client.clone());
                }
                true
            }
            _ => false,
        }
    }

    /// Stops waiting for the pending reply. No-op when idle.
    pub fn stop(&mut self) {
        if self.state.loading {
            info!("Stopped waiting for reply ({} task(s) still running)", self.in_flight());
            self.dispatch(Action::Stop);
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.state.input {
            self.dispatch(Action::InputChanged(text));
        }
    }

    /// Parses and applies a new limit. On error the previous limit is kept.
    pub fn set_emoji_limit(&mut self, raw: &str) -> Result<EmojiLimit, ParseEmojiLimitError> {
        let limit: EmojiLimit = raw.parse()?;
        self.dispatch(Action::SetEmojiLimit(limit));
        Ok(limit)
    }

    /// Returns true once the reducer agrees to quit.
    pub fn quit(&mut self) -> bool {
        matches!(self.dispatch(Action::Quit), Effect::Quit)
    }

    /// Applies every reply that has already arrived. Returns how many were applied.
    pub fn poll_replies(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.apply_reply(reply);
            applied += 1;
        }
        applied
    }

    /// Waits for the next reply and applies it.
    /// Returns false immediately when nothing is in flight.
    pub async fn next_reply(&mut self) -> bool {
        // Tasks send before they finish, so count first and then drain.
        let pending = self.in_flight();
        if let Ok(reply) = self.reply_rx.try_recv() {
            self.apply_reply(reply);
            return true;
        }
        if pending == 0 {
            return false;
        }
        match self.reply_rx.recv().await {
            Some(reply) => {
                self.apply_reply(reply);
                true
            }
            None => false,
        }
    }

    /// Number of composer tasks that have not finished yet.
    pub fn in_flight(&mut self) -> usize {
        self.tasks.retain(|handle| !handle.is_finished());
        self.tasks.len()
    }

    fn apply_reply(&mut self, (request, raw): Reply) {
        debug!("Reply received for request {} (len={})", request, raw.len());
        self.dispatch(Action::ReplyReady { request, raw });
    }

    fn dispatch(&mut self, action: Action) -> Effect {
        debug!("Dispatching {:?}", action);
        let guarded = matches!(action, Action::Submit(_) | Action::Stop | Action::Quit);
        let loading_before = self.state.loading;
        let effect = update(&mut self.state, action);

        // Rejected submits and idle stops leave the state untouched.
        let changed = !guarded
            || matches!(effect, Effect::Compose { .. })
            || self.state.loading != loading_before;
        if changed {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&self.state);
            }
        }
        effect
    }

    fn spawn_compose(&mut self, text: String, emoji_limit: EmojiLimit, request: u64) {
        info!("Spawning compose task {} (emoji_limit={})", request, emoji_limit);
        let composer = self.composer.clone();
        let tx = self.reply_tx.clone();
        let handle = tokio::spawn(async move {
            let reply = composer.compose(&text, emoji_limit).await;
            if tx.send((request, reply)).is_err() {
                warn!("Failed to deliver reply: controller dropped");
            }
        });
        self.tasks.push(handle);
    }
}
