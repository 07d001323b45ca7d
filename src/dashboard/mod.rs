pub mod confirm;
pub mod notice;
pub mod state;

use std::sync::Arc;
use log::{ debug, error, info, warn };
use tokio::sync::{ watch, Mutex };
use tokio::task::JoinHandle;
use crate::api::ConversationApi;
use crate::clock::{ ClockConfig, ClockTicker };
use crate::error::{ DashboardError, Result };
use crate::models::chat::{ ConversationId, ConversationSummary, Message };
use self::confirm::{ ConfirmDialog, ConfirmPrompt, Confirmation };
use self::notice::Notice;
use self::state::{ Action, DashboardState, SendFailurePolicy };

/// A key press delivered to the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            _ if name == "Enter" => Key::Enter,
            (Some(c), None) => Key::Char(c),
            _ => Key::Other(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Loaded {
        messages: usize,
    },
    /// A later selection or create took over, or the conversation was
    /// deleted, before this fetch completed. Nothing was shown.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Sent {
        replies: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    Dismissed,
}

/// The conversation dashboard: shared view state plus the operations that keep it
/// in step with the conversation API.
///
/// Cloning is cheap and every clone drives the same state, so operations may be in
/// flight concurrently. The state lock is never held across an API call.
#[derive(Clone)]
pub struct Dashboard {
    api: Arc<dyn ConversationApi>,
    dialog: Arc<dyn ConfirmDialog>,
    state: Arc<Mutex<DashboardState>>,
    changes: Arc<watch::Sender<u64>>,
    send_failure: SendFailurePolicy,
}

impl Dashboard {
    pub fn new(api: Arc<dyn ConversationApi>, dialog: Arc<dyn ConfirmDialog>) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            api,
            dialog,
            state: Arc::new(Mutex::new(DashboardState::new())),
            changes: Arc::new(changes),
            send_failure: SendFailurePolicy::default(),
        }
    }

    pub fn with_send_failure_policy(mut self, policy: SendFailurePolicy) -> Self {
        self.send_failure = policy;
        self
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    /// Yields the state revision after every accepted transition.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Drains pending notices. Does not count as a state change.
    pub async fn take_notices(&self) -> Vec<Notice> {
        self.state.lock().await.take_notices()
    }

    fn commit(&self, state: &mut DashboardState, action: Action) -> bool {
        let accepted = state.apply(action);
        if accepted {
            self.changes.send_replace(state.revision());
        }
        accepted
    }

    async fn dispatch(&self, action: Action) -> bool {
        let mut state = self.state.lock().await;
        self.commit(&mut state, action)
    }

    async fn report(&self, title: &str, err: &DashboardError) {
        error!("{}: {}", title, err);
        self.dispatch(Action::NoticePosted(Notice::error(title, err))).await;
    }

    /// Starts the clock and the initial conversation fetch.
    pub fn mount(&self, clock: ClockConfig) -> MountedDashboard {
        let clock = ClockTicker::start(clock);
        let dashboard = self.clone();
        let loader = tokio::spawn(async move {
            let _ = dashboard.load().await;
        });
        MountedDashboard { dashboard: self.clone(), clock, loader: Some(loader) }
    }

    /// Fetches the conversation list. A fetch overtaken by a newer one is not
    /// applied; creates and deletes made while it ran are kept.
    pub async fn load(&self) -> Result<usize> {
        let generation = {
            let mut state = self.state.lock().await;
            self.commit(&mut state, Action::ConversationsRequested);
            state.list_generation()
        };
        match self.api.list_conversations().await {
            Ok(conversations) => {
                let count = conversations.len();
                info!("Loaded {} conversations", count);
                let applied = self.dispatch(Action::ConversationsLoaded {
                    generation,
                    conversations,
                }).await;
                if !applied {
                    debug!("Discarding stale conversation list (generation {})", generation);
                }
                Ok(count)
            }
            Err(e) => {
                if self.dispatch(Action::ConversationsFailed { generation }).await {
                    self.report("Error fetching conversations", &e).await;
                } else {
                    debug!("Stale conversation list fetch failed: {}", e);
                }
                Err(e)
            }
        }
    }

    pub async fn create(&self) -> Result<ConversationSummary> {
        match self.api.create_conversation().await {
            Ok(summary) => {
                info!("Created conversation {}", summary.id);
                self.dispatch(Action::ConversationCreated(summary)).await;
                Ok(summary)
            }
            Err(e) => {
                self.report("Error creating conversation", &e).await;
                Err(e)
            }
        }
    }

    pub async fn toggle_list(&self) {
        self.dispatch(Action::ListToggled).await;
    }

    pub async fn select(&self, id: ConversationId) -> Result<SelectOutcome> {
        let started = {
            let mut state = self.state.lock().await;
            match state.find_conversation(id) {
                Some(summary) => {
                    self.commit(&mut state, Action::SelectionStarted);
                    Ok((summary, state.selection_generation()))
                }
                None => Err(DashboardError::NotFound(id)),
            }
        };
        let (summary, generation) = match started {
            Ok(started) => started,
            Err(e) => {
                self.report("Error selecting conversation", &e).await;
                return Err(e);
            }
        };

        debug!("Fetching messages for conversation {} (generation {})", id, generation);
        let (messages, failure) = match self.api.list_messages(id).await {
            Ok(fetched) => (Some(fetched.into_iter().map(Message::from).collect::<Vec<_>>()), None),
            Err(e) => (None, Some(e)),
        };
        let count = messages.as_ref().map_or(0, Vec::len);

        let shown = {
            let mut state = self.state.lock().await;
            let applied = self.commit(
                &mut state,
                Action::SelectionFinished { generation, summary, messages }
            );
            // The conversation may have been deleted while its messages were in flight.
            applied && state.current_id() == Some(id)
        };
        if !shown {
            match &failure {
                Some(e) => debug!("Ignoring failed fetch for superseded conversation {}: {}", id, e),
                None => debug!("Discarding stale messages for conversation {}", id),
            }
            return Ok(SelectOutcome::Superseded);
        }
        if let Some(e) = failure {
            self.report("Error fetching conversation messages", &e).await;
            return Err(e);
        }
        Ok(SelectOutcome::Loaded { messages: count })
    }

    pub async fn update_draft(&self, text: impl Into<String>) {
        self.dispatch(Action::DraftChanged(text.into())).await;
    }

    /// Sends the draft when `key` is Enter, the draft is not blank and a
    /// conversation is selected. The user message is shown before the request
    /// goes out.
    pub async fn submit_on_enter(&self, key: Key) -> Result<SubmitOutcome> {
        if key != Key::Enter {
            return Ok(SubmitOutcome::Ignored);
        }

        let (conversation_id, text, ticket) = {
            let mut state = self.state.lock().await;
            let text = state.draft().to_string();
            let Some(conversation_id) = state.current_id() else {
                return Ok(SubmitOutcome::Ignored);
            };
            if !self.commit(&mut state, Action::MessageSubmitted) {
                return Ok(SubmitOutcome::Ignored);
            }
            (conversation_id, text, state.issued_ticket())
        };

        match self.api.send_message(conversation_id, &text).await {
            Ok(replies) => {
                let replies: Vec<Message> = replies.into_iter().map(Message::from).collect();
                let count = replies.len();
                let shown = self.dispatch(Action::RepliesReceived {
                    conversation_id,
                    ticket,
                    replies,
                }).await;
                if !shown {
                    info!(
                        "Conversation {} is no longer selected; {} replies not shown",
                        conversation_id,
                        count
                    );
                }
                Ok(SubmitOutcome::Sent { replies: count })
            }
            Err(e) => {
                self.dispatch(Action::SendFailed {
                    conversation_id,
                    ticket,
                    policy: self.send_failure,
                }).await;
                self.report("Error sending message", &e).await;
                Err(e)
            }
        }
    }

    /// Deletes a conversation after the user confirms it. This is the only
    /// path that removes a conversation.
    pub async fn delete(&self, id: ConversationId) -> Result<DeleteOutcome> {
        let requested = {
            let mut state = self.state.lock().await;
            if state.deletion().is_busy() {
                Err(DashboardError::DeletionInProgress)
            } else {
                match state.find_conversation(id) {
                    Some(summary) => {
                        self.commit(&mut state, Action::DeletionRequested(id));
                        Ok(summary)
                    }
                    None => Err(DashboardError::NotFound(id)),
                }
            }
        };
        let summary = match requested {
            Ok(summary) => summary,
            Err(e) => {
                self.report("Error deleting conversation", &e).await;
                return Err(e);
            }
        };

        let answer = self.dialog.confirm(&ConfirmPrompt::delete_conversation(&summary)).await;
        self.dispatch(Action::DeletionAnswered(answer)).await;

        match answer {
            Confirmation::Confirmed => {
                match self.api.delete_conversation(id).await {
                    Ok(()) => {
                        self.dispatch(Action::ConversationRemoved(id)).await;
                        self.dispatch(Action::NoticePosted(Notice::deleted())).await;
                        info!("Deleted conversation {}", id);
                        Ok(DeleteOutcome::Deleted)
                    }
                    Err(e) => {
                        self.dispatch(Action::DeletionFinished).await;
                        self.report("Error deleting conversation", &e).await;
                        Err(e)
                    }
                }
            }
            Confirmation::Cancelled => {
                self.dispatch(Action::NoticePosted(Notice::delete_cancelled())).await;
                self.dispatch(Action::DeletionFinished).await;
                Ok(DeleteOutcome::Cancelled)
            }
            Confirmation::Dismissed => {
                self.dispatch(Action::DeletionFinished).await;
                Ok(DeleteOutcome::Dismissed)
            }
        }
    }
}

/// A dashboard with its clock running. Dropping it stops the clock.
pub struct MountedDashboard {
    dashboard: Dashboard,
    clock: ClockTicker,
    loader: Option<JoinHandle<()>>,
}

impl MountedDashboard {
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn clock(&self) -> watch::Receiver<String> {
        self.clock.subscribe()
    }

    /// Waits for the initial conversation fetch to finish.
    pub async fn loaded(&mut self) {
        if let Some(loader) = self.loader.take() {
            if let Err(e) = loader.await {
                warn!("Initial conversation load did not complete: {}", e);
            }
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for MountedDashboard {
    fn drop(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.abort();
        }
        debug!("Dashboard unmounted");
    }
}
