use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use crate::models::chat::{
    ActiveConversation,
    ConversationId,
    ConversationSummary,
    Delivery,
    Message,
};
use super::confirm::{ Confirmation, DeletionPhase };
use super::notice::Notice;

const MAX_NOTICES: usize = 8;

/// What happens to an optimistic user message whose send request failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendFailurePolicy {
    /// Leave it in place, displayed as if it had been sent.
    #[default]
    Keep,
    MarkFailed,
    Rollback,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseSendFailurePolicyError {
    message: String,
}

impl fmt::Display for ParseSendFailurePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseSendFailurePolicyError {}

impl FromStr for SendFailurePolicy {
    type Err = ParseSendFailurePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(SendFailurePolicy::Keep),
            "mark" | "mark-failed" => Ok(SendFailurePolicy::MarkFailed),
            "rollback" => Ok(SendFailurePolicy::Rollback),
            _ =>
                Err(ParseSendFailurePolicyError {
                    message: format!("Invalid send failure policy: '{}' (expected keep, mark or rollback)", s),
                }),
        }
    }
}

/// Every state transition the dashboard can make.
#[derive(Debug, Clone)]
pub enum Action {
    /// Issues a new list generation and raises the list loading flag.
    ConversationsRequested,
    ConversationsLoaded {
        generation: u64,
        conversations: Vec<ConversationSummary>,
    },
    ConversationsFailed {
        generation: u64,
    },
    ConversationCreated(ConversationSummary),
    ListToggled,
    /// Issues a new selection generation and raises the message loading flag.
    SelectionStarted,
    /// `messages` is `None` when the fetch failed.
    SelectionFinished {
        generation: u64,
        summary: ConversationSummary,
        messages: Option<Vec<Message>>,
    },
    DraftChanged(String),
    /// Appends the draft as a pending user message under a fresh ticket and clears the draft.
    MessageSubmitted,
    RepliesReceived {
        conversation_id: ConversationId,
        ticket: u64,
        replies: Vec<Message>,
    },
    SendFailed {
        conversation_id: ConversationId,
        ticket: u64,
        policy: SendFailurePolicy,
    },
    DeletionRequested(ConversationId),
    DeletionAnswered(Confirmation),
    ConversationRemoved(ConversationId),
    DeletionFinished,
    NoticePosted(Notice),
}

/// In-memory view state of the dashboard.
///
/// All mutation goes through [`DashboardState::apply`], which returns whether the
/// action was accepted. Rejected actions leave the state untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    conversations: Vec<ConversationSummary>,
    current: Option<ActiveConversation>,
    draft: String,
    loading_conversations: bool,
    loading_messages: bool,
    list_open: bool,
    selection_generation: u64,
    list_generation: u64,
    /// Generation of the list fetch still in flight, if any.
    pending_list: Option<u64>,
    created_during_load: Vec<ConversationSummary>,
    removed_during_load: Vec<ConversationId>,
    ticket: u64,
    deletion: DeletionPhase,
    notices: VecDeque<Notice>,
    revision: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    pub fn find_conversation(&self, id: ConversationId) -> Option<ConversationSummary> {
        self.conversations.iter().copied().find(|c| c.id == id)
    }

    pub fn current(&self) -> Option<&ActiveConversation> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<ConversationId> {
        self.current.as_ref().map(|c| c.id())
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn loading_conversations(&self) -> bool {
        self.loading_conversations
    }

    pub fn loading_messages(&self) -> bool {
        self.loading_messages
    }

    pub fn list_open(&self) -> bool {
        self.list_open
    }

    pub fn selection_generation(&self) -> u64 {
        self.selection_generation
    }

    pub fn list_generation(&self) -> u64 {
        self.list_generation
    }

    /// Ticket handed out by the most recent `MessageSubmitted`.
    pub fn issued_ticket(&self) -> u64 {
        self.ticket
    }

    pub fn deletion(&self) -> DeletionPhase {
        self.deletion
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Bumped on every accepted action.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether an Enter press would send the current draft.
    pub fn can_submit(&self) -> bool {
        self.current.is_some() && !self.draft.trim().is_empty()
    }

    pub fn apply(&mut self, action: Action) -> bool {
        let accepted = self.reduce(action);
        if accepted {
            self.revision += 1;
        }
        accepted
    }

    fn reduce(&mut self, action: Action) -> bool {
        match action {
            Action::ConversationsRequested => {
                self.list_generation += 1;
                self.pending_list = Some(self.list_generation);
                self.loading_conversations = true;
                true
            }
            Action::ConversationsLoaded { generation, conversations } => {
                if self.pending_list != Some(generation) {
                    return false;
                }
                self.loading_conversations = false;
                self.pending_list = None;
                // Local creates and deletes made while the fetch ran win over its snapshot.
                let removed = std::mem::take(&mut self.removed_during_load);
                let created = std::mem::take(&mut self.created_during_load);
                let mut merged: Vec<ConversationSummary> = conversations
                    .into_iter()
                    .filter(|c| !removed.contains(&c.id))
                    .collect();
                for summary in created {
                    if !removed.contains(&summary.id) && !merged.iter().any(|c| c.id == summary.id) {
                        merged.push(summary);
                    }
                }
                self.conversations = merged;
                if let Some(id) = self.current_id() {
                    if self.find_conversation(id).is_none() {
                        self.current = None;
                    }
                }
                true
            }
            Action::ConversationsFailed { generation } => {
                if self.pending_list != Some(generation) {
                    return false;
                }
                self.loading_conversations = false;
                self.pending_list = None;
                self.created_during_load.clear();
                self.removed_during_load.clear();
                true
            }
            Action::ConversationCreated(summary) => {
                if self.find_conversation(summary.id).is_none() {
                    self.conversations.push(summary);
                }
                if self.pending_list.is_some() {
                    self.created_during_load.push(summary);
                }
                // Any in-flight selection is now stale.
                self.selection_generation += 1;
                self.loading_messages = false;
                self.current = Some(ActiveConversation::new(summary, Vec::new()));
                self.list_open = false;
                true
            }
            Action::ListToggled => {
                self.list_open = !self.list_open;
                true
            }
            Action::SelectionStarted => {
                self.selection_generation += 1;
                self.loading_messages = true;
                true
            }
            Action::SelectionFinished { generation, summary, messages } => {
                if generation != self.selection_generation {
                    return false;
                }
                self.loading_messages = false;
                self.list_open = false;
                if self.find_conversation(summary.id).is_some() {
                    self.current = Some(
                        ActiveConversation::new(summary, messages.unwrap_or_default())
                    );
                }
                true
            }
            Action::DraftChanged(text) => {
                self.draft = text;
                true
            }
            Action::MessageSubmitted => {
                if !self.can_submit() {
                    return false;
                }
                self.ticket += 1;
                let text = std::mem::take(&mut self.draft);
                let ticket = self.ticket;
                if let Some(current) = self.current.as_mut() {
                    let mut message = Message::user(text);
                    message.delivery = Delivery::Pending(ticket);
                    current.messages.push(message);
                }
                true
            }
            Action::RepliesReceived { conversation_id, ticket, replies } => {
                let Some(current) = self.current_for(conversation_id) else {
                    return false;
                };
                // A refetch since the send already holds the server's copy of this exchange.
                let Some(sent) = find_pending(&mut current.messages, ticket) else {
                    return false;
                };
                sent.delivery = Delivery::Delivered;
                current.messages.extend(replies);
                true
            }
            Action::SendFailed { conversation_id, ticket, policy } => {
                let Some(current) = self.current_for(conversation_id) else {
                    return false;
                };
                match policy {
                    SendFailurePolicy::Keep | SendFailurePolicy::MarkFailed => {
                        let Some(sent) = find_pending(&mut current.messages, ticket) else {
                            return false;
                        };
                        sent.delivery = if policy == SendFailurePolicy::Keep {
                            Delivery::Delivered
                        } else {
                            Delivery::Failed
                        };
                    }
                    SendFailurePolicy::Rollback => {
                        let before = current.messages.len();
                        current.messages.retain(|m| m.delivery != Delivery::Pending(ticket));
                        if current.messages.len() == before {
                            return false;
                        }
                    }
                }
                true
            }
            Action::DeletionRequested(id) => {
                if self.deletion.is_busy() || self.find_conversation(id).is_none() {
                    return false;
                }
                self.deletion = DeletionPhase::Confirming(id);
                true
            }
            Action::DeletionAnswered(answer) => {
                let DeletionPhase::Confirming(id) = self.deletion else {
                    return false;
                };
                self.deletion = match answer {
                    Confirmation::Confirmed => DeletionPhase::Confirmed(id),
                    Confirmation::Cancelled | Confirmation::Dismissed => DeletionPhase::Cancelled(id),
                };
                true
            }
            Action::ConversationRemoved(id) => {
                if self.deletion != DeletionPhase::Confirmed(id) {
                    return false;
                }
                self.conversations.retain(|c| c.id != id);
                if self.pending_list.is_some() {
                    self.removed_during_load.push(id);
                }
                if self.current_id() == Some(id) {
                    self.current = None;
                }
                self.deletion = DeletionPhase::Idle;
                true
            }
            Action::DeletionFinished => {
                self.deletion = DeletionPhase::Idle;
                true
            }
            Action::NoticePosted(notice) => {
                if self.notices.len() == MAX_NOTICES {
                    self.notices.pop_front();
                }
                self.notices.push_back(notice);
                true
            }
        }
    }

    fn current_for(&mut self, conversation_id: ConversationId) -> Option<&mut ActiveConversation> {
        self.current.as_mut().filter(|c| c.id() == conversation_id)
    }
}

fn find_pending(messages: &mut [Message], ticket: u64) -> Option<&mut Message> {
    messages.iter_mut().rev().find(|m| m.delivery == Delivery::Pending(ticket))
}
