use async_trait::async_trait;
use crate::models::chat::{ ConversationId, ConversationSummary };

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmPrompt {
    pub fn delete_conversation(conversation: &ConversationSummary) -> Self {
        Self {
            title: format!(
                "Are you sure you want to delete conversation {}?",
                conversation.display_index()
            ),
            confirm_label: "Yes".to_string(),
            cancel_label: "No".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
    /// Closed without picking either button.
    Dismissed,
}

/// Presents a yes/no choice to the user.
#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> Confirmation;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletionPhase {
    #[default]
    Idle,
    Confirming(ConversationId),
    Confirmed(ConversationId),
    Cancelled(ConversationId),
}

impl DeletionPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, DeletionPhase::Confirming(_) | DeletionPhase::Confirmed(_))
    }
}
