use async_trait::async_trait;
use log::warn;
use tokio::sync::{ mpsc, oneshot };
use crate::dashboard::confirm::{ ConfirmDialog, ConfirmPrompt, Confirmation };

/// A confirmation waiting for the user's next line.
#[derive(Debug)]
pub struct PendingConfirmation {
    pub prompt: ConfirmPrompt,
    pub reply: oneshot::Sender<Confirmation>,
}

/// Forwards prompts to the terminal loop, which owns stdin.
#[derive(Debug, Clone)]
pub struct TerminalConfirmDialog {
    requests: mpsc::Sender<PendingConfirmation>,
}

impl TerminalConfirmDialog {
    pub fn channel() -> (Self, mpsc::Receiver<PendingConfirmation>) {
        let (requests, rx) = mpsc::channel(4);
        (Self { requests }, rx)
    }
}

#[async_trait]
impl ConfirmDialog for TerminalConfirmDialog {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> Confirmation {
        let (reply, answer) = oneshot::channel();
        let pending = PendingConfirmation { prompt: prompt.clone(), reply };
        if self.requests.send(pending).await.is_err() {
            warn!("Terminal closed before confirmation could be shown");
            return Confirmation::Dismissed;
        }
        answer.await.unwrap_or(Confirmation::Dismissed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ConversationSummary;

    #[tokio::test]
    async fn answer_is_relayed_back() {
        let (dialog, mut requests) = TerminalConfirmDialog::channel();
        let responder = tokio::spawn(async move {
            let pending = requests.recv().await.unwrap();
            assert_eq!(pending.prompt.title, "Are you sure you want to delete conversation 3?");
            pending.reply.send(Confirmation::Confirmed).unwrap();
        });

        let prompt = ConfirmPrompt::delete_conversation(&ConversationSummary::new(2));
        assert_eq!(dialog.confirm(&prompt).await, Confirmation::Confirmed);
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn closed_terminal_dismisses() {
        let (dialog, requests) = TerminalConfirmDialog::channel();
        drop(requests);
        let prompt = ConfirmPrompt::delete_conversation(&ConversationSummary::new(0));
        assert_eq!(dialog.confirm(&prompt).await, Confirmation::Dismissed);
    }
}
