#![allow(dead_code)]

use async_trait::async_trait;
use chat_dashboard::api::ConversationApi;
use chat_dashboard::dashboard::confirm::{ ConfirmDialog, ConfirmPrompt, Confirmation };
use chat_dashboard::dashboard::Dashboard;
use chat_dashboard::error::{ DashboardError, Result };
use chat_dashboard::models::chat::{ ApiMessage, ConversationId, ConversationSummary };
use std::collections::{ HashMap, VecDeque };
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Arc, Mutex };
use tokio::sync::oneshot;

/// In-memory `ConversationApi` with scripted results and call recording.
#[derive(Default)]
pub struct ScriptedApi {
    conversations: Mutex<Vec<ConversationSummary>>,
    messages: Mutex<HashMap<ConversationId, Vec<ApiMessage>>>,
    replies: Mutex<VecDeque<Vec<ApiMessage>>>,
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    message_gates: Mutex<HashMap<ConversationId, VecDeque<oneshot::Receiver<()>>>>,
    send_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
    pub fail_list: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_messages: AtomicBool,
    pub fail_send: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl ScriptedApi {
    pub fn with_conversations(ids: &[ConversationId]) -> Arc<Self> {
        let api = Self::default();
        *api.conversations.lock().unwrap() = ids.iter().map(|id| ConversationSummary::new(*id)).collect();
        Arc::new(api)
    }

    pub fn set_messages(&self, id: ConversationId, contents: &[&str]) {
        let messages = contents.iter().map(|c| ApiMessage::bot(*c)).collect();
        self.messages.lock().unwrap().insert(id, messages);
    }

    pub fn push_reply(&self, contents: &[&str]) {
        let reply = contents.iter().map(|c| ApiMessage::bot(*c)).collect();
        self.replies.lock().unwrap().push_back(reply);
    }

    /// The next `list_conversations` snapshots the list, then waits until the
    /// returned sender fires.
    pub fn hold_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.list_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// The next `list_messages(id)` waits until the returned sender fires.
    pub fn hold_messages(&self, id: ConversationId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.message_gates.lock().unwrap().entry(id).or_default().push_back(rx);
        tx
    }

    /// The next `send_message` waits until the returned sender fires.
    pub fn hold_next_send(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.send_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(DashboardError::Unavailable(format!("{} failed", what)));
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationApi for ScriptedApi {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        self.record("list".to_string());
        let listed = self.conversations.lock().unwrap().clone();
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Self::check(&self.fail_list, "list")?;
        Ok(listed)
    }

    async fn create_conversation(&self) -> Result<ConversationSummary> {
        self.record("create".to_string());
        Self::check(&self.fail_create, "create")?;
        let mut conversations = self.conversations.lock().unwrap();
        let id = conversations.iter().map(|c| c.id + 1).max().unwrap_or(0);
        let summary = ConversationSummary::new(id);
        conversations.push(summary);
        Ok(summary)
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<ApiMessage>> {
        self.record(format!("messages {}", conversation_id));
        let gate = self.message_gates
            .lock()
            .unwrap()
            .get_mut(&conversation_id)
            .and_then(|gates| gates.pop_front());
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Self::check(&self.fail_messages, "messages")?;
        Ok(self.messages.lock().unwrap().get(&conversation_id).cloned().unwrap_or_default())
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str
    ) -> Result<Vec<ApiMessage>> {
        self.record(format!("send {} {}", conversation_id, text));
        // Take the reply before waiting so replies pair with send order.
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_default();
        let gate = self.send_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Self::check(&self.fail_send, "send")?;
        Ok(reply)
    }

    async fn delete_conversation(&self, conversation_id: ConversationId) -> Result<()> {
        self.record(format!("delete {}", conversation_id));
        Self::check(&self.fail_delete, "delete")?;
        self.conversations.lock().unwrap().retain(|c| c.id != conversation_id);
        Ok(())
    }
}

/// Answers confirmations from a script and records the prompts it was shown.
pub struct ScriptedDialog {
    answers: Mutex<VecDeque<Confirmation>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedDialog {
    pub fn answering(answers: &[Confirmation]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            gate: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// The next confirmation waits until the returned sender fires.
    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmDialog for ScriptedDialog {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> Confirmation {
        self.prompts.lock().unwrap().push(prompt.clone());
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.answers.lock().unwrap().pop_front().unwrap_or(Confirmation::Dismissed)
    }
}

pub fn dashboard(api: &Arc<ScriptedApi>, dialog: &Arc<ScriptedDialog>) -> Dashboard {
    Dashboard::new(api.clone(), dialog.clone())
}

/// A dashboard over `ids` with the list already loaded.
pub async fn loaded(ids: &[ConversationId]) -> (Arc<ScriptedApi>, Dashboard) {
    let api = ScriptedApi::with_conversations(ids);
    let board = dashboard(&api, &ScriptedDialog::answering(&[]));
    board.load().await.unwrap();
    (api, board)
}
