use std::fmt::Write;
use crate::dashboard::state::DashboardState;
use crate::models::chat::{ Delivery, Message, MessageKind };

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// List and conversation side by side (stacked in the terminal).
    #[default]
    Wide,
    /// Only one section at a time, switched with the list toggle.
    Compact,
}

const RULE_WIDTH: usize = 48;

fn rule(title: &str) -> String {
    let used = title.chars().count() + 4;
    format!("-- {} {}", title, "-".repeat(RULE_WIDTH.saturating_sub(used)))
}

fn header(clock: &str) -> String {
    format!("{}\n  Chatbot{:>width$}\n{}", "=".repeat(RULE_WIDTH), clock, "=".repeat(RULE_WIDTH), width = RULE_WIDTH - 9)
}

fn message_line(message: &Message) -> String {
    match message.kind {
        MessageKind::Bot => format!("  Bot: {}", message.text),
        MessageKind::User => {
            let marker = match message.delivery {
                Delivery::Delivered => "",
                Delivery::Pending(_) => " (sending)",
                Delivery::Failed => " (not sent)",
            };
            format!("  You: {}{}", message.text, marker)
        }
    }
}

fn conversation_list(state: &DashboardState, out: &mut String) {
    let _ = writeln!(out, "{}", rule("Conversations (/new)"));
    if state.loading_conversations() {
        let _ = writeln!(out, "  Loading Conversations...");
        return;
    }
    if state.conversations().is_empty() {
        let _ = writeln!(out, "  (none yet)");
    }
    for convo in state.conversations() {
        let marker = if state.current_id() == Some(convo.id) { '>' } else { ' ' };
        let _ = writeln!(out, "{} {}", marker, convo);
    }
}

fn active_conversation(state: &DashboardState, out: &mut String) {
    let Some(current) = state.current() else {
        let _ = writeln!(out, "{}", rule("Chat"));
        let _ = writeln!(out, "  Select or start a conversation.");
        return;
    };
    let _ = writeln!(out, "{}", rule(&current.summary.to_string()));
    if state.loading_messages() {
        let _ = writeln!(out, "  Loading Messages...");
        return;
    }
    for message in &current.messages {
        let _ = writeln!(out, "{}", message_line(message));
    }
}

/// Renders one frame of the dashboard.
pub fn render(state: &DashboardState, clock: &str, layout: Layout) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header(clock));

    let (show_list, show_chat) = match layout {
        Layout::Wide => (true, true),
        Layout::Compact => (state.list_open(), !state.list_open()),
    };
    if show_list {
        conversation_list(state, &mut out);
    }
    if show_chat {
        active_conversation(state, &mut out);
    }
    out
}
