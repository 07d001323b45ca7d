use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient, user-visible acknowledgment or failure report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, title: title.into(), body: body.into() }
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), body: body.into() }
    }

    pub fn error(title: impl Into<String>, body: impl fmt::Display) -> Self {
        Self { level: NoticeLevel::Error, title: title.into(), body: body.to_string() }
    }

    pub fn deleted() -> Self {
        Self::success("Deleted!", "Your conversation has been deleted.")
    }

    pub fn delete_cancelled() -> Self {
        Self::info("Cancelled", "Your conversation is safe :)")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}: {}", tag, self.title, self.body)
    }
}
