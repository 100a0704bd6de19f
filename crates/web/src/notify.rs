//! User-facing notices
//!
//! The favorites page reports every interaction outcome with one fixed
//! message. [`Notice`] enumerates them; a [`Notifier`] decides how they are
//! shown (alert box, terminal line, test recorder).

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// How prominent a notice is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Confirmation
    Success,
    /// Something the user should fix
    Warning,
    /// The action failed
    Error,
}

/// Outcome messages shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Notice {
    /// Search submitted with a blank keyword
    EmptyKeyword,
    /// Keyword search request failed
    SearchFailed,
    /// Duplicate check found an existing entry
    AlreadySaved,
    /// Create rejected for lack of a session
    SaveLoginRequired,
    /// Create succeeded
    Saved,
    /// Create (or the check before it) failed
    SaveFailed,
    /// Delete rejected for lack of a session
    DeleteLoginRequired,
    /// Delete failed
    DeleteFailed,
    /// Delete succeeded; carries the server's confirmation text
    Deleted(String),
}

impl Notice {
    /// Text shown to the user
    pub fn message(&self) -> &str {
        match self {
            Self::EmptyKeyword => "⚠️ 관광지 이름을 입력하세요.",
            Self::SearchFailed => "❌ 관광지 검색 중 문제가 발생했습니다.",
            Self::AlreadySaved => "⚠️ 이미 저장된 항목입니다.",
            Self::SaveLoginRequired => "❌ 로그인 후 저장할 수 있습니다.",
            Self::Saved => "✅ 즐겨찾기에 저장되었습니다.",
            Self::SaveFailed => "❌ 저장에 실패했습니다.",
            Self::DeleteLoginRequired => "❌ 로그인 후 삭제할 수 있습니다.",
            Self::DeleteFailed => "❌ 삭제에 실패했습니다.",
            Self::Deleted(text) => text,
        }
    }

    /// How the notice is styled
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Saved | Self::Deleted(_) => NoticeLevel::Success,
            Self::EmptyKeyword | Self::AlreadySaved => NoticeLevel::Warning,
            Self::SearchFailed
            | Self::SaveLoginRequired
            | Self::SaveFailed
            | Self::DeleteLoginRequired
            | Self::DeleteFailed => NoticeLevel::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Sink for user notices
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Sends notices to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level() {
            NoticeLevel::Error => tracing::warn!(notice = %notice, "User notice"),
            _ => tracing::info!(notice = %notice, "User notice"),
        }
    }
}

/// Keeps every notice it receives, in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice so far, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent notice
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
