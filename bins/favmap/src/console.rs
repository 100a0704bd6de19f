//! Terminal notices

use favmap_cli::Status;
use favmap_web::{Notice, NoticeLevel, Notifier, RecordingNotifier};

/// Prints notices as status lines and keeps them for JSON output.
///
/// Nothing is printed in JSON mode; the notices end up in the command's
/// JSON document instead.
pub struct ConsoleNotifier {
    echo: bool,
    seen: RecordingNotifier,
}

impl ConsoleNotifier {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            seen: RecordingNotifier::new(),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.seen.notices()
    }

    pub fn last(&self) -> Option<Notice> {
        self.seen.last()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::info!(notice = %notice, "User notice");
        self.seen.notify(notice);

        if !self.echo {
            return;
        }
        match notice.level() {
            NoticeLevel::Success => Status::success(notice.message()),
            NoticeLevel::Warning => Status::warning(notice.message()),
            NoticeLevel::Error => Status::error(notice.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_notices_in_order() {
        let notifier = ConsoleNotifier::new(false);
        notifier.notify(&Notice::AlreadySaved);
        notifier.notify(&Notice::Deleted("삭제되었습니다".into()));

        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.last(), Some(Notice::Deleted("삭제되었습니다".into())));
    }
}
