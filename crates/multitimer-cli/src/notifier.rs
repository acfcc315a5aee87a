use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use multitimer_core::{Config, LogNotifier, Notifier};

/// Shows completion alerts through the desktop notification daemon.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

/// Stable notification id for a dedupe tag. The daemon replaces a shown
/// notification carrying the same id instead of stacking a duplicate.
pub fn notification_id(dedupe_tag: &str) -> u32 {
    let mut hasher = DefaultHasher::new();
    dedupe_tag.hash(&mut hasher);
    // Zero asks the daemon to allocate a fresh id.
    (hasher.finish() as u32).max(1)
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, dedupe_tag: &str) {
        let mut notification = notify_rust::Notification::new();
        notification.appname("multitimer").summary(title);
        #[cfg(all(unix, not(target_os = "macos")))]
        notification
            .id(notification_id(dedupe_tag))
            .hint(notify_rust::Hint::Custom("x-multitimer-tag".into(), dedupe_tag.into()));
        let shown = notification.show();
        match shown {
            Ok(_) => tracing::debug!(tag = dedupe_tag, "desktop notification shown"),
            Err(e) => {
                tracing::warn!(tag = dedupe_tag, "desktop notification failed: {e}");
                LogNotifier.notify(title, dedupe_tag);
            }
        }
    }
}

pub enum CliNotifier {
    Desktop(DesktopNotifier),
    Log(LogNotifier),
}

impl CliNotifier {
    pub fn from_config(config: &Config, no_notify: bool) -> Self {
        if no_notify || !config.notifications.enabled || !config.notifications.desktop {
            Self::Log(LogNotifier)
        } else {
            Self::Desktop(DesktopNotifier)
        }
    }
}

impl Notifier for CliNotifier {
    fn notify(&self, title: &str, dedupe_tag: &str) {
        match self {
            CliNotifier::Desktop(n) => n.notify(title, dedupe_tag),
            CliNotifier::Log(n) => n.notify(title, dedupe_tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_id_follows_tag() {
        let a = notification_id("tea-1a2b3c4d-1797000000000");
        assert_eq!(a, notification_id("tea-1a2b3c4d-1797000000000"));
        assert_ne!(a, notification_id("tea-9f8e7d6c-1797000000000"));
        assert_ne!(a, 0);
    }

    #[test]
    fn no_notify_flag_selects_log_notifier() {
        let notifier = CliNotifier::from_config(&Config::default(), true);
        assert!(matches!(notifier, CliNotifier::Log(_)));
    }
}
