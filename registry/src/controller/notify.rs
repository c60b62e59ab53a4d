use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Blocking message for the user, the equivalent of an alert box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The surface the controller reports to: notifications and the busy indicator
pub trait Notifier {
    fn notify(&self, notification: Notification);

    fn set_busy(&self, busy: bool);
}

/// Shows the busy indicator while alive. Dropping it clears the indicator, so every exit path
/// of a request (success, error, cancellation of the future) hides it.
pub struct BusyIndicator<'a, N: Notifier> {
    notifier: &'a N,
}

impl<'a, N: Notifier> BusyIndicator<'a, N> {
    pub fn show(notifier: &'a N) -> Self {
        log::debug!("Showing busy indicator");
        notifier.set_busy(true);

        Self { notifier }
    }
}

impl<N: Notifier> Drop for BusyIndicator<'_, N> {
    fn drop(&mut self) {
        log::debug!("Hiding busy indicator");
        self.notifier.set_busy(false);
    }
}


#[cfg(test)]
mod tests {
    use super::{test_utils::RecordingNotifier, *};

    #[test]
    fn busy_indicator_clears_on_drop() {
        let notifier = RecordingNotifier::default();

        {
            let _busy = BusyIndicator::show(&notifier);
            assert_eq!(notifier.busy_changes(), vec![true]);
        }

        assert_eq!(notifier.busy_changes(), vec![true, false]);
    }

    #[test]
    fn busy_indicator_clears_on_early_return() {
        fn failing(notifier: &RecordingNotifier) -> Result<u32, String> {
            let _busy = BusyIndicator::show(notifier);
            let parsed = "not a number".parse::<u32>().map_err(|e| e.to_string())?;
            Ok(parsed)
        }

        let notifier = RecordingNotifier::default();

        assert!(failing(&notifier).is_err());
        assert_eq!(notifier.busy_changes(), vec![true, false]);
    }
}
