//! Desktop notification and alert-sound ports.
//!
//! Both are best-effort side effects: a failing notification daemon
//! must never abort a run, so the implementations log at `warn` and
//! carry on.

use notify_rust::Notification;
use tracing::warn;

/// Transient desktop notification port.
pub trait Notifier {
    /// Shows a notification. Best effort; never fails the caller.
    fn notify(&self, title: &str, message: &str);
}

/// Audible alert port, fired when new cases are found.
pub trait AlertSound {
    /// Plays the platform alert sound. Best effort.
    fn play(&self);
}

/// Notification timeout in milliseconds.
const NOTIFICATION_TIMEOUT_MS: i32 = 5000;

/// Freedesktop sound name for the alert.
const ALERT_SOUND_NAME: &str = "dialog-warning";

/// Desktop notifier over the platform notification daemon.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        let result = Notification::new()
            .summary(title)
            .body(message)
            .timeout(NOTIFICATION_TIMEOUT_MS)
            .show();

        if let Err(err) = result {
            warn!("desktop notification failed: {err}");
        }
    }
}

/// Alert sound played through the notification daemon's sound hint.
///
/// The pack has no dedicated audio stack; the notification daemon's
/// default alert sound serves as the platform alert.
#[derive(Debug, Clone, Default)]
pub struct DesktopAlert;

impl AlertSound for DesktopAlert {
    fn play(&self) {
        let result = Notification::new()
            .summary("Case Monitor")
            .body("New cases found")
            .sound_name(ALERT_SOUND_NAME)
            .timeout(NOTIFICATION_TIMEOUT_MS)
            .show();

        if let Err(err) = result {
            warn!("alert sound failed: {err}");
        }
    }
}

/// No-op notifier for tests and headless environments.
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

/// No-op alert for tests and headless environments.
#[derive(Debug, Clone, Default)]
pub struct SilentAlert;

impl AlertSound for SilentAlert {
    fn play(&self) {}
}
