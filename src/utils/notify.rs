//! Desktop notifications for timer boundary events

use notify_rust::Notification;
use tracing::warn;

use crate::engine::{PomodoroPhase, TimerEvent};

/// Notification body text for a boundary event
pub fn notification_body(event: &TimerEvent) -> String {
    match event {
        TimerEvent::Finished => "Countdown finished!".to_string(),
        TimerEvent::PhaseChanged { phase, session } => match phase {
            PomodoroPhase::Focus => {
                format!("Break finished! Time to focus (session {}).", session)
            }
            PomodoroPhase::ShortBreak => {
                "Focus session completed! Time for a short break.".to_string()
            }
            PomodoroPhase::LongBreak => {
                "Focus session completed! Time for a long break.".to_string()
            }
        },
    }
}

/// Render a boundary event as a desktop notification. This blocks on D-Bus,
/// so callers on an async task should run it via `spawn_blocking`. Failures
/// are logged and never propagate; the timer does not depend on a
/// notification daemon.
pub fn send_event_notification(event: &TimerEvent) {
    if let Err(e) = Notification::new()
        .summary("Multitimer")
        .body(&notification_body(event))
        .show()
    {
        warn!("Failed to send notification: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_names_the_new_phase_and_session() {
        assert_eq!(notification_body(&TimerEvent::Finished), "Countdown finished!");
        assert_eq!(
            notification_body(&TimerEvent::PhaseChanged {
                phase: PomodoroPhase::Focus,
                session: 3
            }),
            "Break finished! Time to focus (session 3)."
        );
        assert_eq!(
            notification_body(&TimerEvent::PhaseChanged {
                phase: PomodoroPhase::LongBreak,
                session: 4
            }),
            "Focus session completed! Time for a long break."
        );
    }
}
