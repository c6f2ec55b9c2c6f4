//! Built-in diagnostic subscribers.

use crate::subscriber::Subscriber;
use crate::SubscriberError;
use parley_event::{Event, EventArg};
use parley_types::{ErrorLevel, Parser};
use tracing::{error, trace, warn};

/// Logs error sink records through `tracing`.
///
/// The hub attaches one to the error sink unless
/// [`DispatchConfig::log_errors`](crate::DispatchConfig::log_errors) is off.
#[derive(Debug, Default)]
pub struct ErrorLogger;

impl Subscriber for ErrorLogger {
    fn name(&self) -> &str {
        "error-logger"
    }

    fn on_event(&self, parser: &dyn Parser, event: &Event<'_>) -> Result<(), SubscriberError> {
        let Some(info) = event.args().iter().find_map(EventArg::as_error) else {
            return Ok(());
        };
        let network = parser.network().unwrap_or_default();

        match info.level {
            ErrorLevel::Warning => warn!(
                %network,
                category = info.category.as_deref().unwrap_or(""),
                code = info.code.as_deref().unwrap_or(""),
                "{info}"
            ),
            ErrorLevel::Error | ErrorLevel::Fatal => error!(
                %network,
                level = %info.level,
                category = info.category.as_deref().unwrap_or(""),
                code = info.code.as_deref().unwrap_or(""),
                "{info}"
            ),
        }
        Ok(())
    }
}

/// Traces every notification it receives.
///
/// Meant for [`DispatchHub::subscribe_all`](crate::DispatchHub::subscribe_all)
/// while debugging a connection.
#[derive(Debug, Default)]
pub struct EventTracer;

impl Subscriber for EventTracer {
    fn name(&self) -> &str {
        "event-tracer"
    }

    fn on_event(&self, _parser: &dyn Parser, event: &Event<'_>) -> Result<(), SubscriberError> {
        let synthetic = event.args().iter().filter(|a| a.is_synthetic()).count();
        trace!(
            category = %event.name(),
            event_target = ?event.target(),
            args = event.args().len(),
            synthetic,
            "event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_event::EventKind;
    use parley_types::{ErrorInfo, FixedParser};

    #[test]
    fn error_logger_accepts_every_level() {
        let desc = EventKind::ErrorInfo.descriptor();
        for level in [ErrorLevel::Warning, ErrorLevel::Error, ErrorLevel::Fatal] {
            let args = vec![EventArg::from(ErrorInfo::new(level, "x").with_code("X_Y"))];
            assert!(ErrorLogger
                .on_event(&FixedParser::new(), &Event::new(&desc, &args))
                .is_ok());
        }
    }

    #[test]
    fn error_logger_ignores_missing_payload() {
        let desc = EventKind::ErrorInfo.descriptor();
        let args = vec![EventArg::Absent];
        assert!(ErrorLogger
            .on_event(&FixedParser::new(), &Event::new(&desc, &args))
            .is_ok());
    }

    #[test]
    fn tracer_never_fails() {
        let desc = EventKind::ChannelTopic.descriptor();
        let args = vec![EventArg::Absent, true.into()];
        assert!(EventTracer
            .on_event(&FixedParser::new(), &Event::new(&desc, &args))
            .is_ok());
        assert_eq!(EventTracer.name(), "event-tracer");
    }
}
