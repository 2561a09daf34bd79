//! Change notification for command parameters.
//!
//! Observers are called synchronously, inline with the mutation that caused
//! the change. A `crossbeam` sender is itself a listener, so callers that
//! prefer a queue can drain events from the matching receiver.

use crossbeam::channel::Sender;

use super::Parameter;

/// Observer of parameter state changes.
pub trait CommandListener {
    /// A parameter's enabled flag was set (with notification requested).
    fn enabled_changed(&mut self, parameter: &Parameter);

    /// A parameter's value changed (with notification requested).
    fn value_changed(&mut self, parameter: &Parameter);
}

/// Snapshot of a single change, as delivered through a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterEvent {
    Enabled { name: String, enabled: bool },
    Value { name: String, value: String },
}

impl ParameterEvent {
    pub fn name(&self) -> &str {
        match self {
            Self::Enabled { name, .. } | Self::Value { name, .. } => name,
        }
    }
}

impl CommandListener for Sender<ParameterEvent> {
    fn enabled_changed(&mut self, parameter: &Parameter) {
        // A dropped receiver only means nobody is listening anymore
        let _ = self.send(ParameterEvent::Enabled {
            name: parameter.name().to_owned(),
            enabled: parameter.enabled(),
        });
    }

    fn value_changed(&mut self, parameter: &Parameter) {
        let _ = self.send(ParameterEvent::Value {
            name: parameter.name().to_owned(),
            value: parameter.value().to_owned(),
        });
    }
}

impl CommandListener for Vec<ParameterEvent> {
    fn enabled_changed(&mut self, parameter: &Parameter) {
        self.push(ParameterEvent::Enabled {
            name: parameter.name().to_owned(),
            enabled: parameter.enabled(),
        });
    }

    fn value_changed(&mut self, parameter: &Parameter) {
        self.push(ParameterEvent::Value {
            name: parameter.name().to_owned(),
            value: parameter.value().to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    #[test]
    fn test_sender_delivers_events() {
        let (mut tx, rx) = unbounded();
        let parameter = Parameter::new("corner-threshold", true, "100");

        tx.enabled_changed(&parameter);
        tx.value_changed(&parameter);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ParameterEvent::Enabled {
                    name: "corner-threshold".into(),
                    enabled: true
                },
                ParameterEvent::Value {
                    name: "corner-threshold".into(),
                    value: "100".into()
                },
            ]
        );
    }

    #[test]
    fn test_sender_ignores_closed_receiver() {
        let (mut tx, rx) = unbounded();
        drop(rx);
        tx.value_changed(&Parameter::new("centerline", false, ""));
    }

    #[test]
    fn test_event_name() {
        let event = ParameterEvent::Value {
            name: "color-count".into(),
            value: "16".into(),
        };
        assert_eq!(event.name(), "color-count");
    }
}
