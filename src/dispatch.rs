use std::borrow::Cow;
use std::io::Write;

use colored::{Color, Colorize};
use serde::Deserialize;
use tracing::{error, info, trace};

use crate::kind::FailureKind;
use crate::signal::{FailureSignal, OperationResult};

// =============================================================================
// Outcomes
// =============================================================================

/// What the caller gets back once a result has been through the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandledOutcome<T> {
    Ok(T),
    Handled(FailureKind),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `<kind> caught: <message>`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

// =============================================================================
// Dispatcher
// =============================================================================

/// The single handling layer. Successes pass through untouched; every
/// failure becomes exactly one line on the sink.
pub struct Dispatcher<W: Write> {
    sink: W,
    format: ReportFormat,
    color: bool,
    handled: usize,
    succeeded: usize,
}

impl<W: Write> Dispatcher<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            format: ReportFormat::Text,
            color: false,
            handled: 0,
            succeeded: 0,
        }
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn handle<T>(&mut self, result: OperationResult<T>) -> HandledOutcome<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                HandledOutcome::Ok(value)
            }
            Err(signal) => {
                let kind = signal.kind();
                info!(
                    %kind,
                    origin = signal.origin(),
                    recoverable = kind.is_recoverable(),
                    "failure handled"
                );
                let line = self.report(&signal);
                // A broken sink must not turn a handled failure into a new one.
                let written = writeln!(self.sink, "{}", line).and_then(|()| self.sink.flush());
                if let Err(err) = written {
                    error!(%err, origin = signal.origin(), "could not write report line");
                }
                self.handled += 1;
                HandledOutcome::Handled(kind)
            }
        }
    }

    /// Render the report line for a signal without writing it.
    pub fn report(&self, signal: &FailureSignal) -> String {
        match self.format {
            ReportFormat::Text => self.text_line(signal),
            ReportFormat::Json => match serde_json::to_string(signal) {
                Ok(json) => json,
                Err(err) => {
                    error!(%err, "falling back to text report");
                    self.text_line(signal)
                }
            },
        }
    }

    fn text_line(&self, signal: &FailureSignal) -> String {
        let label = signal.kind().label();
        let message = single_line(signal.message());
        if self.color {
            trace!(label, "colorizing report label");
            format!(
                "{} caught: {}",
                label.color(label_color(signal.kind())).bold(),
                message
            )
        } else {
            format!("{} caught: {}", label, message)
        }
    }

    pub fn handled(&self) -> usize {
        self.handled
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

/// Line breaks in a message are escaped so one failure stays one line.
fn single_line(message: &str) -> Cow<'_, str> {
    if message.contains(['\n', '\r']) {
        Cow::Owned(message.replace('\r', "\\r").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(message)
    }
}

/// No wildcard arm: a new kind does not compile until it has a color.
fn label_color(kind: FailureKind) -> Color {
    match kind {
        FailureKind::ResourceNotFound => Color::Yellow,
        FailureKind::EndOfStream => Color::Cyan,
        FailureKind::MalformedInput => Color::Magenta,
        FailureKind::InvalidArgument => Color::Red,
        FailureKind::InvalidState => Color::BrightRed,
        FailureKind::OutOfRange => Color::Blue,
        FailureKind::InvalidTypeConversion => Color::BrightMagenta,
        FailureKind::DomainSpecific => Color::Green,
    }
}
