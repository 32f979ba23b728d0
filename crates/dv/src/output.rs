//! Status lines on stderr.

use std::fmt::Display;

use console::{Style, Term};

/// How a status line is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Done,
    Warn,
    Failed,
    Heading,
}

impl Tone {
    fn style(self) -> Option<Style> {
        match self {
            Self::Plain => None,
            Self::Done => Some(Style::new().green()),
            Self::Warn => Some(Style::new().yellow()),
            Self::Failed => Some(Style::new().red()),
            Self::Heading => Some(Style::new().cyan().bold()),
        }
    }
}

/// Writes progress for the `dv` commands. Styling is dropped when stderr is
/// not a terminal.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub(crate) fn line(&self, tone: Tone, message: impl Display) {
        let text = match tone.style() {
            Some(style) => style.apply_to(message).to_string(),
            None => message.to_string(),
        };
        // stderr going away must not fail a build
        let _ = self.term.write_line(&text);
    }
}
