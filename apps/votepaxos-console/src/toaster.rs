use std::io::{self, IsTerminal, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tracing::debug;
use votepaxos_client::{Intent, Toast, Toaster};

/// Prints toasts to stdout, coloured when stdout is a terminal.
pub struct TerminalToaster {
    color: bool,
}

impl TerminalToaster {
    pub fn new() -> Self {
        Self {
            color: io::stdout().is_terminal(),
        }
    }
}

impl Toaster for TerminalToaster {
    fn show(&self, toast: &Toast) {
        debug!(target: "votepaxos::toast", intent = ?toast.intent, message = %toast.message);
        let mut out = io::stdout().lock();
        let _ = write_toast(&mut out, toast, self.color);
    }
}

pub(crate) fn write_toast(out: &mut impl Write, toast: &Toast, color: bool) -> io::Result<()> {
    let line = format!("{} {}", toast.intent.icon(), toast.message);
    if color {
        let fg = match toast.intent {
            Intent::Success => Color::Green,
            Intent::Danger => Color::Red,
        };
        queue!(out, SetForegroundColor(fg), Print(line), ResetColor, Print("\n"))?;
    } else {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
