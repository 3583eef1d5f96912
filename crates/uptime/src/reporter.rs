//! Availability report output.

use std::io::{self, Write};

use crate::tracker::DomainAvailability;

/// Render one report line
pub fn format_line(row: &DomainAvailability) -> String {
    format!("{} has {}% availability percentage", row.domain, row.percentage)
}

/// Writes one line per domain to a sink, stdout in production
pub struct Reporter<W: Write> {
    sink: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Emit the snapshot and flush, so each cycle's lines appear together
    pub fn report(&mut self, snapshot: &[DomainAvailability]) -> io::Result<()> {
        for row in snapshot {
            writeln!(self.sink, "{}", format_line(row))?;
        }
        self.sink.flush()
    }

    /// Emit a free-form line such as the termination notice
    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.sink, "{message}")?;
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
