/// Classification of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Up,
    Down,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "UP"),
            ProbeStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// Outcome of probing one endpoint in one cycle.
///
/// Results only live until the tracker has folded them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Network authority of the probed URL
    pub domain: String,

    pub status: ProbeStatus,
}

impl ProbeResult {
    pub fn up(domain: impl Into<String>) -> Self {
        Self { domain: domain.into(), status: ProbeStatus::Up }
    }

    pub fn down(domain: impl Into<String>) -> Self {
        Self { domain: domain.into(), status: ProbeStatus::Down }
    }

    pub fn is_up(&self) -> bool {
        self.status == ProbeStatus::Up
    }
}
