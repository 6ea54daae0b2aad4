use std::fmt;

/// Terminal classification of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PortState {
    /// The handshake completed.
    Open,
    /// The target actively refused the connection.
    Closed,
    /// No answer before the probe timeout expired (filtered or dropped).
    Timeout,
    /// Any other I/O failure, with the reason kept for diagnostics.
    Error(String),
}

impl PortState {
    pub fn label(&self) -> &'static str {
        match self {
            PortState::Open => "OPEN",
            PortState::Closed => "CLOSED",
            PortState::Timeout => "TIMEOUT",
            PortState::Error(_) => "ERROR",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PortState::Open)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PortState::Error(_))
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The record of a single probe. One per probed port, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOutcome {
    port: u16,
    state: PortState,
    service: Option<String>,
    local_fault: bool,
}

impl PortOutcome {
    pub fn new(port: u16, state: PortState) -> Self {
        Self {
            port,
            state,
            service: None,
            local_fault: false,
        }
    }

    pub fn open(port: u16) -> Self {
        Self::new(port, PortState::Open)
    }

    pub fn closed(port: u16) -> Self {
        Self::new(port, PortState::Closed)
    }

    pub fn timeout(port: u16) -> Self {
        Self::new(port, PortState::Timeout)
    }

    pub fn error(port: u16, reason: impl Into<String>) -> Self {
        Self::new(port, PortState::Error(reason.into()))
    }

    /// An ERROR caused by this host running out of resources (file
    /// descriptors, typically) rather than by anything the target did.
    pub fn local_error(port: u16, reason: impl Into<String>) -> Self {
        Self {
            local_fault: true,
            ..Self::error(port, reason)
        }
    }

    /// Consumes the outcome and returns it labelled with a service name.
    pub fn with_service(self, service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..self
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &PortState {
        &self.state
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn is_local_fault(&self) -> bool {
        self.local_fault
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
