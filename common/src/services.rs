//! # Service Catalog
//!
//! Static labels for well-known TCP ports, the same names `/etc/services`
//! hands out for the common cases.

pub const UNKNOWN_SERVICE: &str = "unknown";

/// Defines the contract for naming the service conventionally bound to a port.
pub trait ServiceCatalog: Send + Sync {
    /// Retrieves the service name for a given TCP port.
    ///
    /// # Returns
    /// * `Some(&str)` - The conventional service name.
    /// * `None` - If the port has no well-known assignment.
    fn service_name(&self, port: u16) -> Option<&str>;

    /// Like [`ServiceCatalog::service_name`], falling back to `"unknown"`.
    fn label(&self, port: u16) -> &str {
        self.service_name(port).unwrap_or(UNKNOWN_SERVICE)
    }
}

// Sorted by port, looked up with a binary search.
const WELL_KNOWN: &[(u16, &str)] = &[
    (7, "echo"),
    (9, "discard"),
    (13, "daytime"),
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (37, "time"),
    (43, "whois"),
    (53, "domain"),
    (70, "gopher"),
    (79, "finger"),
    (80, "http"),
    (88, "kerberos"),
    (110, "pop3"),
    (111, "sunrpc"),
    (113, "auth"),
    (119, "nntp"),
    (123, "ntp"),
    (135, "epmap"),
    (139, "netbios-ssn"),
    (143, "imap"),
    (161, "snmp"),
    (179, "bgp"),
    (389, "ldap"),
    (443, "https"),
    (445, "microsoft-ds"),
    (465, "submissions"),
    (513, "login"),
    (514, "shell"),
    (515, "printer"),
    (543, "klogin"),
    (544, "kshell"),
    (548, "afpovertcp"),
    (554, "rtsp"),
    (587, "submission"),
    (631, "ipp"),
    (636, "ldaps"),
    (873, "rsync"),
    (990, "ftps"),
    (993, "imaps"),
    (995, "pop3s"),
    (1080, "socks"),
    (1433, "ms-sql-s"),
    (1723, "pptp"),
    (1883, "mqtt"),
    (2049, "nfs"),
    (3306, "mysql"),
    (3389, "ms-wbt-server"),
    (5060, "sip"),
    (5432, "postgresql"),
    (5672, "amqp"),
    (5900, "vnc"),
    (6379, "redis"),
    (6667, "ircd"),
    (8080, "http-alt"),
    (8443, "https-alt"),
    (9200, "elasticsearch"),
    (11211, "memcache"),
    (27017, "mongodb"),
];

/// Built-in catalog backed by a compiled-in table.
#[derive(Debug, Default, Clone, Copy)]
pub struct WellKnownServices;

impl ServiceCatalog for WellKnownServices {
    fn service_name(&self, port: u16) -> Option<&str> {
        WELL_KNOWN
            .binary_search_by_key(&port, |&(p, _)| p)
            .ok()
            .map(|idx| WELL_KNOWN[idx].1)
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
