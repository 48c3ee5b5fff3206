//! Payment notification service configuration.

/// Addresses the aggregator sends payment notifications from.
pub const DEFAULT_ALLOWED_IPS: [&str; 4] = [
    "81.20.151.38",
    "81.20.148.122",
    "79.125.125.1",
    "209.20.83.207",
];

/// Immutable configuration of one Fortumo service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    service_id: Option<String>,
    secret: Option<String>,
    allowed_ips: Vec<String>,
}

impl ServiceConfig {
    /// Create a new `ServiceConfig`.
    ///
    /// `service_id` and `secret` are trimmed and treated as unset when blank.
    /// An empty `allowed_ips` list falls back to [`DEFAULT_ALLOWED_IPS`].
    pub fn new(
        service_id: Option<String>,
        secret: Option<String>,
        allowed_ips: Vec<String>,
    ) -> Self {
        let allowed_ips = if allowed_ips.is_empty() {
            DEFAULT_ALLOWED_IPS.iter().map(|ip| (*ip).to_owned()).collect()
        } else {
            allowed_ips
        };
        Self {
            service_id: non_blank(service_id),
            secret: non_blank(secret),
            allowed_ips,
        }
    }

    /// Expected `service_id`; when unset any service is accepted.
    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    /// Shared secret used to sign notifications.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn allowed_ips(&self) -> &[String] {
        &self.allowed_ips
    }

    /// Exact string match against the allow-list.
    pub fn is_ip_allowed(&self, ip: &str) -> bool {
        self.allowed_ips.iter().any(|allowed| allowed == ip)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
