//! Settings of the hyper transport behind [`HyperRequestAdapter`](crate::HyperRequestAdapter).

use std::time::Duration;

/// Deadline applied to one exchange unless configured otherwise.
pub const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_secs(100);

/// Pooling and deadline settings of the hyper transport.
///
/// The builder of [`HyperRequestAdapter`](crate::HyperRequestAdapter) fills one in; build a
/// [`HyperTransport`](crate::HyperTransport) from it directly only when wrapping the transport
/// in your own service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Deadline for one exchange, body included. `None` or zero disables it.
    pub timeout: Option<Duration>,
    /// Deadline for establishing a connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per Graph host.
    pub pool_max_idle_per_host: usize,
    /// How long an idle connection stays pooled.
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TRANSPORT_TIMEOUT),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// The exchange deadline, if one applies.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.timeout.filter(|timeout| !timeout.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn default_deadline() {
        let config = TransportConfig::default();
        check!(config.deadline() == Some(DEFAULT_TRANSPORT_TIMEOUT));
        check!(config.pool_max_idle_per_host == 32);
    }

    #[test]
    fn zero_or_missing_timeout_disables_deadline() {
        for timeout in [None, Some(Duration::ZERO)] {
            let config = TransportConfig {
                timeout,
                ..TransportConfig::default()
            };
            check!(config.deadline().is_none());
        }
    }
}
