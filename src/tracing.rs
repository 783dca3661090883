use crate::ServiceManager;
use tracing::{span::EnteredSpan, trace_span};

/// Represents a tracing configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConfig {
    /// Specifies whether each instantiation runs inside a `resolve` span
    ///
    /// Default: `false`
    resolution_spans: bool,
}

impl TracingConfig {
    /// Creates a default tracing configuration
    ///
    /// Defaults:
    /// - resolution_spans: `false`
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures tracing to wrap each service instantiation into a [`tracing::Span`]
    ///
    /// Default: `false`
    pub fn with_spans(mut self) -> Self {
        self.resolution_spans = true;
        self
    }
}

impl ServiceManager {
    /// Configures the service manager with specified tracing configuration
    ///
    /// # Example
    /// ```
    /// use service_manager::{Catalog, ServiceManager, tracing::TracingConfig};
    ///
    /// let manager = ServiceManager::new(Catalog::new())
    ///     .with_tracing(TracingConfig::new().with_spans());
    /// ```
    pub fn with_tracing(mut self, config: TracingConfig) -> Self {
        self.tracing_config = config;
        self
    }

    /// Enters a `resolve` span for `service` if spans are enabled
    #[inline]
    pub(crate) fn resolution_span(&self, service: &str) -> Option<EnteredSpan> {
        self.tracing_config
            .resolution_spans
            .then(|| trace_span!("resolve", service).entered())
    }
}
