//! Request-scoped trace identifier for correlation across logs and errors.
//!
//! `TraceId` follows a registration request from the HTTP middleware through
//! the pipeline logs and into error payloads. It lives in task-local storage so
//! handlers do not have to thread it through every call.
//!
//! Tokio task-local variables are not inherited by blocking threads. Capture
//! the identifier with [`TraceId::current`] before calling `web::block` and
//! re-enter it there with [`TraceId::in_span`].

use std::future::Future;

use tokio::task_local;
use tracing::Span;
use uuid::Uuid;

/// Header carrying the trace identifier on every response.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use signup::domain::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         println!("trace id: {id}");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn generate() -> Self { Self(Uuid::new_v4()) }

    /// Returns the current trace identifier if one is in scope.
    #[must_use]
    #[rustfmt::skip]
    pub fn current() -> Option<Self> { TRACE_ID.try_with(|id| *id).ok() }

    /// Execute the provided future with the supplied trace identifier in scope.
    ///
    /// # Examples
    /// ```
    /// use signup::domain::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let observed = TraceId::scope(trace_id, async move { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run synchronous work inside a `tracing` span tagged with this trace id.
    ///
    /// Used on blocking threads where the task-local value is not visible.
    pub fn in_span<T>(self, work: impl FnOnce() -> T) -> T {
        let span = tracing::info_span!("blocking", trace_id = %self);
        span.in_scope(work)
    }

    /// Span to attach to request handling futures.
    #[must_use]
    pub fn request_span(self, method: &str, path: &str) -> Span {
        tracing::info_span!("request", trace_id = %self, %method, %path)
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
