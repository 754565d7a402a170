//! SampleSource trait - Sensor notification source abstraction
//!
//! Defines a unified interface for notification sources, decoupling ingestion
//! from the concrete transport (BLE bridge, mock generator, replay).

use bytes::Bytes;

/// Notification callback type
///
/// Invoked once per inbound notification with the raw payload bytes. The
/// source calls it from a single thread, so the callback may own mutable
/// state (the RMS window has exactly one writer).
pub type SampleCallback = Box<dyn FnMut(Bytes) + Send + 'static>;

/// Sample notification source trait
///
/// Abstracts the common behavior of real sensor bridges and mock sources.
///
/// # Design Principles
///
/// 1. **Decoupling**: separates notification delivery from sample processing
/// 2. **Unified Interface**: mock and real sources use the same API
/// 3. **Push Model**: the source drives the callback; ingestion never polls
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn SampleSource> = get_sample_source();
/// source.listen(Box::new(|payload| {
///     println!("notification: {} bytes", payload.len());
/// }));
/// // ... pipeline runs ...
/// source.stop();
/// ```
pub trait SampleSource: Send {
    /// Get source ID
    fn source_id(&self) -> &str;

    /// Register the notification callback and start delivery
    ///
    /// If already listening, repeated calls are idempotent; the new callback
    /// is dropped and the original one keeps running.
    fn listen(&self, callback: SampleCallback);

    /// Stop delivery
    ///
    /// After `stop` returns no further callback invocations are started.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
