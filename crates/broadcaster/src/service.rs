//! StreamBroadcaster - accept loop + broadcast tick loop

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

use contracts::{ControlMessage, ServerConfig, ShapingConfig, TickMeta};
use observability::{record_client_event, record_tick_metrics, TickMetricsAggregator};
use speed_engine::{ScoreCell, SpeedShaper};

use crate::error::BroadcastError;
use crate::metrics::{BroadcastSnapshot, BroadcasterMetrics};

/// Statistics from a completed broadcast run
#[derive(Debug, Clone, Default)]
pub struct BroadcastStats {
    /// Counter snapshot at shutdown
    pub snapshot: BroadcastSnapshot,

    /// Per-tick aggregate summary
    pub summary: observability::MetricsSummary,
}

/// TCP push service for the shaped speed
///
/// The accept task and the tick task communicate only through an mpsc channel
/// of accepted sockets; the connection set itself has exactly one owner (the
/// tick task). Both tasks observe the shutdown watch channel.
pub struct StreamBroadcaster {
    server: ServerConfig,
    shaping: ShapingConfig,
    score: Arc<ScoreCell>,
    metrics: Arc<BroadcasterMetrics>,
}

impl StreamBroadcaster {
    /// Create a broadcaster reading scores from the given cell
    pub fn new(server: ServerConfig, shaping: ShapingConfig, score: Arc<ScoreCell>) -> Self {
        Self {
            server,
            shaping,
            score,
            metrics: Arc::new(BroadcasterMetrics::new()),
        }
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<BroadcasterMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Bind the listening socket
    ///
    /// This is the only fatal failure point of the service: if the port
    /// cannot be bound the pipeline cannot function at all.
    #[instrument(name = "broadcaster_bind", skip(self))]
    pub async fn bind(self) -> Result<BoundBroadcaster, BroadcastError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| BroadcastError::bind(&addr, e))?;
        let local_addr = listener.local_addr()?;

        info!(
            addr = %local_addr,
            max_connections = self.server.max_connections,
            tick_ms = self.server.tick_interval_ms,
            "broadcast server listening"
        );

        Ok(BoundBroadcaster {
            broadcaster: self,
            listener,
            local_addr,
        })
    }
}

/// A broadcaster whose listener is bound and ready to run
pub struct BoundBroadcaster {
    broadcaster: StreamBroadcaster,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BoundBroadcaster {
    /// The bound address (resolves port 0 to the actual port)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run until the shutdown signal fires
    ///
    /// Everything past bind is connection-scoped: accept and write failures
    /// are logged and the affected connection dropped, never the service.
    #[instrument(name = "broadcaster_run", skip(self, shutdown), fields(addr = %self.local_addr))]
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> BroadcastStats {
        let StreamBroadcaster {
            server,
            shaping,
            score,
            metrics,
        } = self.broadcaster;

        let active = Arc::new(AtomicUsize::new(0));
        let (conn_tx, conn_rx) = mpsc::channel(server.max_connections.max(1));

        let accept_handle = tokio::spawn(accept_loop(
            self.listener,
            conn_tx,
            server.max_connections,
            Arc::clone(&active),
            Arc::clone(&metrics),
            shutdown.clone(),
        ));

        let stats = tick_loop(
            server,
            shaping,
            score,
            conn_rx,
            active,
            Arc::clone(&metrics),
            shutdown,
        )
        .await;

        if let Err(e) = accept_handle.await {
            error!(error = ?e, "accept task panicked");
        }

        info!(
            ticks = stats.snapshot.ticks,
            sent = stats.snapshot.messages_sent,
            "broadcast server stopped"
        );

        stats
    }
}

/// Accept consumers until shutdown
///
/// Connections beyond the cap are accepted then immediately closed, which
/// gives the excess consumer a clean EOF instead of a hanging connect.
async fn accept_loop(
    listener: TcpListener,
    conn_tx: mpsc::Sender<(TcpStream, SocketAddr)>,
    max_connections: usize,
    active: Arc<AtomicUsize>,
    metrics: Arc<BroadcasterMetrics>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => {
                let (stream, addr) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                };

                if active.load(Ordering::Acquire) >= max_connections {
                    metrics.record_rejected();
                    record_client_event("rejected");
                    warn!(%addr, max_connections, "connection cap reached, closing consumer");
                    drop(stream);
                    continue;
                }

                active.fetch_add(1, Ordering::AcqRel);
                metrics.record_accepted();
                metrics.set_connections(active.load(Ordering::Acquire));
                record_client_event("accepted");
                info!(%addr, total = active.load(Ordering::Acquire), "consumer connected");

                if conn_tx.send((stream, addr)).await.is_err() {
                    // Tick loop is gone; nothing left to serve
                    break;
                }
            }
        }
    }

    debug!("accept loop stopped");
}

/// Broadcast on every tick until shutdown
///
/// The tick always runs the shaper, even with zero consumers, so
/// `previous_applied` tracks the live signal while nobody is connected.
async fn tick_loop(
    server: ServerConfig,
    shaping: ShapingConfig,
    score: Arc<ScoreCell>,
    mut conn_rx: mpsc::Receiver<(TcpStream, SocketAddr)>,
    active: Arc<AtomicUsize>,
    metrics: Arc<BroadcasterMetrics>,
    mut shutdown: watch::Receiver<bool>,
) -> BroadcastStats {
    let mut shaper = SpeedShaper::new(shaping);
    let mut connections: Vec<(TcpStream, SocketAddr)> = Vec::new();
    let mut aggregator = TickMetricsAggregator::new();
    let mut interval = tokio::time::interval(Duration::from_millis(server.tick_interval_ms));

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = interval.tick() => {
                // Adopt consumers queued by the accept task
                while let Ok(conn) = conn_rx.try_recv() {
                    connections.push(conn);
                }

                let current_score = score.load();
                let outcome = shaper.tick(current_score);

                if outcome.fault {
                    warn!(
                        score = current_score,
                        "score above error threshold, forcing zero output"
                    );
                }

                let meta = TickMeta {
                    score: outcome.score,
                    target_speed: outcome.target,
                    applied_speed: outcome.applied,
                    connections: connections.len(),
                    fault: outcome.fault,
                };
                record_tick_metrics(&meta);
                aggregator.update(&meta);
                metrics.record_tick();

                if connections.is_empty() {
                    continue;
                }

                let line = match ControlMessage::new(outcome.applied).encode_line() {
                    Ok(line) => line,
                    Err(e) => {
                        error!(error = %e, "control message encode failed, skipping tick");
                        continue;
                    }
                };

                broadcast_line(&mut connections, &line, &active, &metrics).await;
            }
        }
    }

    // Close remaining consumers
    for (mut stream, addr) in connections.drain(..) {
        let _ = stream.shutdown().await;
        debug!(%addr, "consumer closed on shutdown");
    }
    active.store(0, Ordering::Release);
    metrics.set_connections(0);

    BroadcastStats {
        snapshot: metrics.snapshot(),
        summary: aggregator.summary(),
    }
}

/// Write one line to every consumer, dropping the ones whose write fails
async fn broadcast_line(
    connections: &mut Vec<(TcpStream, SocketAddr)>,
    line: &str,
    active: &Arc<AtomicUsize>,
    metrics: &Arc<BroadcasterMetrics>,
) {
    let mut failed = Vec::new();

    for (idx, (stream, addr)) in connections.iter_mut().enumerate() {
        match stream.write_all(line.as_bytes()).await {
            Ok(()) => metrics.record_sent(),
            Err(e) => {
                metrics.record_send_failure();
                warn!(%addr, error = %e, "write failed, dropping consumer");
                failed.push(idx);
            }
        }
    }

    // Remove from the back so earlier indexes stay valid
    for idx in failed.into_iter().rev() {
        let (stream, addr) = connections.swap_remove(idx);
        drop(stream);
        active.fetch_sub(1, Ordering::AcqRel);
        metrics.set_connections(active.load(Ordering::Acquire));
        record_client_event("dropped");
        info!(%addr, total = active.load(Ordering::Acquire), "consumer disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

    fn test_server(tick_ms: u64, max_connections: usize) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_connections,
            tick_interval_ms: tick_ms,
        }
    }

    async fn start(
        server: ServerConfig,
        score: Arc<ScoreCell>,
    ) -> (
        SocketAddr,
        watch::Sender<bool>,
        tokio::task::JoinHandle<BroadcastStats>,
    ) {
        let broadcaster = StreamBroadcaster::new(server, ShapingConfig::default(), score);
        let bound = broadcaster.bind().await.unwrap();
        let addr = bound.local_addr();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(bound.run(shutdown_rx));
        (addr, shutdown_tx, handle)
    }

    #[tokio::test]
    async fn test_consumer_receives_json_lines() {
        let score = Arc::new(ScoreCell::new());
        // Steady full-scale score: applied speed ramps to max_speed
        score.publish(0.8);

        let (addr, shutdown_tx, handle) = start(test_server(5, 1), Arc::clone(&score)).await;

        let stream = TcpStream::connect(addr).await.unwrap();
        let mut lines = BufReader::new(stream).lines();

        let mut received = Vec::new();
        for _ in 0..5 {
            let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
                .await
                .expect("timed out waiting for line")
                .unwrap()
                .expect("stream closed early");
            received.push(ControlMessage::decode_line(&line).unwrap());
        }

        shutdown_tx.send(true).unwrap();
        let stats = handle.await.unwrap();

        // Full-scale score pins the output at max_speed from the first tick
        for msg in &received {
            assert!(msg.speed >= 0.0 && msg.speed <= 7.04);
        }
        assert_eq!(received.last().unwrap().speed, 7.04);
        assert!(stats.snapshot.messages_sent >= 5);
    }

    #[tokio::test]
    async fn test_excess_connection_is_closed() {
        let score = Arc::new(ScoreCell::new());
        let (addr, shutdown_tx, handle) = start(test_server(5, 1), score).await;

        let _first = TcpStream::connect(addr).await.unwrap();
        // Give the accept loop time to register the first consumer
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut second = TcpStream::connect(addr).await.unwrap();
        let mut buf = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(2), second.read_to_end(&mut buf))
            .await
            .expect("excess consumer was not closed");
        // Immediate EOF, no payload
        assert_eq!(read.unwrap(), 0);

        shutdown_tx.send(true).unwrap();
        let stats = handle.await.unwrap();
        assert_eq!(stats.snapshot.connections_rejected, 1);
    }

    #[tokio::test]
    async fn test_zero_consumers_is_a_noop_not_an_error() {
        let score = Arc::new(ScoreCell::new());
        score.publish(0.4);

        let (_addr, shutdown_tx, handle) = start(test_server(2, 1), score).await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        shutdown_tx.send(true).unwrap();
        let stats = handle.await.unwrap();

        // Ticks ran (and shaped state advanced) but nothing was sent
        assert!(stats.snapshot.ticks >= 10);
        assert_eq!(stats.snapshot.messages_sent, 0);
        assert_eq!(stats.summary.idle_ticks, stats.summary.total_ticks);
        // Shaping kept running: applied speed climbed above zero
        assert!(stats.summary.applied_speed.max > 0.0);
    }

    #[tokio::test]
    async fn test_consumer_disconnect_does_not_stop_service() {
        let score = Arc::new(ScoreCell::new());
        score.publish(0.8);

        let (addr, shutdown_tx, handle) = start(test_server(5, 2), Arc::clone(&score)).await;

        // First consumer connects and immediately drops
        {
            let _doomed = TcpStream::connect(addr).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Second consumer still gets data
        let stream = TcpStream::connect(addr).await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .expect("no data after peer disconnect")
            .unwrap()
            .expect("stream closed");
        assert!(ControlMessage::decode_line(&line).is_ok());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_is_fatal() {
        let score = Arc::new(ScoreCell::new());
        let first = StreamBroadcaster::new(test_server(5, 1), ShapingConfig::default(), score);
        let bound = first.bind().await.unwrap();
        let addr = bound.local_addr();

        // Second bind on the same port must fail with a Bind error
        let clashing = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: addr.port(),
            max_connections: 1,
            tick_interval_ms: 5,
        };
        let second = StreamBroadcaster::new(
            clashing,
            ShapingConfig::default(),
            Arc::new(ScoreCell::new()),
        );
        let result = second.bind().await;
        assert!(matches!(result, Err(BroadcastError::Bind { .. })));
    }
}
