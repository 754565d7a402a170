//! StreamReader - non-blocking, fail-static control stream reader.

use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use contracts::{ClientConfig, ControlMessage};
use tracing::{debug, info, warn};

use crate::error::ClientError;

/// Bytes read per socket drain pass
const READ_CHUNK_BYTES: usize = 1024;

/// Reassembly buffer cap; a peer that never sends a newline is garbage
const MAX_BUFFER_BYTES: usize = 64 * 1024;

/// Consumer-side reader for the newline-delimited control stream
///
/// Owns the connection, the reassembly buffer and the last-known-good message
/// exclusively; call it from one thread only (the consumer's own loop).
pub struct StreamReader {
    addr: String,
    config: ClientConfig,
    stream: Option<TcpStream>,
    buffer: Vec<u8>,
    last_good: Option<ControlMessage>,
    last_receive: Option<Instant>,
    last_attempt: Option<Instant>,
}

impl StreamReader {
    /// Create a disconnected reader for the given broadcaster endpoint
    pub fn new(host: impl Into<String>, port: u16, config: ClientConfig) -> Self {
        Self {
            addr: format!("{}:{}", host.into(), port),
            config,
            stream: None,
            buffer: Vec::new(),
            last_good: None,
            last_receive: None,
            last_attempt: None,
        }
    }

    /// Connect to the broadcaster with the configured timeout
    ///
    /// Any previous connection and buffered partial data are discarded; the
    /// last-known-good message survives reconnects.
    pub fn connect(&mut self) -> Result<(), ClientError> {
        self.last_attempt = Some(Instant::now());
        self.stream = None;
        self.buffer.clear();

        let sock_addr = self
            .addr
            .to_socket_addrs()
            .map_err(|e| ClientError::InvalidAddr {
                addr: self.addr.clone(),
                message: e.to_string(),
            })?
            .next()
            .ok_or_else(|| ClientError::InvalidAddr {
                addr: self.addr.clone(),
                message: "no addresses resolved".to_string(),
            })?;

        let timeout = Duration::from_millis(self.config.connect_timeout_ms);
        let stream = TcpStream::connect_timeout(&sock_addr, timeout)
            .map_err(|e| ClientError::connect(&self.addr, e))?;
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;

        info!(addr = %self.addr, "connected to broadcaster");
        self.last_receive = Some(Instant::now());
        self.stream = Some(stream);
        Ok(())
    }

    /// Reconnect if disconnected, honoring the configured cooldown
    ///
    /// Returns whether a connection is open afterwards. Reconnection is the
    /// caller's responsibility; the cooldown keeps a dead broadcaster from
    /// being hammered once per consumer frame.
    pub fn try_reconnect(&mut self) -> bool {
        if self.is_connected() {
            return true;
        }

        if let Some(at) = self.last_attempt {
            let cooldown = Duration::from_millis(self.config.reconnect_cooldown_ms);
            if at.elapsed() < cooldown {
                return false;
            }
        }

        match self.connect() {
            Ok(()) => true,
            Err(e) => {
                warn!(addr = %self.addr, error = %e, "reconnect attempt failed");
                false
            }
        }
    }

    /// Read the current control message; never blocks, never fails
    ///
    /// Drains every byte the socket has ready, splits the buffer on newlines
    /// and decodes each complete line. Returns the newest message decoded by
    /// this call, or the last-known-good message when nothing new arrived, or
    /// the zero-speed default if nothing has ever been received.
    pub fn poll(&mut self) -> ControlMessage {
        self.drain_socket();
        let newest = self.parse_buffer();
        newest.or(self.last_good).unwrap_or_default()
    }

    /// Check if a connection is currently open
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Most recently decoded message (zero-speed default before the first)
    pub fn last_message(&self) -> ControlMessage {
        self.last_good.unwrap_or_default()
    }

    /// Time since the last bytes arrived (None before the first connect)
    pub fn idle_time(&self) -> Option<Duration> {
        self.last_receive.map(|at| at.elapsed())
    }

    /// Drop the connection, keeping the last-known-good message
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            debug!(addr = %self.addr, "disconnected from broadcaster");
        }
    }

    /// Pull all currently readable bytes into the buffer
    ///
    /// Ends when the socket would block; a clean peer close or a read error
    /// tears the connection down, leaving already-buffered lines intact for
    /// this call's parse.
    fn drain_socket(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };

        let mut chunk = [0u8; READ_CHUNK_BYTES];
        let disconnect = loop {
            match stream.read(&mut chunk) {
                Ok(0) => {
                    info!(addr = %self.addr, "broadcaster closed the connection");
                    break true;
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    self.last_receive = Some(Instant::now());
                    if self.buffer.len() > MAX_BUFFER_BYTES {
                        warn!(
                            bytes = self.buffer.len(),
                            "no newline within buffer cap, discarding buffered data"
                        );
                        self.buffer.clear();
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break false,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(addr = %self.addr, error = %e, "receive failed, dropping connection");
                    break true;
                }
            }
        };

        if disconnect {
            self.stream = None;
        }
    }

    /// Decode every complete line in the buffer
    ///
    /// Malformed lines are logged and discarded individually; trailing
    /// incomplete data stays buffered for the next call.
    fn parse_buffer(&mut self) -> Option<ControlMessage> {
        let mut newest = None;

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = &line[..line.len() - 1];

            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            match ControlMessage::decode_slice(line) {
                Ok(msg) => {
                    newest = Some(msg);
                    self.last_good = Some(msg);
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        line = %String::from_utf8_lossy(line),
                        "discarding malformed line"
                    );
                }
            }
        }

        newest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::{SocketAddr, TcpListener};
    use std::sync::mpsc;
    use std::thread;

    fn test_config() -> ClientConfig {
        ClientConfig {
            connect_timeout_ms: 1000,
            reconnect_cooldown_ms: 1000,
        }
    }

    /// Accept one client and hand it to the given closure
    fn spawn_server<F>(serve: F) -> SocketAddr
    where
        F: FnOnce(std::net::TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            stream.set_nodelay(true).unwrap();
            serve(stream);
        });
        addr
    }

    fn settle() {
        thread::sleep(Duration::from_millis(100));
    }

    #[test]
    fn test_never_connected_returns_default() {
        let mut reader = StreamReader::new("127.0.0.1", 1, test_config());
        assert!(!reader.is_connected());
        assert_eq!(reader.poll(), ControlMessage::default());
    }

    #[test]
    fn test_receives_latest_of_multiple_lines() {
        let addr = spawn_server(|mut stream| {
            stream
                .write_all(b"{\"speed\":1.0}\n{\"speed\":2.0}\n{\"speed\":3.0}\n")
                .unwrap();
            thread::sleep(Duration::from_millis(500));
        });

        let mut reader = StreamReader::new("127.0.0.1", addr.port(), test_config());
        reader.connect().unwrap();
        settle();

        assert_eq!(reader.poll().speed, 3.0);
        assert_eq!(reader.last_message().speed, 3.0);
    }

    #[test]
    fn test_message_split_across_reads() {
        let (tx, rx) = mpsc::channel::<()>();
        let addr = spawn_server(move |mut stream| {
            stream.write_all(b"{\"spe").unwrap();
            stream.flush().unwrap();
            rx.recv().unwrap();
            stream.write_all(b"ed\":1.0}\n").unwrap();
            rx.recv().ok();
        });

        let mut reader = StreamReader::new("127.0.0.1", addr.port(), test_config());
        reader.connect().unwrap();
        settle();

        // Only a partial line so far: fail-static default
        assert_eq!(reader.poll(), ControlMessage::default());

        tx.send(()).unwrap();
        settle();

        // The read completing the line parses it
        assert_eq!(reader.poll().speed, 1.0);
        tx.send(()).ok();
    }

    #[test]
    fn test_malformed_line_between_valid_ones() {
        let addr = spawn_server(|mut stream| {
            stream
                .write_all(b"{\"speed\":1.0}\n{bad\n{\"speed\":2.0}\n")
                .unwrap();
            thread::sleep(Duration::from_millis(500));
        });

        let mut reader = StreamReader::new("127.0.0.1", addr.port(), test_config());
        reader.connect().unwrap();
        settle();

        // Both valid messages decode in order, the malformed one is dropped
        assert_eq!(reader.poll().speed, 2.0);
        assert!(reader.is_connected());
    }

    #[test]
    fn test_fail_static_across_disconnect() {
        let addr = spawn_server(|mut stream| {
            stream.write_all(b"{\"speed\":4.5}\n").unwrap();
            // Server closes; consumer keeps the last value
        });

        let mut reader = StreamReader::new("127.0.0.1", addr.port(), test_config());
        reader.connect().unwrap();
        settle();

        assert_eq!(reader.poll().speed, 4.5);

        settle();
        // Peer is gone now; poll tears down but still answers
        assert_eq!(reader.poll().speed, 4.5);
        assert!(!reader.is_connected());
        assert_eq!(reader.poll().speed, 4.5);
    }

    #[test]
    fn test_reconnect_honors_cooldown() {
        let addr = spawn_server(|_stream| {
            // Accept and immediately drop the first connection
        });

        let config = ClientConfig {
            connect_timeout_ms: 1000,
            reconnect_cooldown_ms: 10_000,
        };
        let mut reader = StreamReader::new("127.0.0.1", addr.port(), config);
        reader.connect().unwrap();
        settle();

        // Server dropped us; the next poll notices
        reader.poll();
        assert!(!reader.is_connected());

        // Within the cooldown no attempt is made, even though the port is gone
        assert!(!reader.try_reconnect());
    }

    #[test]
    fn test_reconnect_after_cooldown_elapsed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            // First connection: accept and drop; second: hold open
            let (first, _) = listener.accept().unwrap();
            drop(first);
            let (_second, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(500));
        });

        let config = ClientConfig {
            connect_timeout_ms: 1000,
            reconnect_cooldown_ms: 1,
        };
        let mut reader = StreamReader::new("127.0.0.1", addr.port(), config);
        reader.connect().unwrap();
        settle();

        reader.poll();
        assert!(!reader.is_connected());

        thread::sleep(Duration::from_millis(10));
        assert!(reader.try_reconnect());
        assert!(reader.is_connected());
    }

    #[test]
    fn test_connect_to_dead_port_fails() {
        // Bind then drop to get a port that refuses connections
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let mut reader = StreamReader::new("127.0.0.1", addr.port(), test_config());
        let result = reader.connect();
        assert!(matches!(result, Err(ClientError::Connect { .. })));
        assert!(!reader.is_connected());
        // The caller still gets a usable value
        assert_eq!(reader.poll(), ControlMessage::default());
    }
}
