//! Command Listener dengan event-driven I/O
//!
//! Menggunakan mio untuk blocking wait tanpa timeout di satu UDP socket
//! plus satu `Waker` untuk shutdown. Setiap datagram di-parse dan
//! di-dispatch sampai selesai sebelum `recv` berikutnya.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use mio::net::UdpSocket;
use mio::{Events, Interest, Poll, Token, Waker};
use tracing::{debug, error, info, warn};

use super::socket::{open_bind, set_recv_buffer};
use crate::config::ListenerConfig;
use crate::core::{CommandDispatcher, ListenerStats, StatsSnapshot};
use crate::error::ListenerError;
use crate::playback::PlaybackGrid;
use crate::protocol::MAX_DATAGRAM_LEN;

const SOCKET_TOKEN: Token = Token(0);
const WAKER_TOKEN: Token = Token(1);
const EVENTS_CAPACITY: usize = 64;

/// Nama thread receive-and-dispatch.
pub const THREAD_NAME: &str = "mongrid-command";

/// Minta receive loop berhenti dari thread lain.
#[derive(Clone)]
pub struct ShutdownHandle {
    waker: Arc<Waker>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) -> io::Result<()> {
        self.waker.wake()
    }
}

/// Command Listener
///
/// Owns socket dan dispatcher. Socket di-release saat listener di-drop
/// (setelah `run` selesai).
pub struct Listener<G> {
    poll: Poll,
    socket: UdpSocket,
    waker: Arc<Waker>,
    local_addr: SocketAddr,
    dispatcher: CommandDispatcher<G>,
    stats: Arc<ListenerStats>,
    // Pre-allocated receive buffer, excess bytes dibuang oleh transport
    buffer: Box<[u8]>,
}

impl<G: PlaybackGrid> Listener<G> {
    /// Bind sesuai config. Bind error fatal untuk caller.
    pub fn bind(
        config: &ListenerConfig,
        dispatcher: CommandDispatcher<G>,
    ) -> Result<Self, ListenerError> {
        let socket = open_bind(&config.bind_host, &config.service)?;

        if let Some(bytes) = config.recv_buffer_bytes {
            if let Err(err) = set_recv_buffer(&socket, bytes) {
                warn!(bytes, error = %err, "cannot set receive buffer size");
            }
        }

        Self::from_std(socket, dispatcher)
    }

    /// Wrap socket yang sudah di-bind.
    pub fn from_std(
        socket: std::net::UdpSocket,
        dispatcher: CommandDispatcher<G>,
    ) -> Result<Self, ListenerError> {
        socket.set_nonblocking(true).map_err(ListenerError::Poll)?;
        let local_addr = socket.local_addr().map_err(ListenerError::Poll)?;

        let poll = Poll::new().map_err(ListenerError::Poll)?;
        let mut socket = UdpSocket::from_std(socket);
        poll.registry()
            .register(&mut socket, SOCKET_TOKEN, Interest::READABLE)
            .map_err(ListenerError::Poll)?;
        let waker = Waker::new(poll.registry(), WAKER_TOKEN).map_err(ListenerError::Poll)?;

        Ok(Self {
            poll,
            socket,
            waker: Arc::new(waker),
            local_addr,
            dispatcher,
            stats: Arc::new(ListenerStats::new()),
            buffer: vec![0u8; MAX_DATAGRAM_LEN].into_boxed_slice(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            waker: Arc::clone(&self.waker),
        }
    }

    /// Shared counters, bisa dibaca selama loop berjalan.
    pub fn stats(&self) -> Arc<ListenerStats> {
        Arc::clone(&self.stats)
    }

    /// Run receive loop sampai shutdown atau receive error.
    ///
    /// Returns stats akhir saat shutdown normal.
    pub fn run(mut self) -> Result<StatsSnapshot, ListenerError> {
        let started = Instant::now();
        info!(addr = %self.local_addr, "listening for commands");

        let result = self.run_loop();

        let snapshot = self.stats.snapshot();
        snapshot.log_summary(started.elapsed());
        match &result {
            Ok(()) => info!("command listener stopped"),
            Err(err) => error!(error = %err, "command listener terminated"),
        }
        result.map(|()| snapshot)
    }

    /// Spawn `run` di dedicated thread, terpisah dari UI/main loop.
    pub fn spawn(self) -> io::Result<JoinHandle<Result<StatsSnapshot, ListenerError>>>
    where
        G: 'static,
    {
        thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || self.run())
    }

    fn run_loop(&mut self) -> Result<(), ListenerError> {
        let mut events = Events::with_capacity(EVENTS_CAPACITY);

        loop {
            match self.poll.poll(&mut events, None) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(ListenerError::Poll(err)),
            }

            for event in events.iter() {
                match event.token() {
                    SOCKET_TOKEN => self.drain_socket()?,
                    WAKER_TOKEN => {
                        info!("shutdown requested");
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }
    }

    fn drain_socket(&mut self) -> Result<(), ListenerError> {
        let socket = &self.socket;
        drain_with(
            |buf| socket.recv(buf),
            &mut self.buffer,
            &self.dispatcher,
            &self.stats,
        )
    }
}

/// Baca semua datagram yang tersedia sampai WouldBlock.
///
/// `recv` dipisah dari socket supaya error path bisa di-test.
fn drain_with<G, R>(
    mut recv: R,
    buffer: &mut [u8],
    dispatcher: &CommandDispatcher<G>,
    stats: &ListenerStats,
) -> Result<(), ListenerError>
where
    G: PlaybackGrid,
    R: FnMut(&mut [u8]) -> io::Result<usize>,
{
    loop {
        let len = match recv(buffer) {
            Ok(len) => len,
            Err(ref err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(ListenerError::Receive(err)),
        };

        stats.record_datagram(len);
        debug!(len, "datagram received");

        let outcome = dispatcher.handle_datagram(&buffer[..len]);
        stats.record_outcome(outcome);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::playback::HeadlessGrid;

    /// `recv` palsu: kembalikan hasil sesuai urutan, lalu WouldBlock.
    fn scripted(
        script: Vec<io::Result<&'static [u8]>>,
    ) -> impl FnMut(&mut [u8]) -> io::Result<usize> {
        let mut script: VecDeque<_> = script.into();
        move |buf: &mut [u8]| match script.pop_front() {
            Some(Ok(datagram)) => {
                let len = datagram.len().min(buf.len());
                buf[..len].copy_from_slice(&datagram[..len]);
                Ok(len)
            }
            Some(Err(err)) => Err(err),
            None => Err(io::ErrorKind::WouldBlock.into()),
        }
    }

    fn loopback_config() -> ListenerConfig {
        ListenerConfig {
            bind_host: "127.0.0.1".into(),
            service: "0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_shutdown_before_any_datagram() {
        let grid = Arc::new(HeadlessGrid::new());
        let listener =
            Listener::bind(&loopback_config(), CommandDispatcher::new(grid)).unwrap();
        let shutdown = listener.shutdown_handle();

        let handle = listener.spawn().unwrap();
        shutdown.shutdown().unwrap();

        let snapshot = handle.join().unwrap().unwrap();
        assert_eq!(snapshot, StatsSnapshot::default());
    }

    #[test]
    fn test_thread_is_named() {
        let grid = Arc::new(HeadlessGrid::new());
        let listener =
            Listener::bind(&loopback_config(), CommandDispatcher::new(grid)).unwrap();
        let shutdown = listener.shutdown_handle();

        let handle = listener.spawn().unwrap();
        assert_eq!(handle.thread().name(), Some(THREAD_NAME));
        shutdown.shutdown().unwrap();
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_receive_error_ends_drain() {
        let grid = Arc::new(HeadlessGrid::new());
        grid.init_grid(1, 1).unwrap();
        let dispatcher = CommandDispatcher::new(Arc::clone(&grid));
        let stats = ListenerStats::new();
        let mut buffer = [0u8; MAX_DATAGRAM_LEN];

        let recv = scripted(vec![
            Ok(&b"play\x1Fd\x1Fu\x1Ft"[..]),
            Err(io::ErrorKind::ConnectionReset.into()),
            Ok(&b"stop"[..]),
        ]);
        let result = drain_with(recv, &mut buffer, &dispatcher, &stats);

        let Err(ListenerError::Receive(err)) = result else {
            panic!("expected receive error, got {result:?}");
        };
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        // Datagram sebelum error tetap diproses, sesudahnya tidak dibaca
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.datagrams_received, 1);
        assert_eq!(snapshot.commands_dispatched, 1);
        assert!(grid.cell(crate::playback::GridCell::new(0, 0)).is_some());
    }

    #[test]
    fn test_interrupted_recv_is_retried() {
        let grid = Arc::new(HeadlessGrid::new());
        let dispatcher = CommandDispatcher::new(grid);
        let stats = ListenerStats::new();
        let mut buffer = [0u8; MAX_DATAGRAM_LEN];

        let recv = scripted(vec![
            Err(io::ErrorKind::Interrupted.into()),
            Ok(&b"stop"[..]),
            Ok(&b"pause"[..]),
        ]);
        drain_with(recv, &mut buffer, &dispatcher, &stats).unwrap();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.datagrams_received, 2);
        assert_eq!(snapshot.commands_dispatched, 1);
        assert_eq!(snapshot.unrecognized_verbs, 1);
    }
}
