//! Datagram socket setup
//!
//! Resolve `(host, service)` lalu coba bind ke setiap candidate address
//! secara berurutan; socket pertama yang berhasil dipakai.

use std::io;
use std::net::{ToSocketAddrs, UdpSocket};

use tracing::{debug, info};

use crate::error::ListenerError;

/// Bind datagram socket untuk `service` (decimal port) di `host`.
pub fn open_bind(host: &str, service: &str) -> Result<UdpSocket, ListenerError> {
    let resolve_error = |source: io::Error| ListenerError::Resolve {
        host: host.to_owned(),
        service: service.to_owned(),
        source,
    };

    let port = service.trim().parse::<u16>().map_err(|_| {
        resolve_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "service must be a decimal port",
        ))
    })?;
    let candidates = (host, port).to_socket_addrs().map_err(resolve_error)?;

    let mut last_error = None;
    for addr in candidates {
        match UdpSocket::bind(addr) {
            Ok(socket) => {
                info!(%addr, "datagram socket bound");
                return Ok(socket);
            }
            Err(err) => {
                debug!(%addr, error = %err, "bind failed, trying next address");
                last_error = Some(err);
            }
        }
    }

    Err(ListenerError::Bind {
        host: host.to_owned(),
        service: service.to_owned(),
        source: last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no address resolved")
        }),
    })
}

/// Set SO_RCVBUF. Burst datagram antri di buffer ini; tidak ada back-pressure lain.
#[cfg(unix)]
pub fn set_recv_buffer(socket: &UdpSocket, bytes: usize) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let optval = libc::c_int::try_from(bytes).unwrap_or(libc::c_int::MAX);
    // SAFETY: fd valid selama `socket` hidup, optval pointer ke c_int lokal
    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_RCVBUF,
            &optval as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub fn set_recv_buffer(_socket: &UdpSocket, _bytes: usize) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "SO_RCVBUF tuning is only supported on unix",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_ephemeral_loopback() {
        let socket = open_bind("127.0.0.1", "0").unwrap();
        let addr = socket.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn test_non_numeric_service() {
        assert!(matches!(
            open_bind("127.0.0.1", "video"),
            Err(ListenerError::Resolve { .. })
        ));
    }

    #[test]
    fn test_port_in_use() {
        let first = open_bind("127.0.0.1", "0").unwrap();
        let port = first.local_addr().unwrap().port().to_string();
        assert!(matches!(
            open_bind("127.0.0.1", &port),
            Err(ListenerError::Bind { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_set_recv_buffer() {
        let socket = open_bind("127.0.0.1", "0").unwrap();
        set_recv_buffer(&socket, 64 * 1024).unwrap();
    }
}
