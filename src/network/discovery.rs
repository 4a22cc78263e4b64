//! Best-effort discovery of the host's outbound-facing IP address.
//!
//! A datagram socket is connected toward a well-known remote address. UDP
//! connect sends nothing; it only makes the OS consult its routing table and
//! bind the socket to the local address of the outbound interface, which is
//! then read back.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};

use strum::Display;
use tracing::{debug, warn};

use crate::error::DiscoveryError;
use crate::metrics;

/// Address reported when discovery fails.
pub const FALLBACK_IP: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default probe target: a public DNS resolver.
pub const DEFAULT_PROBE_TARGET: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

/// Where a reported address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum IpSource {
    /// Chosen by the OS routing table.
    Routed,
    /// Discovery failed, loopback reported instead.
    Fallback,
}

/// A datagram socket that can be pointed at a remote address.
///
/// The socket is released when the value is dropped.
pub trait ProbeSocket {
    /// Associate the socket with `target` without sending data.
    fn connect(&self, target: SocketAddr) -> io::Result<()>;

    /// Local address the OS bound the socket to.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

/// Opens probe sockets.
pub trait SocketFactory: Send + Sync {
    /// Socket type produced by this factory.
    type Socket: ProbeSocket;

    /// Open a socket bound to `bind`.
    fn open(&self, bind: SocketAddr) -> io::Result<Self::Socket>;
}

impl ProbeSocket for UdpSocket {
    fn connect(&self, target: SocketAddr) -> io::Result<()> {
        UdpSocket::connect(self, target)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        UdpSocket::local_addr(self)
    }
}

/// Factory backed by real OS UDP sockets.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpSocketFactory;

impl SocketFactory for UdpSocketFactory {
    type Socket = UdpSocket;

    fn open(&self, bind: SocketAddr) -> io::Result<UdpSocket> {
        UdpSocket::bind(bind)
    }
}

/// Unspecified bind address matching the family of `target`.
fn bind_addr_for(target: SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}

/// Discover the outbound-facing local IP toward `target`.
///
/// The socket is dropped before this returns on every path.
pub fn discover_local_ip<F: SocketFactory>(
    factory: &F,
    target: SocketAddr,
) -> Result<IpAddr, DiscoveryError> {
    let bind = bind_addr_for(target);
    let socket = factory
        .open(bind)
        .map_err(|source| DiscoveryError::Bind { bind, source })?;

    socket
        .connect(target)
        .map_err(|source| DiscoveryError::Connect { target, source })?;

    let ip = socket
        .local_addr()
        .map_err(DiscoveryError::LocalAddr)?
        .ip();

    if ip.is_unspecified() {
        return Err(DiscoveryError::Unroutable(ip));
    }

    Ok(ip)
}

/// Set once the first fallback has been reported at `warn` level.
static FALLBACK_WARNED: AtomicBool = AtomicBool::new(false);

/// True the first time it is called on `flag`.
fn first_time(flag: &AtomicBool) -> bool {
    !flag.swap(true, Ordering::Relaxed)
}

/// Discover the local IP, reporting loopback on any failure.
///
/// The first fallback in the process is logged at `warn`, later ones at
/// `debug`, so a host without a route does not log once per request.
pub fn resolve_local_ip<F: SocketFactory>(factory: &F, target: SocketAddr) -> (IpAddr, IpSource) {
    let _timer = metrics::timer_ip_discovery();

    let resolved = match discover_local_ip(factory, target) {
        Ok(ip) => {
            debug!(%ip, %target, "Discovered local IP");
            (ip, IpSource::Routed)
        }
        Err(e) => {
            if first_time(&FALLBACK_WARNED) {
                warn!(error = %e, fallback = %FALLBACK_IP, "Local IP discovery failed");
            } else {
                debug!(error = %e, fallback = %FALLBACK_IP, "Local IP discovery failed");
            }
            (FALLBACK_IP, IpSource::Fallback)
        }
    };

    metrics::inc_ip_discovery(resolved.1);
    resolved
}

/// Object-safe view of a [`SocketFactory`] for handler state.
pub trait IpResolver: Send + Sync {
    /// Resolve the outbound IP toward `target`, never failing.
    fn resolve(&self, target: SocketAddr) -> (IpAddr, IpSource);
}

impl<F: SocketFactory> IpResolver for F {
    fn resolve(&self, target: SocketAddr) -> (IpAddr, IpSource) {
        resolve_local_ip(self, target)
    }
}
