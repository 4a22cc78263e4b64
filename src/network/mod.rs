//! Local network introspection.

pub mod discovery;

pub use discovery::{
    discover_local_ip, resolve_local_ip, IpResolver, IpSource, ProbeSocket, SocketFactory,
    UdpSocketFactory, DEFAULT_PROBE_TARGET, FALLBACK_IP,
};
