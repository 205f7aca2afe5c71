//! Client address extractor

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use crate::state::AppState;

/// Client address recorded with page views
///
/// The peer address is taken as is. Forwarding headers only count when the
/// peer is one of the configured trusted proxies.
#[derive(Debug, Clone, Default)]
pub struct ClientIp(pub Option<String>);

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// `X-Forwarded-For` hops, client first
fn forwarded_for(headers: &HeaderMap) -> Vec<IpAddr> {
    headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|hop| hop.trim().parse().ok())
        .collect()
}

fn resolve(headers: &HeaderMap, peer: Option<IpAddr>, trusted: &[IpAddr]) -> Option<IpAddr> {
    let peer = peer?;
    if !trusted.contains(&peer) {
        return Some(peer);
    }

    // Nearest hop first; the first address no trusted proxy vouches for is the client
    forwarded_for(headers)
        .into_iter()
        .rev()
        .find(|hop| !trusted.contains(hop))
        .or_else(|| header_ip(headers, "x-real-ip"))
        .or(Some(peer))
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let app_state = AppState::from_ref(state);
        let ip = resolve(&parts.headers, peer, &app_state.config().api.trusted_proxies);
        Ok(Self(ip.map(|ip| ip.to_string())))
    }
}
