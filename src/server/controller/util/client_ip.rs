use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

/// Address of the client that sent the request, when it can be told.
///
/// The first `X-Forwarded-For` entry wins over the socket peer address, since the service
/// normally runs behind a reverse proxy. Never rejects: a request without either yields `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl ClientIp {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
        .map(str::to_string)
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = forwarded_for(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(Self(ip))
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        extract::{ConnectInfo, FromRequestParts},
        http::Request,
    };

    use super::ClientIp;

    async fn extract(request: Request<()>) -> ClientIp {
        let (mut parts, _) = request.into_parts();

        ClientIp::from_request_parts(&mut parts, &()).await.unwrap()
    }

    /// Expect the first forwarded address to be used ahead of the peer address
    #[tokio::test]
    async fn prefers_forwarded_for() {
        let mut request = Request::builder()
            .header("X-Forwarded-For", " 203.0.113.7, 10.0.0.2")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("10.0.0.2:5000".parse::<SocketAddr>().unwrap()));

        assert_eq!(extract(request).await.as_deref(), Some("203.0.113.7"));
    }

    /// Expect the socket peer without a forwarded header, and nothing without either
    #[tokio::test]
    async fn falls_back_to_peer_address() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("192.0.2.10:443".parse::<SocketAddr>().unwrap()));

        assert_eq!(extract(request).await.as_deref(), Some("192.0.2.10"));

        let bare = Request::builder().body(()).unwrap();
        assert_eq!(extract(bare).await, ClientIp(None));
    }
}
