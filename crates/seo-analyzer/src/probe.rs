use std::time::Duration;

use reqwest::{Client, Method};
use seo_audit::{HttpProbe, ProbeError, ProbeMethod};
use url::Url;

/// [`HttpProbe`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpProbe for ReqwestProbe {
    async fn send(&self, method: ProbeMethod, url: &Url) -> Result<u16, ProbeError> {
        let method = match method {
            ProbeMethod::Head => Method::HEAD,
            ProbeMethod::Get => Method::GET,
        };

        // The body is never read; dropping the response releases the connection.
        let response = self
            .client
            .request(method, url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProbeError::Timeout
                } else {
                    ProbeError::Transport(e.to_string())
                }
            })?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::service::{make_service_fn, service_fn};
    use hyper::{Body, Method as HyperMethod, Response, Server, StatusCode};
    use seo_audit::LinkStatus;
    use seo_audit::utils::probe::probe_link;

    use std::convert::Infallible;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    const UA: &str = "TestAuditBot/1.0";

    fn probe() -> ReqwestProbe {
        ReqwestProbe::new(UA, Duration::from_secs(5)).unwrap()
    }

    fn url(addr: SocketAddr, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", addr, path)).unwrap()
    }

    #[tokio::test]
    async fn test_head_ok() {
        let addr = start_test_server().await;
        let status = probe_link(&probe(), &url(addr, "/ok"), Duration::from_secs(5)).await;
        assert_eq!(status, LinkStatus::Http(200));
    }

    #[tokio::test]
    async fn test_not_found() {
        let addr = start_test_server().await;
        let status = probe_link(&probe(), &url(addr, "/missing"), Duration::from_secs(5)).await;
        assert_eq!(status, LinkStatus::Http(404));
    }

    #[tokio::test]
    async fn test_head_rejected_falls_back_to_get() {
        let addr = start_test_server().await;
        let status = probe_link(&probe(), &url(addr, "/get-only"), Duration::from_secs(5)).await;
        assert_eq!(status, LinkStatus::Http(200));
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let addr = start_test_server().await;
        let status = probe_link(&probe(), &url(addr, "/moved"), Duration::from_secs(5)).await;
        assert_eq!(status, LinkStatus::Http(200));
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        let addr = start_test_server().await;
        let status = probe_link(&probe(), &url(addr, "/ua"), Duration::from_secs(5)).await;
        assert_eq!(status, LinkStatus::Http(204));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let addr = start_test_server().await;
        let probe = ReqwestProbe::new(UA, Duration::from_millis(200)).unwrap();
        let status = probe_link(&probe, &url(addr, "/slow"), Duration::from_millis(200)).await;
        assert_eq!(status, LinkStatus::Timeout);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let status = probe_link(&probe(), &url(addr, "/"), Duration::from_secs(5)).await;
        assert_eq!(status, LinkStatus::TransportError);
    }

    async fn start_test_server() -> SocketAddr {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let make_svc = make_service_fn(move |_conn| async move {
            Ok::<_, Infallible>(service_fn(move |req: hyper::Request<Body>| async move {
                let mut response = Response::new(Body::empty());
                match req.uri().path() {
                    "/ok" => {}
                    "/get-only" if req.method() == HyperMethod::HEAD => {
                        *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
                    }
                    "/get-only" => {
                        *response.body_mut() = Body::from("a large body that is never read");
                    }
                    "/moved" => {
                        *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
                        response
                            .headers_mut()
                            .insert("location", hyper::header::HeaderValue::from_static("/ok"));
                    }
                    "/ua" => {
                        let agent = req
                            .headers()
                            .get("user-agent")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default();
                        *response.status_mut() = if agent == UA {
                            StatusCode::NO_CONTENT
                        } else {
                            StatusCode::BAD_REQUEST
                        };
                    }
                    "/slow" => {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    _ => {
                        *response.status_mut() = StatusCode::NOT_FOUND;
                    }
                }
                Ok::<_, Infallible>(response)
            }))
        });

        tokio::spawn(async move {
            Server::from_tcp(listener.into_std().unwrap())
                .unwrap()
                .serve(make_svc)
                .await
                .unwrap();
        });

        addr
    }
}
