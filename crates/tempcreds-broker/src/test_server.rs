//! In-process HTTP server standing in for the credential API in tests.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the handler sees of an incoming request.
#[derive(Debug)]
pub(crate) struct Request {
    pub path: String,
    pub headers: http::HeaderMap,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Canned response.
#[derive(Debug)]
pub(crate) struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }

    pub fn json(body: &str) -> Self {
        Self::status(200, body)
    }

    /// A valid credential response with an offset-less expiration.
    pub fn credentials() -> Self {
        Self::json(
            r#"{"AccessKeyId":"ASIATESTSERVER","SecretAccessKey":"server-secret","SessionToken":"server-token","Expiration":"2099-01-01T00:00:00"}"#,
        )
    }
}

#[derive(Debug)]
pub(crate) struct TestServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start<H>(handler: H) -> Self
    where
        H: Fn(&Request) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler = Arc::new(handler);
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let counter = Arc::clone(&counter);
                tokio::spawn(async move {
                    let service = service_fn(move |req: hyper::Request<Incoming>| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let request = Request {
                            path: req.uri().path().to_owned(),
                            headers: req.headers().clone(),
                        };
                        let reply = handler(&request);
                        async move {
                            Ok::<_, Infallible>(
                                hyper::Response::builder()
                                    .status(reply.status)
                                    .header("content-type", "application/json")
                                    .body(Full::new(Bytes::from(reply.body)))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { addr, hits, task }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
