//! In-process HTTP gateway stub for transport tests.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// One request the stub gateway received.
pub(crate) struct RecordedRequest {
    /// Request target (path + query) from the request line.
    pub target: String,
    /// When the request arrived, on the tokio clock (honors a paused
    /// test clock).
    pub at: tokio::time::Instant,
}

/// Spawn a gateway stub that answers each incoming request with the
/// next canned XML body, then stops accepting.
///
/// Returns the base URL to point a client at and the request log.
pub(crate) async fn spawn_gateway(
    responses: Vec<String>,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let log = requests.clone();
    tokio::spawn(async move {
        for body in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let (reader, mut writer) = socket.split();
            let mut reader = BufReader::new(reader);

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).await.is_err() {
                break;
            }
            // drain headers
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) if line == "\r\n" => break,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }

            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            log.lock().unwrap().push(RecordedRequest {
                target,
                at: tokio::time::Instant::now(),
            });

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = writer.write_all(response.as_bytes()).await;
            let _ = writer.flush().await;
        }
    });

    (format!("http://{addr}"), requests)
}
