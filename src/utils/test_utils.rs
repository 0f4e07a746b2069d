#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::message::Message;
#[cfg(test)]
use crate::core::storage::MemoryStore;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use tokio::io::{AsyncReadExt, AsyncWriteExt};
#[cfg(test)]
use tokio::net::{TcpListener, TcpStream};
#[cfg(test)]
use tokio::sync::{mpsc, oneshot};

#[cfg(test)]
pub fn create_test_app() -> App {
    create_test_app_with_store(Arc::new(MemoryStore::new()))
}

#[cfg(test)]
pub fn create_test_app_with_store(store: Arc<MemoryStore>) -> App {
    App::from_store(store, true, true)
}

#[cfg(test)]
pub fn create_test_messages() -> Vec<Message> {
    vec![
        Message::user("Hello"),
        Message::bot("Hi there!"),
        Message::bot_status("🎤 Listening..."),
        Message::user("How are you?"),
        Message::bot("I'm doing well, thank you for asking!"),
    ]
}

#[cfg(test)]
pub struct CannedResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

#[cfg(test)]
impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

#[cfg(test)]
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[cfg(test)]
impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A local HTTP server that answers exactly one request.
#[cfg(test)]
pub struct OneShotServer {
    addr: std::net::SocketAddr,
    captured: oneshot::Receiver<CapturedRequest>,
}

#[cfg(test)]
impl OneShotServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn request(self) -> CapturedRequest {
        self.captured
            .await
            .expect("server should capture one request")
    }
}

#[cfg(test)]
pub async fn serve_once(response: CannedResponse) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let (tx, captured) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let request = read_http_request(&mut stream)
            .await
            .expect("read request");
        write_response(&mut stream, &response).await;
        let _ = tx.send(request);
    });

    OneShotServer { addr, captured }
}

/// A local HTTP server that answers one request per canned response, in
/// order, then stops accepting.
#[cfg(test)]
pub struct SequenceServer {
    addr: std::net::SocketAddr,
    captured: mpsc::UnboundedReceiver<CapturedRequest>,
}

#[cfg(test)]
impl SequenceServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn requests(mut self, count: usize) -> Vec<CapturedRequest> {
        let mut requests = Vec::with_capacity(count);
        for _ in 0..count {
            let request = self
                .captured
                .recv()
                .await
                .expect("server should capture every request");
            requests.push(request);
        }
        requests
    }
}

#[cfg(test)]
pub async fn serve_sequence(responses: Vec<CannedResponse>) -> SequenceServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let (tx, captured) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for response in responses {
            let (mut stream, _) = listener.accept().await.expect("accept connection");
            let request = read_http_request(&mut stream)
                .await
                .expect("read request");
            write_response(&mut stream, &response).await;
            if tx.send(request).is_err() {
                break;
            }
        }
    });

    SequenceServer { addr, captured }
}

#[cfg(test)]
async fn write_response(stream: &mut TcpStream, response: &CannedResponse) {
    let reason = if response.status >= 400 {
        "Error"
    } else if response.status >= 300 {
        "Found"
    } else {
        "OK"
    };
    let mut reply = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        reason,
        response.content_type,
        response.body.len(),
    );
    for (name, value) in &response.headers {
        reply.push_str(&format!("{name}: {value}\r\n"));
    }
    reply.push_str("\r\n");
    reply.push_str(&response.body);
    stream
        .write_all(reply.as_bytes())
        .await
        .expect("write response");
    let _ = stream.shutdown().await;
}

#[cfg(test)]
async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.unwrap_or_default();
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
