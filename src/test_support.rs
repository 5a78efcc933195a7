//! Loopback HTTP server that replays scripted responses.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    Respond(u16, String),
    DelayRespond(Duration, u16, String),
}

#[derive(Debug)]
pub(crate) struct TestServer {
    pub(crate) base_url: String,
    requests: Arc<AtomicUsize>,
    request_lines: Arc<Mutex<Vec<String>>>,
    shutdown_tx: mpsc::Sender<()>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl TestServer {
    pub(crate) fn spawn(behaviors: Vec<Behavior>) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind test server");
        listener.set_nonblocking(true).expect("set nonblocking");
        let addr = listener.local_addr().expect("local addr");

        let requests = Arc::new(AtomicUsize::new(0));
        let request_lines = Arc::new(Mutex::new(Vec::new()));
        let behaviors = Arc::new(Mutex::new(VecDeque::from(behaviors)));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let requests_clone = Arc::clone(&requests);
        let lines_clone = Arc::clone(&request_lines);
        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                match listener.accept() {
                    Ok((mut stream, _)) => {
                        requests_clone.fetch_add(1, Ordering::SeqCst);
                        let behavior = behaviors
                            .lock()
                            .expect("lock behaviors")
                            .pop_front()
                            .unwrap_or_else(|| Behavior::Respond(200, "{}".to_string()));
                        let lines = Arc::clone(&lines_clone);
                        std::thread::spawn(move || {
                            if let Ok(line) = read_request_line(&mut stream) {
                                lines.lock().expect("lock request lines").push(line);
                            }
                            serve_behavior(&mut stream, behavior);
                        });
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            base_url: format!("http://{addr}/"),
            requests,
            request_lines,
            shutdown_tx,
            join_handle: Some(join_handle),
        }
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub(crate) fn request_lines(&self) -> Vec<String> {
        self.request_lines
            .lock()
            .expect("lock request lines")
            .clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

fn read_request_line(stream: &mut TcpStream) -> std::io::Result<String> {
    stream.set_read_timeout(Some(Duration::from_millis(200)))?;
    let mut buf = [0_u8; 1024];
    let mut data = Vec::new();
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => {
                data.extend_from_slice(&buf[..read]);
                if data.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            Err(err)
                if err.kind() == std::io::ErrorKind::WouldBlock
                    || err.kind() == std::io::ErrorKind::TimedOut =>
            {
                break;
            }
            Err(err) => return Err(err),
        }
    }
    let text = String::from_utf8_lossy(&data);
    Ok(text.lines().next().unwrap_or_default().to_string())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn serve_behavior(stream: &mut TcpStream, behavior: Behavior) {
    match behavior {
        Behavior::Respond(status, body) => {
            let _ = write_response(stream, status, &body);
        }
        Behavior::DelayRespond(delay, status, body) => {
            std::thread::sleep(delay);
            let _ = write_response(stream, status, &body);
        }
    }
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = reason_phrase(status);
    let payload = body.as_bytes();
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        payload.len()
    )?;
    stream.write_all(payload)?;
    stream.flush()
}
