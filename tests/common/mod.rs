//! Canned-response HTTP endpoint for loader tests.
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "NOT FOUND",
        500 => "INTERNAL SERVER ERROR",
        503 => "SERVICE UNAVAILABLE",
        _ => "STATUS",
    }
}

/// Serve each `(status, body)` to one connection, in order, then stop.
/// Returns the compliance URL of the fixture.
pub fn serve(responses: Vec<(u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture");
    let port = listener.local_addr().expect("local addr").port();

    thread::spawn(move || {
        for (status, body) in responses {
            let mut stream = match listener.accept() {
                Ok((s, _)) => s,
                Err(_) => return,
            };
            let reader = BufReader::new(&stream);
            for line in reader.lines() {
                match line {
                    Ok(l) if !l.is_empty() => continue,
                    _ => break,
                }
            }
            let response = format!(
                "HTTP/1.1 {} {}\r\n\
                 Content-Type: application/json\r\n\
                 Connection: close\r\n\
                 Content-Length: {}\r\n\r\n{}",
                status,
                reason(status),
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://127.0.0.1:{}/compliance", port)
}

/// A URL on a port nothing listens on.
pub fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind unused port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/compliance", port)
}

pub const SCENARIO_BODY: &str = r#"[
    {"type": "GDPR", "Checklist Item": "Data retention schedule", "Severity of Risk": "Severe", "id": "c-1"},
    {"type": "GDPR", "Checklist Item": "Cookie consent banner", "Severity of Risk": "No Risk", "Analysis": "Banner present on all pages"},
    {"type": "Labor", "Checklist Item": "Overtime policy", "Severity of Risk": "Mild"}
]"#;
