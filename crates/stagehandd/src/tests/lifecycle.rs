//! End-to-end daemon runs over TCP.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use rstest::rstest;
use serde_json::json;
use stagehand_config::SocketEndpoint;

use crate::runtime::{ShutdownCause, ShutdownError, ShutdownSignal, run_daemon_with};

use super::support::{HealthEvent, RecordingHealthReporter, TestConfigLoader};

/// Shutdown signal released by the test.
struct ChannelShutdown {
    receiver: Mutex<Receiver<()>>,
}

impl ChannelShutdown {
    fn new() -> (Self, Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                receiver: Mutex::new(receiver),
            },
            sender,
        )
    }
}

impl ShutdownSignal for ChannelShutdown {
    fn wait(&self) -> Result<ShutdownCause, ShutdownError> {
        let receiver = self.receiver.lock().expect("shutdown mutex poisoned");
        let _ = receiver.recv();
        Ok(ShutdownCause::Requested)
    }
}

fn await_endpoint(reporter: &RecordingHealthReporter) -> SocketEndpoint {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(endpoint) = reporter.ready_endpoint() {
            return endpoint;
        }
        assert!(Instant::now() < deadline, "listener never became ready");
        thread::sleep(Duration::from_millis(10));
    }
}

fn exchange(port: u16, payload: &serde_json::Value) -> serde_json::Value {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("set read timeout");
    let request = json!({ "payload": payload.to_string() });
    stream
        .write_all(format!("{request}\n").as_bytes())
        .expect("write request");
    stream.flush().expect("flush");

    let mut line = String::new();
    BufReader::new(stream).read_line(&mut line).expect("read");
    serde_json::from_str(&line).expect("envelope json")
}

#[rstest]
fn daemon_serves_commands_until_shutdown() {
    let loader = Arc::new(TestConfigLoader::new());
    let reporter = Arc::new(RecordingHealthReporter::default());
    let (shutdown, trigger) = ChannelShutdown::new();

    let daemon_loader = Arc::clone(&loader);
    let daemon_reporter = Arc::clone(&reporter);
    let daemon = thread::spawn(move || {
        run_daemon_with(daemon_loader.as_ref(), daemon_reporter, &shutdown)
    });

    let endpoint = await_endpoint(&reporter);
    let port = endpoint.tcp_port().expect("tcp endpoint");
    assert_ne!(port, 0, "reported endpoint carries the bound port");

    let added = exchange(
        port,
        &json!({
            "type": "Stagehand.Prefab",
            "method": "CreateMeshColliderObject",
            "isMethod": true,
            "parameters": ["missing.prefab", "collider.prefab"]
        }),
    );
    assert_eq!(added["status"]["code"], "error");

    let data_path = exchange(
        port,
        &json!({"type": "Stagehand.Application", "method": "datapath"}),
    );
    assert_eq!(data_path["status"]["code"], "success");
    assert_eq!(data_path["payload"]["type"], "string");
    assert_eq!(data_path["payload"]["value"], loader.store_root().as_str());

    trigger.send(()).expect("signal shutdown");
    daemon
        .join()
        .expect("daemon thread")
        .expect("daemon exits cleanly");

    assert!(loader.store_root().is_dir());
    let events = reporter.events();
    assert!(events.contains(&HealthEvent::BootstrapSucceeded));
    assert!(events.contains(&HealthEvent::HostStarted));
}
