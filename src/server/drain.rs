// Connection drain module
// Waits for in-flight connections after the listener is closed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::logger;

/// How often the connection counter is polled while draining
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait until no connections are active or `grace` has elapsed.
///
/// Returns the number of connections still open when it gave up.
pub async fn drain_connections(conn_counter: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let active = conn_counter.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_shutdown("All connections closed");
            return 0;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_shutdown(&format!(
                "Grace period over, abandoning {active} open connection(s)"
            ));
            return active;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
