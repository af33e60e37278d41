use std::time::Duration;
use std::thread;
use log::info;

/// Courtesy pause between two results-page requests.
pub fn page_delay(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    info!("Waiting for {:.1} seconds (Page Delay)...", delay.as_secs_f64());
    thread::sleep(delay);
}
