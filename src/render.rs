use tokio::sync::watch;
use crate::playback::{Frame, PlaybackStatus};

/// Turns the frame stream into status lines
///
/// Frames arrive every tick; a line is only produced when something a
/// reader would notice changed: the waypoint, the elapsed clock, the
/// playback status or the speed multiplier.
#[derive(Default)]
pub struct StatusPrinter {
    last: Option<(usize, String, PlaybackStatus, u32)>,
}

impl StatusPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, frame: &Frame) -> Option<String> {
        let key = (
            frame.current_index,
            frame.readout.elapsed.clone(),
            frame.status,
            u32::from(frame.speed_multiplier),
        );
        if self.last.as_ref() == Some(&key) {
            return None;
        }
        self.last = Some(key);
        Some(format_line(frame))
    }
}

pub fn format_line(frame: &Frame) -> String {
    let marker = match frame.status {
        PlaybackStatus::Playing => "▶",
        PlaybackStatus::Stopped => "⏸",
        PlaybackStatus::Finished => "■",
    };
    format!("[{} {}] {}", marker, frame.speed_multiplier, frame.readout)
}

/// Print status lines until the sender side is dropped
pub async fn run(mut frames: watch::Receiver<Frame>) {
    let mut printer = StatusPrinter::new();
    let initial = frames.borrow_and_update().clone();
    if let Some(line) = printer.observe(&initial) {
        println!("{}", line);
    }

    while frames.changed().await.is_ok() {
        let frame = frames.borrow_and_update().clone();
        if let Some(line) = printer.observe(&frame) {
            println!("{}", line);
        }
    }
}
