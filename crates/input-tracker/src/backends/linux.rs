//! Linux relative pointer source.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use cursorcast_common::clock::TraceClock;
use cursorcast_common::error::{CursorcastError, CursorcastResult};
use cursorcast_trace_model::event::PointerEvent;

use crate::PointSource;

/// Reads PS/2-style 3-byte packets from a mice device.
///
/// Positions are accumulated from relative motion in device units (pixels
/// at unit acceleration), starting at the origin. Screen `y` grows
/// downward, so packet `dy` is subtracted.
pub struct MiceSource {
    device: File,
    path: PathBuf,
    clock: TraceClock,
    pending: VecDeque<PointerEvent>,
    x: f64,
    y: f64,
    buttons: [bool; 3],
}

impl MiceSource {
    /// Open `path` for non-blocking reads.
    pub fn open(path: &Path) -> CursorcastResult<Self> {
        let device = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| {
                CursorcastError::input_tracking(format!(
                    "Failed to open {}: {e}",
                    path.display()
                ))
            })?;

        Ok(Self {
            device,
            path: path.to_path_buf(),
            clock: TraceClock::start(),
            pending: VecDeque::new(),
            x: 0.0,
            y: 0.0,
            buttons: [false; 3],
        })
    }

    fn ingest_packets(&mut self) -> CursorcastResult<()> {
        loop {
            let mut packet = [0u8; 3];
            match self.device.read(&mut packet) {
                Ok(3) => {
                    let t = self.clock.elapsed_ms();
                    self.process_packet(packet, t);
                }
                Ok(_) => break,
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    return Err(CursorcastError::input_tracking(format!(
                        "Failed reading {}: {err}",
                        self.path.display()
                    )));
                }
            }
        }
        Ok(())
    }

    fn process_packet(&mut self, packet: [u8; 3], t: i64) {
        let dx = f64::from(packet[1] as i8);
        let dy = f64::from(packet[2] as i8);

        if dx != 0.0 || dy != 0.0 {
            self.x += dx;
            self.y -= dy;
            self.pending
                .push_back(PointerEvent::moved(t, self.x, self.y));
        }

        for (bit, pressed) in self.buttons.iter_mut().enumerate() {
            let now = packet[0] & (1 << bit) != 0;
            if *pressed != now {
                *pressed = now;
                self.pending.push_back(if now {
                    PointerEvent::down(t)
                } else {
                    PointerEvent::up(t)
                });
            }
        }
    }
}

impl PointSource for MiceSource {
    fn poll(&mut self) -> CursorcastResult<Option<PointerEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        self.ingest_packets()?;
        Ok(self.pending.pop_front())
    }

    fn name(&self) -> &str {
        "mice"
    }

    fn restart(&mut self) -> CursorcastResult<()> {
        self.pending.clear();
        self.x = 0.0;
        self.y = 0.0;
        self.buttons = [false; 3];
        self.clock = TraceClock::start();
        Ok(())
    }
}

/// Describe why `path` could not be opened.
pub fn mice_device_diagnostic(path: &Path) -> String {
    // SAFETY: geteuid/getegid have no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };
    let device = path.display();

    match std::fs::metadata(path) {
        Ok(meta) => {
            let mode = meta.mode() & 0o777;
            format!(
                "device={device} mode={mode:o} owner_uid={} owner_gid={} process_uid={uid} process_gid={gid}; likely missing 'input' group membership. Fix: sudo usermod -aG input $USER && log out/in",
                meta.uid(),
                meta.gid()
            )
        }
        Err(err) => format!(
            "device={device} unavailable ({err}); ensure kernel input device exists and permissions allow read access"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorcast_trace_model::event::PointerEventKind;

    fn source() -> Option<MiceSource> {
        // /dev/null reads as EOF, which is enough to exercise packet decoding.
        MiceSource::open(Path::new("/dev/null")).ok()
    }

    #[test]
    fn test_packets_accumulate_position() {
        let Some(mut mice) = source() else { return };
        mice.process_packet([0, 5, 3], 10);
        mice.process_packet([0, (-2i8) as u8, (-1i8) as u8], 20);

        let events: Vec<PointerEvent> = mice.pending.drain(..).collect();
        assert_eq!(
            events,
            vec![PointerEvent::moved(10, 5.0, -3.0), PointerEvent::moved(20, 3.0, -2.0)]
        );
    }

    #[test]
    fn test_button_transitions() {
        let Some(mut mice) = source() else { return };
        mice.process_packet([0b001, 0, 0], 5);
        mice.process_packet([0b001, 0, 0], 6);
        mice.process_packet([0b000, 0, 0], 7);

        let kinds: Vec<PointerEventKind> = mice.pending.drain(..).map(|e| e.kind).collect();
        assert_eq!(kinds, vec![PointerEventKind::Down, PointerEventKind::Up]);
    }

    #[test]
    fn test_poll_on_empty_device() {
        let Some(mut mice) = source() else { return };
        assert!(mice.poll().unwrap().is_none());
        mice.process_packet([0, 1, 0], 3);
        mice.restart().unwrap();
        assert!(mice.poll().unwrap().is_none());
    }

    #[test]
    fn test_restart_forgets_held_buttons() {
        let Some(mut mice) = source() else { return };
        mice.process_packet([0b010, 0, 0], 5);
        mice.restart().unwrap();

        // Release after restart has no matching press.
        mice.process_packet([0b000, 4, 0], 8);
        let events: Vec<PointerEvent> = mice.pending.drain(..).collect();
        assert_eq!(events, vec![PointerEvent::moved(8, 4.0, 0.0)]);
    }

    #[test]
    fn test_diagnostic_for_missing_device() {
        let msg = mice_device_diagnostic(Path::new("/nonexistent/mice"));
        assert!(msg.contains("unavailable"));
    }
}
