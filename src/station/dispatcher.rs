use core::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};

use super::{
    modem::{WifiModem, WorkerSpawner},
    types::{EventStatus, ModemEvent},
};

/// One-shot flag raised by the dispatcher when the driver reports a reset,
/// consumed by the supervisor on its next tick. Safe to share between the
/// event path and the polling task.
pub struct ResetLatch {
    flag: AtomicBool,
}

impl ResetLatch {
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Clears the latch and returns whether it was set.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

impl Default for ResetLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Reacts to driver lifecycle notifications. Runs on the driver's delivery
/// path, so every arm must return without waiting; the only side effects are
/// log lines, the reset latch, and a non-blocking spawn request.
pub struct EventDispatcher<'a, S: WorkerSpawner> {
    spawner: S,
    reset_latch: &'a ResetLatch,
}

impl<'a, S: WorkerSpawner> EventDispatcher<'a, S> {
    pub fn new(spawner: S, reset_latch: &'a ResetLatch) -> Self {
        Self {
            spawner,
            reset_latch,
        }
    }

    pub fn handle(&mut self, modem: &impl WifiModem, event: &ModemEvent) -> EventStatus {
        match event {
            ModemEvent::FirmwareUnsupported { minimum, current } => {
                error!(
                    "modem firmware {} below supported minimum {}",
                    current, minimum
                );
            }
            ModemEvent::InitFinished => {
                info!("modem initialized");
            }
            ModemEvent::ResetDetected => {
                warn!("modem reset detected");
                self.reset_latch.set();
            }
            ModemEvent::IpAcquired => {
                // An address can surface while the station is mid-teardown;
                // only a joined station gets the network client.
                if modem.is_joined() {
                    match self.spawner.spawn_network_client() {
                        Ok(()) => info!("network client started"),
                        Err(err) => warn!("{}", err),
                    }
                }
            }
            ModemEvent::StationJoined | ModemEvent::StationDisconnected => {}
        }
        EventStatus::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::super::testkit::{FakeModem, RecordingSpawner};
    use super::*;

    #[test]
    fn ip_acquired_while_joined_spawns_the_network_client() {
        let latch = ResetLatch::new();
        let mut dispatcher = EventDispatcher::new(RecordingSpawner::default(), &latch);
        let modem = FakeModem::joined_with_ip([192, 168, 1, 9]);

        let status = dispatcher.handle(&modem, &ModemEvent::IpAcquired);
        assert_eq!(status, EventStatus::Accepted);
        assert_eq!(dispatcher.spawner.spawned, 1);
    }

    #[test]
    fn ip_acquired_without_join_does_not_spawn() {
        let latch = ResetLatch::new();
        let mut dispatcher = EventDispatcher::new(RecordingSpawner::default(), &latch);
        let modem = FakeModem::new();

        dispatcher.handle(&modem, &ModemEvent::IpAcquired);
        assert_eq!(dispatcher.spawner.spawned, 0);
    }

    #[test]
    fn rejected_spawn_is_still_accepted() {
        let latch = ResetLatch::new();
        let mut spawner = RecordingSpawner::default();
        spawner.reject = true;
        let mut dispatcher = EventDispatcher::new(spawner, &latch);
        let modem = FakeModem::joined_with_ip([192, 168, 1, 9]);

        let status = dispatcher.handle(&modem, &ModemEvent::IpAcquired);
        assert_eq!(status, EventStatus::Accepted);
        assert_eq!(dispatcher.spawner.spawned, 0);
    }

    #[test]
    fn reset_event_raises_the_latch_once() {
        let latch = ResetLatch::new();
        let mut dispatcher = EventDispatcher::new(RecordingSpawner::default(), &latch);
        let modem = FakeModem::new();

        assert!(!latch.take());
        dispatcher.handle(&modem, &ModemEvent::ResetDetected);
        assert!(latch.take());
        assert!(!latch.take());
    }

    #[test]
    fn informational_events_are_accepted_without_side_effects() {
        let latch = ResetLatch::new();
        let mut dispatcher = EventDispatcher::new(RecordingSpawner::default(), &latch);
        let modem = FakeModem::new();

        for event in [
            ModemEvent::InitFinished,
            ModemEvent::StationJoined,
            ModemEvent::StationDisconnected,
            ModemEvent::FirmwareUnsupported {
                minimum: Default::default(),
                current: Default::default(),
            },
        ] {
            assert_eq!(dispatcher.handle(&modem, &event), EventStatus::Accepted);
        }
        assert_eq!(dispatcher.spawner.spawned, 0);
        assert!(!latch.take());
    }
}
