use crate::{
    sync::{AtomicU32, AtomicUsize, Ordering},
    types::DeviceId,
};
use core::fmt;
use tracing::trace;

/// Raw value of an unassigned device slot. Assigned slots hold `device + 1`.
const UNASSIGNED: u32 = 0;

/// Device placement shared by every node of one affinity set.
///
/// Both fields only move forward: the device is installed at most once, and
/// the task counter only grows. Neither operation blocks.
#[repr(align(128))]
pub struct DeviceGroup {
    device: AtomicU32,
    num_tasks: AtomicUsize,
}

impl fmt::Debug for DeviceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceGroup")
            .field("device", &self.device())
            .field("num_tasks", &self.num_tasks())
            .finish()
    }
}

impl Default for DeviceGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceGroup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            device: AtomicU32::new(UNASSIGNED),
            num_tasks: AtomicUsize::new(0),
        }
    }

    /// Agree on the group's device.
    ///
    /// Installs `proposed` if no device has been chosen yet and returns it;
    /// otherwise `proposed` is ignored and the installed device is returned.
    /// Any number of threads may race here: exactly one proposal wins, and
    /// every caller observes the winner.
    pub fn claim(&self, proposed: DeviceId) -> DeviceId {
        let raw = u32::from(proposed.0) + 1;
        match self
            .device
            .compare_exchange(UNASSIGNED, raw, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                trace!(device = %proposed, "device group claimed");
                proposed
            }
            Err(installed) => decode(installed).expect("DeviceGroup::claim: [1]"),
        }
    }

    /// The installed device, or `None` while unassigned.
    #[must_use]
    pub fn device(&self) -> Option<DeviceId> {
        decode(self.device.load(Ordering::Acquire))
    }

    /// Register one more member task and return the new count.
    pub fn join(&self) -> usize {
        self.num_tasks
            .fetch_add(1, Ordering::Relaxed)
            .checked_add(1)
            .expect("DeviceGroup::join: [1]")
    }

    #[must_use]
    pub fn num_tasks(&self) -> usize {
        self.num_tasks.load(Ordering::Relaxed)
    }
}

fn decode(raw: u32) -> Option<DeviceId> {
    let ordinal = raw.checked_sub(1)?;
    Some(DeviceId(
        ordinal.try_into().expect("DeviceGroup::decode: [1]"),
    ))
}
