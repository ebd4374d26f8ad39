//! Shift persistence abstraction.
//!
//! The engine prescribes no storage format; it requires only read-one,
//! write-one, and read-many-by-block-id operations, plus application
//! records. Callers are expected to serialize writes per shift id (via a
//! transaction or an optimistic-concurrency check) so that two concurrent
//! offer attempts on the same shift cannot both succeed.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{Application, ApplicationStatus, Shift};

/// Storage operations the coordinator needs.
pub trait ShiftStore {
    /// Reads one shift by id.
    fn get(&self, shift_id: &str) -> EngineResult<Shift>;

    /// Inserts a newly created shift.
    fn insert(&mut self, shift: Shift) -> EngineResult<()>;

    /// Replaces an existing shift record.
    fn update(&mut self, shift: Shift) -> EngineResult<()>;

    /// Reads every shift sharing the given block id.
    fn by_block(&self, block_id: &str) -> Vec<Shift>;

    /// Reads the applications recorded against a shift, in application order.
    fn applications_for(&self, shift_id: &str) -> Vec<Application>;

    /// Records a new application.
    fn record_application(&mut self, application: Application);

    /// Updates the status of one worker's application to a shift.
    fn set_application_status(
        &mut self,
        shift_id: &str,
        worker_id: &str,
        status: ApplicationStatus,
    );
}

/// A HashMap-backed store for tests and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShiftStore {
    shifts: HashMap<String, Shift>,
    applications: HashMap<String, Vec<Application>>,
}

impl InMemoryShiftStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shifts held.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Returns true if no shifts are held.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

impl ShiftStore for InMemoryShiftStore {
    fn get(&self, shift_id: &str) -> EngineResult<Shift> {
        self.shifts
            .get(shift_id)
            .cloned()
            .ok_or_else(|| EngineError::ShiftNotFound {
                shift_id: shift_id.to_string(),
            })
    }

    fn insert(&mut self, shift: Shift) -> EngineResult<()> {
        if self.shifts.contains_key(&shift.id) {
            return Err(EngineError::InvalidShift {
                shift_id: shift.id.clone(),
                message: "a shift with this id already exists".to_string(),
            });
        }
        self.shifts.insert(shift.id.clone(), shift);
        Ok(())
    }

    fn update(&mut self, shift: Shift) -> EngineResult<()> {
        if !self.shifts.contains_key(&shift.id) {
            return Err(EngineError::ShiftNotFound {
                shift_id: shift.id.clone(),
            });
        }
        self.shifts.insert(shift.id.clone(), shift);
        Ok(())
    }

    fn by_block(&self, block_id: &str) -> Vec<Shift> {
        let mut members: Vec<Shift> = self
            .shifts
            .values()
            .filter(|s| s.block_id.as_deref() == Some(block_id))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        members
    }

    fn applications_for(&self, shift_id: &str) -> Vec<Application> {
        self.applications.get(shift_id).cloned().unwrap_or_default()
    }

    fn record_application(&mut self, application: Application) {
        self.applications
            .entry(application.shift_id.clone())
            .or_default()
            .push(application);
    }

    fn set_application_status(
        &mut self,
        shift_id: &str,
        worker_id: &str,
        status: ApplicationStatus,
    ) {
        if let Some(apps) = self.applications.get_mut(shift_id) {
            for app in apps.iter_mut().filter(|a| a.worker_id == worker_id) {
                app.status = status;
            }
        }
    }
}
