//! @acp:module "Editing Session"
//! @acp:summary "Field space + engine + debounced recompute for one open report"
//! @acp:domain scoring
//! @acp:layer service
//!
//! Edits are applied immediately and trigger a debounced recompute.
//! Structure changes and bulk imports recompute right away.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::engine::{build_engine, CalculationEngine, PassReport};
use crate::fields::{FieldId, FieldSpace, MemoryFields};
use crate::notify::Notifier;
use crate::schedule::Debouncer;

struct SessionState {
    fields: MemoryFields,
    engine: Box<dyn CalculationEngine>,
    last_report: Option<PassReport>,
    passes: u64,
}

impl SessionState {
    fn recompute(&mut self) -> PassReport {
        let report = self.engine.recompute(&mut self.fields);
        self.record(report)
    }

    fn structure_changed(&mut self) -> PassReport {
        let report = self.engine.on_structure_changed(&mut self.fields);
        self.record(report)
    }

    fn record(&mut self, report: PassReport) -> PassReport {
        self.passes += 1;
        self.last_report = Some(report.clone());
        report
    }
}

/// @acp:summary "An open report being edited"
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    debouncer: Debouncer,
}

impl Session {
    /// Build a session with the engine selected by `config`
    pub fn new(fields: MemoryFields, config: Config, notifier: Option<Arc<dyn Notifier>>) -> Self {
        let window = config.debounce_window();
        Self::with_engine(fields, build_engine(config, notifier), window)
    }

    pub fn with_engine(
        fields: MemoryFields,
        engine: Box<dyn CalculationEngine>,
        window: std::time::Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                fields,
                engine,
                last_report: None,
                passes: 0,
            })),
            debouncer: Debouncer::new(window),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// @acp:summary "Apply one cell edit and schedule a debounced recompute"
    ///
    /// Must be called from within a tokio runtime.
    pub fn edit(&self, id: FieldId, value: impl Into<String>) {
        {
            let mut state = self.lock();
            // MemoryFields never rejects a write
            let _ = state.fields.set(&id, value.into());
        }
        tracing::debug!(field = %id, "edit queued for recompute");

        let state = Arc::clone(&self.state);
        self.debouncer.schedule(move || {
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            state.recompute();
        });
    }

    /// Replace many cells at once (spreadsheet import) and recompute immediately
    pub fn import<I>(&self, cells: I) -> PassReport
    where
        I: IntoIterator<Item = (FieldId, String)>,
    {
        self.debouncer.cancel();
        let mut state = self.lock();
        for (id, value) in cells {
            let _ = state.fields.set(&id, value);
        }
        state.recompute()
    }

    /// Run the pending recompute now, or a fresh one when nothing is pending
    pub fn flush(&self) -> PassReport {
        self.debouncer.cancel();
        self.lock().recompute()
    }

    /// @acp:summary "Change the number of goal columns"
    pub fn set_goal_count(&self, count: usize) -> PassReport {
        self.set_count(FieldId::GoalCount, count)
    }

    /// @acp:summary "Change the number of assessment methods"
    pub fn set_method_count(&self, count: usize) -> PassReport {
        self.set_count(FieldId::MethodCount, count)
    }

    fn set_count(&self, id: FieldId, count: usize) -> PassReport {
        self.debouncer.cancel();
        let mut state = self.lock();
        let _ = state.fields.set(&id, count.to_string());
        state.structure_changed()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn field(&self, id: &FieldId) -> Option<String> {
        self.lock().fields.get(id).map(str::to_string)
    }

    /// Copy of the whole field space
    pub fn fields(&self) -> MemoryFields {
        self.lock().fields.clone()
    }

    pub fn last_report(&self) -> Option<PassReport> {
        self.lock().last_report.clone()
    }

    /// Number of recompute passes run so far
    pub fn pass_count(&self) -> u64 {
        self.lock().passes
    }
}
