// ABOUTME: Deployment orchestration core.
// ABOUTME: Dispatcher, ledger, report builder, rollback executor, and the run tying them together.

mod dispatcher;
mod error;
mod ledger;
mod mode;
mod record;
mod report;
mod rollback;
mod run;
mod validation;

pub use dispatcher::{DispatchReport, Dispatcher, Prepared, prepare};
pub use error::{DeployError, DispatchCause};
pub use ledger::{DeploymentStats, Dispatched, KindCounters, Ledger, Reservation};
pub use mode::DeployMode;
pub use record::{DeployRecord, Operation, RecordOutcome};
pub use report::{DeploymentReport, ReportStatus, SuccessRate, Summary};
pub use rollback::{ActionStatus, RollbackAction, RollbackExecutor, RollbackResult, RollbackStatus};
pub use run::{DeploymentRun, RunContext};
pub use validation::{ValidatedArtifact, ValidationReport, validate_entries};
