//! Sweep engine: oracle and source IO, job control and report delivery.
mod controller;
mod executor;
mod finalizer;
mod http;
mod intake;
mod messenger;
mod oracle;
mod pages;
mod persist;
mod registry;
mod resolver;
mod source;
mod types;

pub use controller::{JobHandle, JobReport, JobSettings, JobSpec, SweepEngine};
pub use executor::BatchExecutor;
pub use http::HttpSettings;
pub use intake::Intake;
pub use messenger::{
    ensure_within_limit, Affordance, MessageHandle, Messenger, MessengerError, TargetId,
};
pub use oracle::{HttpOracle, Oracle, OracleVerdict};
pub use pages::PageBook;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use registry::{Destination, DestinationRegistry, RegistryError};
pub use resolver::{HttpResolver, Resolver};
pub use source::{BulkSource, SourceRef, COUNTRY_LIST_BASE};
pub use types::{CheckError, ControlError, FailureKind, IntakeError, SourceError};
