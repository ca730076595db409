mod engine;
mod store;
mod transport;

pub use engine::{launch, scan_and_dispatch, DispatchSummary, LaunchError, ScanSummary};
pub use store::{MailingStore, NewAttempt};
pub use transport::{MailTransport, TransportError};
