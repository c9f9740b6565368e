//! Screen controllers for the humeur client.
//!
//! Wires the core session service and the remote API into the three
//! behaviors the UI renders: the login flow, the session guard and the
//! sentiment flow.

pub mod login_flow;
pub mod sentiment_flow;
pub mod session_guard;

pub use login_flow::{LoginFlow, SubmitOutcome};
pub use sentiment_flow::{AnalyzeOutcome, SentimentFlow};
pub use session_guard::SessionGuard;
