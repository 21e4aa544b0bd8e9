//! Form submission.
//!
//! `FormSubmitter` handles a `SubmitEvent` in one of three ways, picked by
//! the form's role:
//!
//! - generic: authorized request, fixed success banner, raw body on error
//! - login: unauthorized request, body stored as the credential on success
//! - view-users: authorized request, body rendered into the user list
//!
//! Every failure, whatever its cause, ends as an error banner carrying the
//! raw response body. Nothing is retried.

pub mod error;
pub mod submitter;

pub use error::SubmitError;
pub use submitter::{FormSubmitter, Messages, SubmitOutcome};
