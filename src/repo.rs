mod submissions;

pub use submissions::{is_unique_violation, NewSubmission, SubmissionRepo};
