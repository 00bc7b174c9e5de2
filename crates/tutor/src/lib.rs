//! Tutoring session host for Math Relax.
//!
//! The [`Tutor`] owns the two host operations, `submit_name` and
//! `submit_message`, and wires the transcript normalizer, the request
//! dispatcher and the logbook together around a caller-owned `Session`.

pub mod dispatcher;
pub mod tutor;

#[cfg(test)]
mod test_helpers;

pub use dispatcher::{Reply, RequestDispatcher};
pub use tutor::Tutor;
