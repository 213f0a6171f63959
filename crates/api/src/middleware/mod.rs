//! Request pipeline middleware.
//!
//! - [`catch_failure::CatchFailureLayer`] -- Funnels handler failures into the error envelope.
//! - [`envelope::envelope_bare_errors`] -- Wraps bodiless error responses in the error envelope.

pub mod catch_failure;
pub mod envelope;
