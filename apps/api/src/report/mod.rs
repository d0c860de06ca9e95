//! HTTP surface for rendering reports and recording submissions.

pub mod handlers;
