//! PDF serialisation of laid-out reports.

pub mod writer;
