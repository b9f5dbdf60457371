//! Test suites for the viewer bootstrap.

mod support;
mod unit;
