//! Test suites for the stagehand daemon.

mod lifecycle;
mod support;
