//! Generation trigger, session state and download tests

mod trigger_test;
