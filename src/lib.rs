// Stray Saver: rewards and sponsorship engine for stray-animal rescue reports
//
// This is the library root. Each module corresponds to a major subsystem:
// the local report store, report lifecycle rules, the rewards engine, and
// terminal output.

pub mod config;
pub mod db;
pub mod output;
pub mod reports;
pub mod rewards;
pub mod status;
