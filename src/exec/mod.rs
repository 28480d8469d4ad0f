// src/exec/mod.rs

//! Process execution layer.
//!
//! Every collaborator (relink/genctls/publish scripts, the packaging shell
//! script, the headless browser, image conversion) is invoked as an external
//! process through the [`ScriptRunner`] seam. The real implementation,
//! [`ShellRunner`], uses `tokio::process::Command`; tests substitute a
//! recording fake.

pub mod command;

pub use command::{ScriptCall, ScriptRunner, ShellRunner};
