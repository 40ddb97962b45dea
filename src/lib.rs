//! `mailcard` — turn the email on screen into a task-card draft.
//!
//! This crate provides the extraction pipeline behind the "create card from
//! email" action: locating the displayed message through a [`host::MailHost`],
//! recovering readable text from its MIME tree (converting HTML to Markdown
//! when there is no plain text), formatting it as a Markdown description with
//! folded quotes and a labelled signature, and bounding its size.

pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod model;
pub mod parser;
pub mod prefill;
