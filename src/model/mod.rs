//! Core data model types: mail items, MIME part trees, addresses and drafts.

pub mod address;
pub mod mail;
