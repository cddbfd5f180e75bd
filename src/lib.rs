//! Diagnostic reporter for WISE NetLogo CSV exports.
//!
//! The exporter's output is irregular: duplicate header blocks are
//! interleaved every few rows and the embedded session JSON is sometimes
//! double-encoded, prefixed, or internally malformed. The pipeline here
//! repairs the raw text, parses it into typed rows, recovers each embedded
//! payload (or downgrades it to a sentinel), groups rows by workgroup, and
//! renders fixed-width textual reports:
//!
//! repair -> table -> recover -> group -> report

pub mod error;
pub mod group;
pub mod recover;
pub mod repair;
pub mod report;
pub mod session;
pub mod table;
