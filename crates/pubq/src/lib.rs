//! pubq: PubMed boolean query builder.
//!
//! Command-line access to the boolean query model: validate queries before they are sent to
//! PubMed, print them in canonical form, inspect their concept groups, edit them group by
//! group, and update the queries stored in saved review records.

#![warn(missing_docs)]

pub mod cli;
