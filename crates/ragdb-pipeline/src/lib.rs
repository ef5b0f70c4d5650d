#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Context selection and citation assembly.
//!
//! Turns an unordered pool of scored candidate fragments into a bounded,
//! ordered context set and a deterministic answer whose `[n]` markers map
//! one-to-one onto the returned source records. Stateless: every call is a
//! pure function of its inputs and the injected configuration.

pub mod citations;
pub mod composer;
pub mod selector;
pub mod service;

pub use service::RagService;
