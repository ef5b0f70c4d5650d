#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod repository;
pub mod schema;
pub mod table;
pub mod writer;

pub use repository::LanceRepository;
pub use writer::LanceIndexer;
