pub mod config;
pub mod datasets;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod insert;
pub mod knowledge;
pub mod output;
pub mod provenance;
pub mod schema;
pub mod store;
