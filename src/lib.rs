pub mod config;
pub mod diagram;
pub mod export;
pub mod ontology;
pub mod xml;
