//! Portfolios module - per-portfolio cash state.

mod portfolios_model;


pub use portfolios_model::Portfolio;
