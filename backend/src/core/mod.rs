//! Core arithmetic shared by the simulation layers

pub mod discount;
