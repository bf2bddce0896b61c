//! Concrete engine adapters

pub mod realtime;
pub mod rest;
