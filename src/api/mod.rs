//! Nomad api client and payload types

pub mod client;
pub mod types;

pub use client::NomadClient;
