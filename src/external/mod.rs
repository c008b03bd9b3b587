//! Outbound HTTP plumbing shared by notification providers

pub mod client;
