//! # Ports
//!
//! Driven ports of the ledger client: the RPC transport to the network and
//! the identity enrollment provider.

pub mod identity;
pub mod rpc;
