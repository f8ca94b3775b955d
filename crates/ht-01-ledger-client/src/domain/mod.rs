//! Domain types owned by the ledger client: signing identity, wallet, and
//! the network connection profile.

pub mod identity;
pub mod profile;
