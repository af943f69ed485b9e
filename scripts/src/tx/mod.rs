//! RPC client, contract bindings and the calls the scripts make through them

pub mod abi;
pub mod client;
pub mod reader;
pub mod sender;
