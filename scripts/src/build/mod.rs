//! Compilation of the solidity sources into artifacts

pub mod solc;
