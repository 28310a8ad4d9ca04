//! Wire and domain types shared by the roster client and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
