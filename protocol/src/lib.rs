#![deny(unreachable_pub)]

// Public modules that make up the protocol surface.
pub mod artifact;
pub mod request;
pub mod turn;
pub mod wire;
