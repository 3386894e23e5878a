//! rockfish-client — client-side channel to a Rockfish service host.

pub mod channel;

pub use channel::Channel;
