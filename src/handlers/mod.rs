//! One module per event source. Handlers are methods on [`Projector`](crate::projector::Projector);
//! a referenced entity that is not indexed yet is not an error, the event is skipped.
pub mod mph_minter;
pub mod mph_token;
pub mod vesting;
