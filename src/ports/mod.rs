//! Ports (trait boundaries) between the core algorithms and whatever
//! presents or records them.

pub mod observer;

pub use observer::{NoopObserver, Observer, ObserverSet};
