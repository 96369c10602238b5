//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters and
//! pipeline components.

pub mod observer;
pub mod policy;
pub mod repository;

pub use observer::Observer;
pub use policy::Policy;
pub use repository::TableRepository;
