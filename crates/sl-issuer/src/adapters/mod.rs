pub mod memory;
pub mod remote;

pub use memory::InMemoryIssuer;
pub use remote::{KvBackedCounterStore, RemoteCounterIssuer};
