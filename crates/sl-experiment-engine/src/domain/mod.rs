pub mod errors;
pub mod selection;
pub mod session;

pub use errors::EngineError;
pub use selection::select_variant;
pub use session::{derive_session_id, seed_from_session_id};
