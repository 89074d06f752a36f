mod store;

pub use store::*;
pub(crate) use store::to_record;
