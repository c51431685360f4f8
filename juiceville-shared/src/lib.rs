pub mod events;
pub mod money;
pub mod pagination;
pub mod pii;

pub use money::{Kobo, KOBO_PER_NAIRA};
pub use pagination::Page;
pub use pii::Masked;
