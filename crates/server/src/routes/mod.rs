pub mod collection;
pub mod health;
pub mod search;
pub mod store;
pub mod weather;

pub use collection::*;
pub use health::*;
pub use search::*;
pub use store::*;
pub use weather::*;
