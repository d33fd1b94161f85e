pub mod error;
pub mod schema;
pub mod settings;
pub mod store;

pub use error::{Result, StoreError};
pub use settings::Settings;
pub use store::Store;
