// HTTP routes
pub mod follows;
pub mod health;
pub mod internal;
pub mod recommendations;

pub use follows::*;
pub use health::*;
pub use internal::*;
pub use recommendations::*;
