pub mod account;
pub mod journal_entry;
pub mod lenient;
pub mod settings;
pub mod trade;

pub use account::*;
pub use journal_entry::*;
pub use lenient::*;
pub use settings::*;
pub use trade::*;
