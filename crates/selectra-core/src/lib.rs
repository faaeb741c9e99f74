pub mod binding;
pub mod combobox;
pub mod config;
pub mod creation;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod option;
pub mod parts;
pub mod search;
pub mod timer;
pub mod viewport;

pub use binding::Binding;
pub use combobox::Combobox;
pub use config::{ComboboxConfig, SizeVariant};
pub use creation::{CreateHandler, CreateRequest};
pub use cursor::{Key, KeyOutcome};
pub use error::{ComboboxError, CreationError, MisuseError, Result};
pub use filter::{filter_options, FilteredSet};
pub use option::{load_options, save_options, ComboOption};
pub use parts::{Content, Item, Scope, Trigger};
