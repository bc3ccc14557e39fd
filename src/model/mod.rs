//! Types that represent the core data model, such as `Transaction` and `Settings`.
mod amount;
mod settings;
mod transaction;

pub use amount::{Amount, AmountError, MAX_WHOLE_DIGITS};
pub use settings::{CategoryError, Settings, Theme, DEFAULT_CATEGORIES};
pub(crate) use transaction::{id_sequence, ID_PREFIX};
pub use transaction::{is_valid_id, Transaction, TransactionFields, TransactionPatch};
