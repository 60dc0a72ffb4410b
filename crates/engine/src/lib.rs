pub use error::EngineError;
pub use expenses::{Expense, ExpensePatch};
pub use groups::Group;
pub use memberships::{Member, MemberRole};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, GroupTotals, MemberTotal};

mod error;
mod expenses;
mod groups;
mod memberships;
mod money;
mod ops;
mod profiles;

type ResultEngine<T> = Result<T, EngineError>;
