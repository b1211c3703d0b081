// 📇 Domain Records - Validated value objects the engines compute over
// Plain data + constructor validation; derived records (Spending, Debt)
// live with the engines that produce them

pub mod category;
pub mod expense;
pub mod group;
pub mod person;

pub use category::{Category, SplitEntry};
pub use expense::Expense;
pub use group::Group;
pub use person::Person;
