//! UI Components
//!
//! Shared widgets and one panel per RentDesk resource.

mod delete_confirm_button;
mod log_panel;
mod notification_list;
mod onboarding_list;
mod pager;
mod rent_ledger;
mod toast_stack;
mod vendor_table;

pub use delete_confirm_button::DeleteConfirmButton;
pub use log_panel::LogPanel;
pub use notification_list::NotificationList;
pub use onboarding_list::OnboardingList;
pub use pager::Pager;
pub use rent_ledger::RentLedger;
pub use toast_stack::ToastStack;
pub use vendor_table::VendorTable;
