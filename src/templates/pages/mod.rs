pub mod dashboard;
pub mod login;

pub use dashboard::{dashboard_page, DashboardVm, SearchResults};
pub use login::login_page;
