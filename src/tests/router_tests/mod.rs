mod auth_tests;
mod dashboard_tests;
mod search_tests;
