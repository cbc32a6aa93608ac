//! Service layer providing business operations on top of the `models` crate.
//! - `page_content`: the page-editor load/save contract behind a repository trait.
//! - `auth`: registration, login and token handling.
//! - `db`: catalog, promotions, affiliates, orders, customers and dashboard stats.

pub mod errors;
pub mod auth;
pub mod page_content;
pub mod db;
#[cfg(test)]
pub mod test_support;
