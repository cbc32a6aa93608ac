pub mod errors;
pub mod db;
pub mod block;
pub mod user;
pub mod user_credentials;
pub mod meal;
pub mod promotion;
pub mod affiliate;
pub mod order;
pub mod page_content;

#[cfg(test)]
mod tests;
