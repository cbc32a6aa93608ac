//! Storefront and back-office operations over the SeaORM entities.

pub mod meal_service;
pub mod promotion_service;
pub mod affiliate_service;
pub mod order_service;
pub mod customer_service;
pub mod stats_service;
