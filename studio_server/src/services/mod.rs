//! Studio services — data access and upstream integrations.

pub mod catalog_service;
pub mod delivery_service;
pub mod faq_service;
pub mod legal_service;
pub mod media_service;
pub mod order_service;
pub mod payment_gateway;
pub mod pipeline_service;
pub mod profile_service;
pub mod settings_service;
