//! Studio data models — one module per table family.

pub mod deliverable;
pub mod event;
pub mod faq;
pub mod legal;
pub mod media;
pub mod order;
pub mod package;
pub mod pipeline;
pub mod profile;
pub mod setting;
pub mod validation;
