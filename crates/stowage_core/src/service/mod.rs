//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod browse_session;
pub mod export_service;
pub mod item_service;
pub mod master_service;
