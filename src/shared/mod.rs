//! Shared Utilities Module
//!
//! Configuration and the collaborator services the engine calls out to.

pub mod config;
pub mod services;

pub use config::{EngineConfig, SkinSettings};
pub use services::{PathResolver, PixmapLoader, Scope, Services, Translator};
