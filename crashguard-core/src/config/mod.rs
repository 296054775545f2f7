//! Configuration for the containment layer.
//! TOML-based, layered resolution: env > project file > compiled defaults.
//! Loaded once at startup; the resulting policy is immutable for the
//! process lifetime.

pub mod containment_config;

pub use containment_config::{
    CatchConfig, ContainmentConfig, PolicyConfig, TerminalConfig,
};
