pub mod config;
pub mod delay;
pub mod engine;
pub mod host;
pub mod hover;
pub mod model;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod signals;
pub mod transition;
