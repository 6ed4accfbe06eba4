mod env_expansion;

pub use env_expansion::{Environment, HostEnvironment, expand_env_vars};
