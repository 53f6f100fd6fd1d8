/// Config-tree domain layer: run configuration, directory bootstrapping, writers.
pub mod errors;
pub mod layout;
pub mod model;
pub mod writer;

pub use errors::ConfigureError;
pub use layout::{
    Bootstrap, ConfigLayout, Confirm, OverwritePolicy, StdinConfirm, generate_config_directory,
};
pub use model::RunConfiguration;
pub use writer::{extension_writers, load_args, save_args};
