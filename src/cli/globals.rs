use crate::app_lib::config::ConfigOverrides;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: ConfigOverrides,
    /// Print machine-readable JSON instead of tables.
    pub json: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: ConfigOverrides, json: bool) -> Self {
        Self { config, json }
    }
}
