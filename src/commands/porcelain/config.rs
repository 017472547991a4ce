use crate::areas::config::{Config, ConfigKey};
use crate::areas::context::WorkingContext;
use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct ConfigOptions {
    pub global: bool,
    pub key: String,
    pub value: Option<String>,
}

impl Repository {
    /// Read or write a key, local config layered over the global one
    pub async fn configure(&self, opts: &ConfigOptions) -> anyhow::Result<()> {
        if opts.global {
            return configure_global(self.context(), &mut **self.writer(), opts);
        }

        let key = ConfigKey::try_parse(&opts.key)?;
        let mut config = self.config()?;

        match &opts.value {
            Some(value) => {
                config.local_mut().set(&key, value);
                config.local_mut().save()
            }
            None => {
                let value = config
                    .get(&key)
                    .ok_or_else(|| RepositoryError::UnknownConfigKey(opts.key.clone()))?;
                writeln!(self.writer(), "{value}")?;
                Ok(())
            }
        }
    }
}

/// Read or write a key in the global config, no repository required
pub fn configure_global(
    context: &WorkingContext,
    writer: &mut dyn Write,
    opts: &ConfigOptions,
) -> anyhow::Result<()> {
    let key = ConfigKey::try_parse(&opts.key)?;
    let mut config = Config::load(context.global_config_path().into_boxed_path())?;

    match &opts.value {
        Some(value) => {
            config.set(&key, value);
            config.save()
        }
        None => {
            let value = config
                .get(&key)
                .ok_or_else(|| RepositoryError::UnknownConfigKey(opts.key.clone()))?;
            writeln!(writer, "{value}")?;
            Ok(())
        }
    }
}
