use crate::cli::commands::{open_pool, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        if signed_in(&pool, cfg)?.is_none() {
            return Ok(());
        }

        ExportLogic::export(&pool, cfg, *format, file, range.as_deref(), *force)?;
    }

    Ok(())
}
