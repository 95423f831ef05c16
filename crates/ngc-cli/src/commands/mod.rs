//! Subcommand implementations

pub mod call;
pub mod canon;
pub mod config;
pub mod procedures;

use crate::errors::CliError;
use crate::GlobalOpts;
use ngc_config::Config;
use ngc_logger as logger;
use ngc_python::{Bridge, BridgeSettings, InterpContext, RecordingCanon, StandaloneInterp};
use parking_lot::Mutex;
use std::sync::Arc;

/// A standalone interpreter with the configured script loaded
pub struct Session {
    pub interp: Arc<Mutex<StandaloneInterp>>,
    pub canon: Arc<Mutex<RecordingCanon>>,
    pub bridge: Bridge,
}

impl Session {
    /// Load config, apply command-line overrides and initialize the bridge
    pub fn open(opts: &GlobalOpts) -> Result<Self, CliError> {
        let config = Config::load()?;
        Self::open_with(&config, opts)
    }

    pub fn open_with(config: &Config, opts: &GlobalOpts) -> Result<Self, CliError> {
        let mut settings = BridgeSettings::from_config(config)?;
        if let Some(module) = &opts.module {
            settings.module = Some(module.clone());
        }
        if let Some(dir) = &opts.module_dir {
            settings.module_dir = Some(dir.clone());
        }

        tracing::debug!(
            module = settings.module_name(),
            slots = config.parameter_slots(),
            "opening session"
        );
        let mut interp = StandaloneInterp::new(config.parameter_slots());
        if let Some(tool_table) = &config.tool_table {
            interp = interp.with_tool_table(tool_table);
        }
        let interp = Arc::new(Mutex::new(interp));
        let canon = Arc::new(Mutex::new(RecordingCanon::new()));

        let mut bridge = Bridge::new(settings, InterpContext::new(&interp, Arc::clone(&canon)));
        let status = bridge.initialize()?;
        logger::debug(&format!("Bridge status: {}", status));
        bridge.ensure_loaded()?;

        Ok(Self {
            interp,
            canon,
            bridge,
        })
    }
}
