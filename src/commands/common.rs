//! Helpers shared by command handlers.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::config::MonitorConfig;
use crate::models::{LayoutConvention, ObservationIdentity};
use crate::monitor::Monitor;

/// Which night, layout and (optionally) unit a command targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSelector {
    pub date: NaiveDate,
    pub masterframe: bool,
    pub object: Option<String>,
    pub filter: Option<String>,
    pub unit: Option<String>,
}

impl UnitSelector {
    pub fn layout(&self) -> LayoutConvention {
        LayoutConvention::from_masterframe_flag(self.masterframe)
    }

    /// The selected unit, or `None` for a date-wide selection
    pub fn identity(&self) -> Result<Option<ObservationIdentity>> {
        let identity = match (self.masterframe, &self.object, &self.filter, &self.unit) {
            (false, None, None, None) | (true, None, None, None) => return Ok(None),
            (false, Some(object), Some(filter), None) => {
                ObservationIdentity::science(self.date, object, filter)?
            }
            (false, Some(_), None, None) | (false, None, Some(_), None) => {
                bail!("--object and --filter must be given together")
            }
            (true, None, None, Some(unit)) => ObservationIdentity::masterframe(self.date, unit)?,
            (true, _, _, _) => bail!("masterframe units are selected with --unit only"),
            (false, _, _, Some(_)) => bail!("--unit requires --masterframe"),
        };
        Ok(Some(identity))
    }

    /// Like [`UnitSelector::identity`] but a unit must be named
    pub fn require_identity(&self) -> Result<ObservationIdentity> {
        match self.identity()? {
            Some(identity) => Ok(identity),
            None if self.masterframe => bail!("No unit selected. Use --unit <UNIT>"),
            None => bail!("No observation selected. Use --object <OBJECT> --filter <FILTER>"),
        }
    }
}

/// Load configuration and build a monitor
pub fn open_monitor(config_path: Option<&Path>) -> Result<Monitor> {
    let config = MonitorConfig::load(config_path).context("Failed to load configuration")?;
    Monitor::new(config).context("Invalid configuration")
}

/// Truncate text to `max_chars`, appending an ellipsis when cut
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}
