//! Observation identities and the directory-layout conventions they resolve under.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::validation::validate_segment;

/// Date folder naming used by every layout root
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Directory-layout family an identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutConvention {
    /// `<data_root>/<date>/<object>/<filter>/`
    Science,
    /// `<masterframe_root>/<date>/<unit>/`
    Masterframe,
}

impl LayoutConvention {
    pub fn from_masterframe_flag(masterframe: bool) -> Self {
        if masterframe {
            LayoutConvention::Masterframe
        } else {
            LayoutConvention::Science
        }
    }

    pub fn is_masterframe(self) -> bool {
        self == LayoutConvention::Masterframe
    }
}

impl fmt::Display for LayoutConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutConvention::Science => write!(f, "science"),
            LayoutConvention::Masterframe => write!(f, "masterframe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Science { object: String, filter: String },
    Masterframe { unit: String },
}

/// One observation (science) or one calibration unit (masterframe) on a given night.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationIdentity {
    date: NaiveDate,
    target: Target,
}

impl ObservationIdentity {
    /// Science identity with validated object and filter names
    pub fn science(date: NaiveDate, object: &str, filter: &str) -> Result<Self> {
        validate_segment("object", object)?;
        validate_segment("filter", filter)?;
        Ok(Self::science_unchecked(date, object, filter))
    }

    /// Masterframe identity with a validated unit name
    pub fn masterframe(date: NaiveDate, unit: &str) -> Result<Self> {
        validate_segment("unit", unit)?;
        Ok(Self::masterframe_unchecked(date, unit))
    }

    /// Names taken from a directory listing are already path segments
    pub(crate) fn science_unchecked(date: NaiveDate, object: &str, filter: &str) -> Self {
        Self {
            date,
            target: Target::Science {
                object: object.to_string(),
                filter: filter.to_string(),
            },
        }
    }

    pub(crate) fn masterframe_unchecked(date: NaiveDate, unit: &str) -> Self {
        Self {
            date,
            target: Target::Masterframe {
                unit: unit.to_string(),
            },
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn layout(&self) -> LayoutConvention {
        match self.target {
            Target::Science { .. } => LayoutConvention::Science,
            Target::Masterframe { .. } => LayoutConvention::Masterframe,
        }
    }

    pub fn is_masterframe(&self) -> bool {
        self.layout().is_masterframe()
    }
}

impl fmt::Display for ObservationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Science { object, filter } => {
                write!(f, "{} {object}/{filter}", self.date_str())
            }
            Target::Masterframe { unit } => write!(f, "{} masterframe {unit}", self.date_str()),
        }
    }
}
