//! Instrument universe source port trait.

use crate::domain::error::ScanError;
use crate::domain::instrument::Universe;

pub trait UniversePort {
    fn load_universe(&self) -> Result<Universe, ScanError>;
}
