use crate::linker::LinkerId;
use crate::profiles::Profile;

/// Malformed input refusing a single construction attempt.
///
/// Lack of evidence is never an error; it shows up as short lengths or
/// `None` results instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StemBuildError {
    DegenerateAxis { linker: LinkerId },
    EmptyLookupArea { linker: LinkerId },
    InvalidProfile { profile: Profile },
}

impl std::fmt::Display for StemBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StemBuildError::DegenerateAxis { linker } => {
                write!(f, "linker {} has a degenerate theoretical line", linker.0)
            }
            StemBuildError::EmptyLookupArea { linker } => {
                write!(f, "linker {} has an empty lookup area", linker.0)
            }
            StemBuildError::InvalidProfile { profile } => {
                write!(f, "profile {profile} is out of range (max {})", Profile::MAX)
            }
        }
    }
}

impl std::error::Error for StemBuildError {}
