use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use super::chromosome::Chromosome;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandError {
    #[error("band name is empty")]
    Empty,
    #[error("'{0}' does not start with a chromosome 1-22, X or Y")]
    UnknownChromosome(String),
    #[error("'{0}' has no p or q arm")]
    MissingArm(String),
    #[error("'{0}' has no band number")]
    MissingBand(String),
    #[error("'{0}' has trailing characters after the band number")]
    TrailingCharacters(String),
}

/// Chromosome arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arm {
    P,
    Q,
}

impl Arm {
    fn parse(c: char) -> Option<Self> {
        match c {
            'p' | 'P' => Some(Arm::P),
            'q' | 'Q' => Some(Arm::Q),
            _ => None,
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arm::P => f.write_str("p"),
            Arm::Q => f.write_str("q"),
        }
    }
}

/// A parsed cytogenetic band.
///
/// Identity is the band name: two bands are equal iff their names are.
#[derive(Debug, Clone)]
pub struct BandInformation {
    name: String,
    chromosome: Chromosome,
    arm: Arm,
    band: u32,
    // Digits after the '.', compared as a decimal fraction (13.11 < 13.2)
    sub_band: String,
}

impl BandInformation {
    pub fn parse(name: &str) -> Result<Self, BandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BandError::Empty);
        }

        let arm_at = name
            .find(|c: char| !c.is_ascii_alphanumeric() || matches!(c, 'p' | 'q' | 'P' | 'Q'))
            .ok_or_else(|| BandError::MissingArm(name.to_string()))?;
        let chromosome = Chromosome::parse(&name[..arm_at])
            .ok_or_else(|| BandError::UnknownChromosome(name.to_string()))?;

        let mut rest = name[arm_at..].chars();
        let arm = rest
            .next()
            .and_then(Arm::parse)
            .ok_or_else(|| BandError::MissingArm(name.to_string()))?;
        let rest = rest.as_str();

        let (band_digits, sub_band) = match rest.split_once('.') {
            Some((band, sub)) => (band, Some(sub)),
            None => (rest, None),
        };
        if band_digits.is_empty() {
            return Err(BandError::MissingBand(name.to_string()));
        }
        if !band_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(BandError::TrailingCharacters(name.to_string()));
        }
        let band = band_digits
            .parse::<u32>()
            .map_err(|_| BandError::MissingBand(name.to_string()))?;

        let sub_band = match sub_band {
            Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                digits.to_string()
            }
            Some(_) => return Err(BandError::TrailingCharacters(name.to_string())),
            None => String::new(),
        };

        Ok(Self {
            name: name.to_string(),
            chromosome,
            arm,
            band,
            sub_band,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chromosome(&self) -> Chromosome {
        self.chromosome
    }

    pub fn arm(&self) -> Arm {
        self.arm
    }

    pub fn band(&self) -> u32 {
        self.band
    }

    pub fn sub_band(&self) -> &str {
        &self.sub_band
    }

    fn position_on_arm(&self, other: &Self) -> Ordering {
        let ours = (self.band, self.sub_band.as_str());
        let theirs = (other.band, other.sub_band.as_str());
        match self.arm {
            Arm::P => theirs.cmp(&ours),
            Arm::Q => ours.cmp(&theirs),
        }
    }
}

impl PartialEq for BandInformation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BandInformation {}

impl Hash for BandInformation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// Top-to-bottom reading order: p arm telomere to centromere, then q arm
// centromere to telomere
impl Ord for BandInformation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chromosome
            .cmp(&other.chromosome)
            .then(self.arm.cmp(&other.arm))
            .then_with(|| self.position_on_arm(other))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for BandInformation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BandInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
