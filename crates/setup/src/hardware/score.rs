//! Pure performance scoring over a collected [`HostProfile`].
//!
//! Detection ambiguity never reaches this module; the probe has already
//! folded failures into conservative profile defaults.

use super::storage::StorageMedium;
use super::{HostProfile, BYTES_PER_GIB};

const ADEQUATE_THRESHOLD: f64 = 45.0;

/// Discrete tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl PerformanceTier {
    pub fn from_score(overall: f64) -> Self {
        if overall >= 90.0 {
            Self::Excellent
        } else if overall >= 75.0 {
            Self::VeryGood
        } else if overall >= 60.0 {
            Self::Good
        } else if overall >= ADEQUATE_THRESHOLD {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// Advisory throughput expectation in nominal blocks per second; never
    /// measured, only communicated.
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Excellent => "headroom well beyond 10 BPS block rates",
            Self::VeryGood => "comfortable at 10 BPS block rates",
            Self::Good => "keeps up with current mainnet block rates",
            Self::Fair => "workable, but expect a slow initial sync",
            Self::Poor => "below the recommended hardware for a node",
        }
    }
}

/// Component scores in [0, 100] plus their derived aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceScore {
    pub cpu: f64,
    pub memory: f64,
    pub storage: f64,
}

impl PerformanceScore {
    /// Unweighted arithmetic mean of the three components.
    pub fn overall(&self) -> f64 {
        (self.cpu + self.memory + self.storage) / 3.0
    }

    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_score(self.overall())
    }

    pub fn adequate(&self) -> bool {
        self.overall() >= ADEQUATE_THRESHOLD
    }
}

pub fn cpu_score(physical_cores: usize) -> f64 {
    match physical_cores {
        c if c >= 16 => 100.0,
        c if c >= 8 => 80.0,
        c if c >= 4 => 60.0,
        c if c >= 2 => 40.0,
        _ => 20.0,
    }
}

pub fn memory_score(total_gib: f64) -> f64 {
    if total_gib >= 64.0 {
        100.0
    } else if total_gib >= 32.0 {
        90.0
    } else if total_gib >= 16.0 {
        70.0
    } else if total_gib >= 8.0 {
        50.0
    } else if total_gib >= 4.0 {
        30.0
    } else {
        10.0
    }
}

pub fn storage_score(medium: StorageMedium) -> f64 {
    match medium {
        StorageMedium::NvmeSsd => 100.0,
        StorageMedium::Ssd => 80.0,
        StorageMedium::Hdd => 40.0,
        StorageMedium::Unknown => 20.0,
    }
}

/// Score a profile. Pure; feed it synthetic profiles at will.
pub fn score(profile: &HostProfile) -> PerformanceScore {
    PerformanceScore {
        cpu: cpu_score(profile.physical_cores),
        memory: memory_score(profile.total_memory as f64 / BYTES_PER_GIB),
        storage: storage_score(profile.storage),
    }
}
