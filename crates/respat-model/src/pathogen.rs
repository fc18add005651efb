//! Canonical pathogens and per-pathogen test calls.
//!
//! Every lab maps its own target codes onto the closed [`Pathogen`] set.
//! A [`CallSheet`] holds one [`PathogenCall`] per pathogen and folds
//! [`TargetOutcome`]s into it with sticky-positive semantics: once a pathogen
//! is `Pos`, no later outcome in the same group can change it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// The closed set of tracked pathogens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pathogen {
    /// SARS-CoV-2.
    Sc2,
    /// Influenza A.
    FluA,
    /// Influenza B.
    FluB,
    /// Respiratory syncytial virus.
    Vsr,
    /// Human metapneumovirus.
    Meta,
    /// Rhinovirus.
    Rino,
    /// Parainfluenza 1-4.
    Para,
    /// Adenovirus.
    Adeno,
    /// Bocavirus.
    Boca,
    /// Seasonal coronaviruses.
    Covs,
    /// Enterovirus.
    Entero,
    /// Bacterial targets of the extended panels.
    Bac,
}

impl Pathogen {
    /// All pathogens, in declaration order.
    pub const ALL: [Pathogen; 12] = [
        Pathogen::Sc2,
        Pathogen::FluA,
        Pathogen::FluB,
        Pathogen::Vsr,
        Pathogen::Meta,
        Pathogen::Rino,
        Pathogen::Para,
        Pathogen::Adeno,
        Pathogen::Boca,
        Pathogen::Covs,
        Pathogen::Entero,
        Pathogen::Bac,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pathogen::Sc2 => "SC2",
            Pathogen::FluA => "FLUA",
            Pathogen::FluB => "FLUB",
            Pathogen::Vsr => "VSR",
            Pathogen::Meta => "META",
            Pathogen::Rino => "RINO",
            Pathogen::Para => "PARA",
            Pathogen::Adeno => "ADENO",
            Pathogen::Boca => "BOCA",
            Pathogen::Covs => "COVS",
            Pathogen::Entero => "ENTERO",
            Pathogen::Bac => "BAC",
        }
    }

    /// Name of the output column carrying this pathogen's call.
    pub fn result_column(&self) -> &'static str {
        match self {
            Pathogen::Sc2 => "SC2_test_result",
            Pathogen::FluA => "FLUA_test_result",
            Pathogen::FluB => "FLUB_test_result",
            Pathogen::Vsr => "VSR_test_result",
            Pathogen::Meta => "META_test_result",
            Pathogen::Rino => "RINO_test_result",
            Pathogen::Para => "PARA_test_result",
            Pathogen::Adeno => "ADENO_test_result",
            Pathogen::Boca => "BOCA_test_result",
            Pathogen::Covs => "COVS_test_result",
            Pathogen::Entero => "ENTERO_test_result",
            Pathogen::Bac => "BAC_test_result",
        }
    }
}

impl fmt::Display for Pathogen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pathogen {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pathogen::ALL
            .iter()
            .copied()
            .find(|pathogen| pathogen.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownPathogen(s.to_string()))
    }
}

/// What a single target row says about its pathogen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetOutcome {
    Detected,
    NotDetected,
    NoResult,
}

/// Final per-pathogen call rendered in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathogenCall {
    Pos,
    Neg,
    #[default]
    NotTested,
}

impl PathogenCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathogenCall::Pos => "Pos",
            PathogenCall::Neg => "Neg",
            PathogenCall::NotTested => "NA",
        }
    }

    /// Fold one target outcome into the current call.
    ///
    /// `Pos` is absorbing. `NotDetected` upgrades "not tested" to `Neg`,
    /// and `NoResult` never changes anything.
    #[must_use]
    pub fn resolve(self, outcome: TargetOutcome) -> Self {
        match (self, outcome) {
            (PathogenCall::Pos, _) => PathogenCall::Pos,
            (_, TargetOutcome::Detected) => PathogenCall::Pos,
            (_, TargetOutcome::NotDetected) => PathogenCall::Neg,
            (current, TargetOutcome::NoResult) => current,
        }
    }
}

impl fmt::Display for PathogenCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call per pathogen, all starting as not tested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSheet {
    calls: [PathogenCall; 12],
}

impl CallSheet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(pathogen: Pathogen) -> usize {
        pathogen as usize
    }

    pub fn get(&self, pathogen: Pathogen) -> PathogenCall {
        self.calls[Self::slot(pathogen)]
    }

    pub fn apply(&mut self, pathogen: Pathogen, outcome: TargetOutcome) {
        let slot = Self::slot(pathogen);
        self.calls[slot] = self.calls[slot].resolve(outcome);
    }

    /// Iterate `(pathogen, call)` pairs in [`Pathogen::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Pathogen, PathogenCall)> + '_ {
        Pathogen::ALL.iter().copied().zip(self.calls.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_is_absorbing() {
        let call = PathogenCall::Pos
            .resolve(TargetOutcome::NotDetected)
            .resolve(TargetOutcome::NoResult);
        assert_eq!(call, PathogenCall::Pos);
    }

    #[test]
    fn no_result_keeps_not_tested() {
        assert_eq!(
            PathogenCall::NotTested.resolve(TargetOutcome::NoResult),
            PathogenCall::NotTested
        );
    }

    #[test]
    fn negative_then_positive_upgrades() {
        let call = PathogenCall::NotTested
            .resolve(TargetOutcome::NotDetected)
            .resolve(TargetOutcome::Detected);
        assert_eq!(call, PathogenCall::Pos);
    }
}
