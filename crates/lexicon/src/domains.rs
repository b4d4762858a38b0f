//! Language registers and domain priority weights
//!
//! Gurbani is not modern Punjabi: the corpus spans a small, known set of
//! historical registers. Each domain mode weighs these registers differently
//! when scoring correction candidates.

use katha_config::DomainMode;
use serde::{Deserialize, Serialize};

/// The linguistic registers found in scripture. Modern Hindi, English and
/// Hinglish are deliberately absent: they are drift, not domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageRegister {
    /// Devotional mixed register, dominant in SGGS.
    SantBhasha,
    /// Braj literary language.
    BrajBhasha,
    /// Medieval Gurmukhi Punjabi.
    OldPunjabi,
    /// Eastern Hindi literary form (Kabir, Ravidas).
    Avadhi,
    /// Tatsama/tadbhava Sanskrit-derived terms.
    Sanskrit,
    /// Persian loanwords written in Gurmukhi.
    Persian,
    /// Arabic loanwords written in Gurmukhi.
    Arabic,
    /// Prakritic forms, rare.
    Apabhramsha,
}

/// Priority weights per register within one domain mode, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainPriorities {
    pub sant_bhasha: f64,
    pub braj_bhasha: f64,
    pub old_punjabi: f64,
    pub avadhi: f64,
    pub sanskrit: f64,
    pub persian: f64,
    pub arabic: f64,
    pub apabhramsha: f64,
}

impl DomainPriorities {
    pub fn weight(&self, register: LanguageRegister) -> f64 {
        match register {
            LanguageRegister::SantBhasha => self.sant_bhasha,
            LanguageRegister::BrajBhasha => self.braj_bhasha,
            LanguageRegister::OldPunjabi => self.old_punjabi,
            LanguageRegister::Avadhi => self.avadhi,
            LanguageRegister::Sanskrit => self.sanskrit,
            LanguageRegister::Persian => self.persian,
            LanguageRegister::Arabic => self.arabic,
            LanguageRegister::Apabhramsha => self.apabhramsha,
        }
    }

    /// Registers sorted by weight, highest first.
    pub fn priority_order(&self) -> Vec<(LanguageRegister, f64)> {
        let mut weights = vec![
            (LanguageRegister::SantBhasha, self.sant_bhasha),
            (LanguageRegister::BrajBhasha, self.braj_bhasha),
            (LanguageRegister::OldPunjabi, self.old_punjabi),
            (LanguageRegister::Avadhi, self.avadhi),
            (LanguageRegister::Sanskrit, self.sanskrit),
            (LanguageRegister::Persian, self.persian),
            (LanguageRegister::Arabic, self.arabic),
            (LanguageRegister::Apabhramsha, self.apabhramsha),
        ];
        weights.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        weights
    }
}

const SGGS_PRIORITIES: DomainPriorities = DomainPriorities {
    sant_bhasha: 1.0,
    braj_bhasha: 0.9,
    old_punjabi: 0.9,
    avadhi: 0.8,
    sanskrit: 0.6,
    persian: 0.5,
    arabic: 0.5,
    apabhramsha: 0.3,
};

const DASAM_PRIORITIES: DomainPriorities = DomainPriorities {
    sant_bhasha: 0.8,
    braj_bhasha: 1.0,
    old_punjabi: 0.7,
    avadhi: 0.5,
    sanskrit: 0.9,
    persian: 0.5,
    arabic: 0.4,
    apabhramsha: 0.3,
};

const GENERIC_PRIORITIES: DomainPriorities = DomainPriorities {
    sant_bhasha: 0.5,
    braj_bhasha: 0.4,
    old_punjabi: 0.8,
    avadhi: 0.3,
    sanskrit: 0.5,
    persian: 0.6,
    arabic: 0.5,
    apabhramsha: 0.2,
};

/// Register priority table for a domain mode.
pub fn register_priorities(mode: DomainMode) -> DomainPriorities {
    match mode {
        DomainMode::Sggs => SGGS_PRIORITIES,
        DomainMode::Dasam => DASAM_PRIORITIES,
        DomainMode::Generic => GENERIC_PRIORITIES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sggs_priorities() {
        let p = register_priorities(DomainMode::Sggs);
        assert_eq!(p.weight(LanguageRegister::SantBhasha), 1.0);
        assert_eq!(p.priority_order()[0].0, LanguageRegister::SantBhasha);
    }

    #[test]
    fn test_dasam_prefers_braj() {
        let p = register_priorities(DomainMode::Dasam);
        assert_eq!(p.priority_order()[0].0, LanguageRegister::BrajBhasha);
        assert!(p.weight(LanguageRegister::Sanskrit) > p.weight(LanguageRegister::Avadhi));
    }

    #[test]
    fn test_all_weights_bounded() {
        for mode in [DomainMode::Sggs, DomainMode::Dasam, DomainMode::Generic] {
            for (_, w) in register_priorities(mode).priority_order() {
                assert!((0.0..=1.0).contains(&w));
            }
        }
    }
}
