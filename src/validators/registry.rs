// SPDX-License-Identifier: PMPL-1.0-or-later
//! Static validator registry.
//!
//! Maps command names to constructors. The table is the single place a new
//! validator has to be listed.

use super::anteater::Anteater;
use super::ayeaye::Ayeaye;
use super::glowworm::Glowworm;
use super::molerat::Molerat;
use super::tarsier::Tarsier;
use super::Validator;
use crate::error::{Result, ZooError};

type Factory = fn() -> Box<dyn Validator>;

fn anteater() -> Box<dyn Validator> {
    Box::new(Anteater)
}

fn ayeaye() -> Box<dyn Validator> {
    Box::new(Ayeaye)
}

fn glowworm() -> Box<dyn Validator> {
    Box::new(Glowworm)
}

fn molerat() -> Box<dyn Validator> {
    Box::new(Molerat)
}

fn tarsier() -> Box<dyn Validator> {
    Box::new(Tarsier)
}

/// Registered validators, sorted by name
static REGISTRY: &[(&str, Factory)] = &[
    ("anteater", anteater),
    ("ayeaye", ayeaye),
    ("glowworm", glowworm),
    ("molerat", molerat),
    ("tarsier", tarsier),
];

/// Names of all registered validators in alphabetical order
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Build a validator by name, ignoring case
pub fn lookup(name: &str) -> Result<Box<dyn Validator>> {
    REGISTRY
        .iter()
        .find(|(registered, _)| registered.eq_ignore_ascii_case(name.trim()))
        .map(|(_, factory)| factory())
        .ok_or_else(|| ZooError::UnknownValidator(name.to_string()))
}

/// Build every registered validator
pub fn all() -> Vec<Box<dyn Validator>> {
    REGISTRY.iter().map(|(_, factory)| factory()).collect()
}
