//! Simulated annealing over block-constrained Sudoku grids.
//!
//! A single-solution trajectory search. Every 3x3 block is filled up
//! front so it holds distinct digits; the only move swaps two free cells
//! inside one block, so the search space is the set of block-consistent
//! grids and the objective counts row and column conflicts. Worsening
//! moves are accepted with a probability that decays as the temperature
//! cools geometrically; a run of non-improving epochs triggers an
//! additive reheat that lets the search climb out of frozen local minima.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod moves;
mod runner;

pub use config::AnnealConfig;
pub use moves::{random_fill, swap_within_block};
pub use runner::{AnnealResult, AnnealRunner};
