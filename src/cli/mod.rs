//! CLI infrastructure for the Monte Carlo tic-tac-toe toolkit
//!
//! This module provides the command-line interface for training, evaluating,
//! inspecting and playing against learned value tables.

pub mod commands;
pub mod config;
pub mod output;
