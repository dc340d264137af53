//! CLI infrastructure for the qmaze toolkit
//!
//! This module provides the command-line interface for generating mazes and
//! training agents on them.

pub mod commands;
pub mod config;
pub mod output;
