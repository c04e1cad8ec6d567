//! Burst Explorer - A TUI explorer for the Burst blockchain.
//!
//! This library provides:
//! - A client for the Burst node JSON API (accounts and blocks)
//! - Reward-recipient resolution for accounts and block generators
//! - Local storage for user-saved accounts with live observation
//! - View-models driving the account and block detail screens

pub mod config;
pub mod domain;
pub mod infra;
pub mod viewmodel;
