//! s3cm CLI library
//!
//! This module exports the session components for use in integration tests.

pub mod commands;
pub mod dispatch;
pub mod exit_code;
pub mod input;
pub mod output;
pub mod session;
