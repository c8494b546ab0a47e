//! Pen Sales Agent - Scripted SMS sales conversations
//!
//! This crate drives a five-stage sales script (Discovery, Presentation,
//! Commitment, Action, Objection) through a hosted language model, one
//! customer message at a time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
