//! HTTP handlers

pub mod auth;
pub mod cart;
pub mod catalog;
