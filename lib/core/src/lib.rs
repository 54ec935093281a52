//! Core types and utilities for authctl.
//!
//! This crate provides the prefixed identifier types and the pagination
//! model shared by every API family the CLI talks to.

pub mod id;
pub mod pagination;

pub use id::{OrganizationId, ParseIdError};
pub use pagination::{ListMetadata, ListOptions, Order, Page, ParseOrderError};
