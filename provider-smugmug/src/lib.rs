//! # SmugMug Provider
//!
//! Implements the `PhotoLibrary` trait for the SmugMug API v2.
//!
//! ## Overview
//!
//! This module provides:
//! - Wire types for the `{"Response": {...}}` envelope
//! - Signed JSON requests against a configurable API origin
//! - Transparent `Pages.NextPage` pagination for child and image listings
//! - Signed streaming downloads of image renditions
//! - Optional capture of every raw response for inspection

pub mod capture;
pub mod connector;
pub mod error;
pub mod types;

pub use capture::ResponseCapture;
pub use connector::{SmugMugConnector, DEFAULT_API_ORIGIN};
pub use error::{Result, SmugMugError};
