//! Modules layer - Infrastructure components shared by every feature
//!
//! Contains the storage backends the feature services are built on.

pub mod storage;
