// ABOUTME: Library crate for Guardian Keychain exposing the call session and its collaborators

//! Guardian Keychain: an emergency call that shares location and live video with guardians
//! while a classifier watches the scene for signs of panic.

/// Application state and keyboard handling for the TUI
pub mod app;
/// Panic classifier backends and the fault-tolerant client
pub mod classifier;
/// Ratatui components
pub mod components;
/// On-disk configuration
pub mod config;
/// Camera and location device access
pub mod device;
/// The guardians alerted when a call starts
pub mod guardians;
/// Shared data models
pub mod models;
/// Toast notifications
pub mod notification;
/// The emergency call session
pub mod session;
