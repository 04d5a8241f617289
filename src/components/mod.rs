// ABOUTME: UI components for the keychain TUI: call screen, toasts, help and layout

/// Help overlay
pub mod help;
/// SOS and call screen
pub mod keychain;
/// Top-level layout
pub mod layout;
/// Toast overlay
pub mod toasts;

pub use help::HelpComponent;
pub use keychain::KeychainComponent;
pub use layout::LayoutComponent;
pub use toasts::ToastComponent;
