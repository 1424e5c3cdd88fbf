// External I/O operations module
pub mod dbus; // logind sleep/resume monitoring
pub mod lock; // Single-instance lock file
pub mod signals; // Unix signal handling
