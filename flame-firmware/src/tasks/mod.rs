// Task-Modul: Enthält alle Embassy Tasks
//
// Beide Tasks laufen auf dem Executor von Core 0. Der Drehgeber-Decoder
// läuft ohne Executor auf Core 1 (siehe main.rs).

pub mod controller;
pub mod flame;

// Re-export Tasks für einfachen Import
pub use controller::controller_task;
pub use flame::flame_task;
