//! Controllers del sistema
//!
//! Validación, autorización y orquestación entre rutas y repositorios.

pub mod home_controller;
pub mod pev_controller;
pub mod transfer_controller;
