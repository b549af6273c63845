// src/calendar/providers/mod.rs
pub mod fcs_api;
pub mod html_fallback;
