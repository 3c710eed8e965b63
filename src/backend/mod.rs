//! Simulation backend for running the controller without a desktop shell

pub mod ascii;
pub mod overview;

pub use ascii::{AsciiRenderer, AsciiWindow, BoxStyle};
pub use overview::{OverviewHandle, OverviewState, SimulatedOverview, WindowState};
