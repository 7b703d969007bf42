//! Machine shutdown.
//!
//! There is no parent process to return to: exiting means executing a single trap that stops
//! the zkVM. The exit code is handed to the trap, but nothing guarantees that anybody can
//! observe it. The final state of the machine, and its output, are the only outward signal.

use crate::arch;

/// Power state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// The program is executing.
    Running,
    /// The halt trap has been requested. Terminal.
    Halted,
}

/// A halt request that transitioned the machine out of [`PowerState::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaltEvent {
    /// Exit code handed to the trap.
    pub code: i32,
}

/// Tracks the `Running` -> `Halted` transition.
#[derive(Debug)]
pub struct PowerControl {
    state: PowerState,
    code: Option<i32>,
}

impl PowerControl {
    /// Creates a controller in the running state.
    pub const fn new() -> Self {
        Self {
            state: PowerState::Running,
            code: None,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Returns true until a halt has been requested.
    pub fn is_running(&self) -> bool {
        self.state == PowerState::Running
    }

    /// Returns the code of the halt request that stopped the machine, if any.
    pub fn exit_code(&self) -> Option<i32> {
        self.code
    }

    /// Moves the machine to [`PowerState::Halted`].
    ///
    /// Only the first request produces a [`HaltEvent`]; later ones leave the state and the
    /// recorded exit code untouched.
    pub fn request_halt(&mut self, code: i32) -> Option<HaltEvent> {
        match self.state {
            PowerState::Running => {
                self.state = PowerState::Halted;
                self.code = Some(code);
                Some(HaltEvent { code })
            }
            PowerState::Halted => None,
        }
    }
}

impl Default for PowerControl {
    fn default() -> Self {
        Self::new()
    }
}

/// The instruction-level operation that stops the machine.
pub trait HaltTrap {
    /// Stops the machine. Never returns.
    fn halt(&self, code: i32) -> !;
}

/// Halts through the zkVM exit environment call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcallTrap;

impl HaltTrap for EcallTrap {
    fn halt(&self, code: i32) -> ! {
        arch::halt(code)
    }
}
