use std::time::Duration;

use crate::net::{DEFAULT_PORT, DEFAULT_RECV_TIMEOUT, MAX_COMMANDS_PER_PACKET};
use crate::simulation::{DEFAULT_COMMAND_CAPACITY, DEFAULT_SUB_STEP_MS};

pub const DEFAULT_FRAME_RATE: u32 = 60;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub port: u16,
    pub frame_rate: u32,
    pub sub_step_ms: u32,
    pub command_capacity: usize,
    pub recv_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frame_rate: DEFAULT_FRAME_RATE,
            sub_step_ms: DEFAULT_SUB_STEP_MS,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("frame rate must be between 1 and 1000, got {0}")]
    FrameRate(u32),
    #[error("sub-step must be at least 1ms")]
    SubStep,
    #[error("command capacity must be between 1 and {max}, got {0}", max = MAX_COMMANDS_PER_PACKET)]
    CommandCapacity(usize),
    #[error("receive timeout must be non-zero")]
    RecvTimeout,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 || self.frame_rate > 1000 {
            return Err(ConfigError::FrameRate(self.frame_rate));
        }
        if self.sub_step_ms == 0 {
            return Err(ConfigError::SubStep);
        }
        if self.command_capacity == 0 || self.command_capacity > MAX_COMMANDS_PER_PACKET {
            return Err(ConfigError::CommandCapacity(self.command_capacity));
        }
        if self.recv_timeout.is_zero() {
            return Err(ConfigError::RecvTimeout);
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}
