use crate::state::PlayerId;

pub const DEFAULT_COMMAND_CAPACITY: usize = 0xFFF;

/// Wire discriminant of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CommandKind {
    Player1Move = 1,
    Player1Serve = 2,
    Player2Move = 3,
    Player2Serve = 4,
}

impl TryFrom<u32> for CommandKind {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CommandKind::Player1Move),
            2 => Ok(CommandKind::Player1Serve),
            3 => Ok(CommandKind::Player2Move),
            4 => Ok(CommandKind::Player2Serve),
            other => Err(other),
        }
    }
}

impl CommandKind {
    pub fn player(self) -> PlayerId {
        match self {
            CommandKind::Player1Move | CommandKind::Player1Serve => PlayerId::One,
            CommandKind::Player2Move | CommandKind::Player2Serve => PlayerId::Two,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Added to the player's paddle offset.
    Move(f32),
    /// Re-centre the ball and launch it; only the sign matters.
    Serve(i32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub player: PlayerId,
    pub action: Action,
    /// Session tick the command takes effect on.
    pub timestamp: u32,
}

impl Command {
    pub fn movement(player: PlayerId, offset: f32, timestamp: u32) -> Self {
        Self {
            player,
            action: Action::Move(offset),
            timestamp,
        }
    }

    pub fn serve(player: PlayerId, direction: i32, timestamp: u32) -> Self {
        Self {
            player,
            action: Action::Serve(direction),
            timestamp,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match (self.player, self.action) {
            (PlayerId::One, Action::Move(_)) => CommandKind::Player1Move,
            (PlayerId::One, Action::Serve(_)) => CommandKind::Player1Serve,
            (PlayerId::Two, Action::Move(_)) => CommandKind::Player2Move,
            (PlayerId::Two, Action::Serve(_)) => CommandKind::Player2Serve,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("command buffer full ({capacity} commands)")]
pub struct BufferFull {
    pub capacity: usize,
}

/// Bounded, insertion-ordered batch of commands for one frame. Entries are
/// never removed individually; the whole batch is cleared once it has been
/// folded into the simulation.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    capacity: usize,
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_CAPACITY)
    }
}

impl CommandBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, command: Command) -> Result<(), BufferFull> {
        if self.commands.len() >= self.capacity {
            return Err(BufferFull {
                capacity: self.capacity,
            });
        }
        self.commands.push(command);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// `[u32 count][command...]`, the body of a command packet.
    pub fn serialize(&self) -> Vec<u8> {
        crate::net::encode_commands(&self.commands)
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
