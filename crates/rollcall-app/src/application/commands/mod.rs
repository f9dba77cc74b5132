pub mod check_in_commands;
pub mod command_handler;
pub mod directory_commands;
pub mod freeze_commands;
pub mod handlers;

pub use check_in_commands::{RecordCheckInCommand, RecordCheckInResult};
pub use command_handler::{Command, CommandHandler};
pub use directory_commands::{
    CreateEventCommand, CreateUserCommand, DeleteEventCommand, DeleteUserCommand,
    RenameUserCommand, UpdateEventCommand,
};
pub use freeze_commands::GrantFreezeCommand;
