mod directory_handlers;
mod grant_freeze_handler;
mod record_check_in_handler;


pub use directory_handlers::{
    CreateEventCommandHandler, CreateUserCommandHandler, DeleteEventCommandHandler,
    DeleteUserCommandHandler, RenameUserCommandHandler, UpdateEventCommandHandler,
};
pub use grant_freeze_handler::GrantFreezeCommandHandler;
pub use record_check_in_handler::RecordCheckInCommandHandler;
