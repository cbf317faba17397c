mod command;
mod event;
mod speaker;

pub use command::ClientCommand;
pub use event::ServerEvent;
pub use speaker::Speaker;
