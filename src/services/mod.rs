pub mod notification;
pub mod ticket_store;
pub mod user_directory;

pub use notification::NotificationSender;
pub use ticket_store::TicketStore;
pub use user_directory::UserDirectory;
