//! PostgreSQL implementations of the store traits.

pub mod customer;
pub mod notification;
pub mod user;

pub use customer::CustomerRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;
