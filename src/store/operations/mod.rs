pub mod admins;
pub mod assignments;
pub mod cycles;
pub mod deliveries;
pub mod events;
pub mod notifications;
pub mod schedules;
pub mod sessions;
pub mod users;
pub mod words;
