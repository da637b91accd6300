mod audio;
mod ids;
mod track;
mod user;

pub use audio::{AudioFormat, AudioSource};
pub use ids::{TrackId, UserId};
pub use track::Track;
pub use user::User;
