mod dashboard;
pub use dashboard::{use_session_provider, Dashboard};

mod home;
pub use home::Home;
