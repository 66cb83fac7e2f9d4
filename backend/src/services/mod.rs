pub mod email;
pub mod greeting_api;
pub mod greetings;
pub mod metrics;
pub mod submissions;
