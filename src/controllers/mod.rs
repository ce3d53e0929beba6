pub mod auth_controller;
pub mod booking_controller;
pub mod cinema_controller;
pub mod hall_controller;
pub mod home_controller;
pub mod movie_controller;
pub mod user_controller;
