pub mod activity;
pub mod attendance;
pub mod checkin_token;
pub mod member;
pub mod patrol;
pub mod points;
