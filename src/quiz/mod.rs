pub mod answer;
pub mod countdown;
pub mod leaderboard;
pub mod question;
pub mod score;
pub mod session;
