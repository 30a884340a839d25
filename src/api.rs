pub mod heartbeat;
pub mod leneda;
