pub mod channel;
pub mod checkpoint;
pub mod cycle;
pub mod fetcher;
pub mod interval;
pub mod obis;
pub mod reading;
pub mod series;
pub mod statistic;
